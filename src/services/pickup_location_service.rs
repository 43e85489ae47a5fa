use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::KitPickupLocation;
use crate::database::DatabaseError;
use crate::error::FieldErrors;
use crate::validation::{Validate, Validator};

const LOCATION_COLUMNS: &str = "l.id, l.event_id, l.name, l.address, l.latitude, l.longitude, l.pickup_date, l.pickup_hours, l.created_at, l.updated_at";

#[derive(Debug, Clone, Deserialize)]
pub struct PickupLocationInput {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pickup_date: NaiveDate,
    pub pickup_hours: Option<String>,
}

impl Validate for PickupLocationInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 120)
            .required("address", &self.address)
            .max_len("address", &self.address, 300)
            .latitude("latitude", self.latitude)
            .longitude("longitude", self.longitude)
            .check(
                "longitude",
                self.latitude.is_some() == self.longitude.is_some(),
                "Latitude and longitude must be given together",
            )
            .optional_max_len("pickup_hours", self.pickup_hours.as_deref(), 120)
            .finish()
    }
}

pub struct PickupLocationService {
    pool: PgPool,
}

impl PickupLocationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Locations of a published event, earliest pickup first
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<KitPickupLocation>, DatabaseError> {
        let locations = sqlx::query_as::<_, KitPickupLocation>(&format!(
            r#"
            SELECT {} FROM kit_pickup_locations l
            JOIN events e ON e.id = l.event_id
            WHERE l.event_id = $1 AND e.status = 'published'
            ORDER BY l.pickup_date ASC, l.name ASC
            "#,
            LOCATION_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(locations)
    }

    pub async fn create(
        &self,
        event_id: Uuid,
        owner: Option<Uuid>,
        input: &PickupLocationInput,
    ) -> Result<KitPickupLocation, DatabaseError> {
        sqlx::query_as::<_, KitPickupLocation>(&format!(
            r#"
            WITH target AS (
                SELECT id FROM events WHERE id = $1 AND ($2::uuid IS NULL OR organizer_id = $2)
            ), l AS (
                INSERT INTO kit_pickup_locations (event_id, name, address, latitude, longitude, pickup_date, pickup_hours)
                SELECT id, $3, $4, $5, $6, $7, $8 FROM target
                RETURNING *
            )
            SELECT {} FROM l
            "#,
            LOCATION_COLUMNS
        ))
        .bind(event_id)
        .bind(owner)
        .bind(input.name.trim())
        .bind(input.address.trim())
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.pickup_date)
        .bind(input.pickup_hours.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Event {} not found", event_id)))
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        input: &PickupLocationInput,
    ) -> Result<KitPickupLocation, DatabaseError> {
        sqlx::query_as::<_, KitPickupLocation>(&format!(
            r#"
            UPDATE kit_pickup_locations l SET
                name         = $3,
                address      = $4,
                latitude     = $5,
                longitude    = $6,
                pickup_date  = $7,
                pickup_hours = $8,
                updated_at   = now()
            FROM events e
            WHERE l.id = $1 AND e.id = l.event_id AND ($2::uuid IS NULL OR e.organizer_id = $2)
            RETURNING {}
            "#,
            LOCATION_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .bind(input.name.trim())
        .bind(input.address.trim())
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.pickup_date)
        .bind(input.pickup_hours.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            DELETE FROM kit_pickup_locations l
            USING events e
            WHERE l.id = $1 AND e.id = l.event_id AND ($2::uuid IS NULL OR e.organizer_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    fn not_found(id: Uuid) -> DatabaseError {
        DatabaseError::NotFound(format!("Pickup location {} not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PickupLocationInput {
        PickupLocationInput {
            name: "Loja Centro".into(),
            address: "Rua Augusta, 100 - São Paulo/SP".into(),
            latitude: Some(-23.5558),
            longitude: Some(-46.6623),
            pickup_date: NaiveDate::from_ymd_opt(2026, 12, 30).unwrap(),
            pickup_hours: Some("09:00-18:00".into()),
        }
    }

    #[test]
    fn valid_location() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn coordinates_must_come_in_pairs() {
        let mut location = input();
        location.longitude = None;
        assert!(location.validate().unwrap_err().contains_key("longitude"));
    }

    #[test]
    fn coordinates_must_be_in_range() {
        let mut location = input();
        location.latitude = Some(-123.0);
        assert_eq!(
            location.validate().unwrap_err()["latitude"],
            "Latitude must be between -90 and 90"
        );
    }
}
