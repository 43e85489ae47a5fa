use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Event;
use crate::database::DatabaseError;
use crate::error::FieldErrors;
use crate::types::EventStatus;
use crate::validation::{Validate, Validator};

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, location, city, state, starts_at, price_cents, max_participants, banner_url, regulation_url, status, created_at, updated_at";

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub city: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EventListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub city: String,
    pub state: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub price_cents: i64,
    pub max_participants: Option<i32>,
    pub banner_url: Option<String>,
    pub regulation_url: Option<String>,
    pub status: Option<EventStatus>,
}

impl Validate for NewEvent {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("title", &self.title)
            .max_len("title", &self.title, 160)
            .optional_max_len("description", self.description.as_deref(), 10_000)
            .required("location", &self.location)
            .required("city", &self.city)
            .check("state", self.state.trim().len() == 2, "Use the two-letter state code")
            .check("starts_at", self.starts_at > Utc::now(), "Event must start in the future")
            .non_negative("price_cents", self.price_cents)
            .check(
                "max_participants",
                self.max_participants.map_or(true, |m| m > 0),
                "Must be greater than zero",
            )
            .optional_url("banner_url", self.banner_url.as_deref())
            .optional_url("regulation_url", self.regulation_url.as_deref())
            .finish()
    }
}

/// Partial update; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub price_cents: Option<i64>,
    pub max_participants: Option<i32>,
    pub banner_url: Option<String>,
    pub regulation_url: Option<String>,
    pub status: Option<EventStatus>,
}

impl Validate for EventUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            v.required("title", title).max_len("title", title, 160);
        }
        if let Some(location) = &self.location {
            v.required("location", location);
        }
        if let Some(city) = &self.city {
            v.required("city", city);
        }
        if let Some(state) = &self.state {
            v.check("state", state.trim().len() == 2, "Use the two-letter state code");
        }
        if let Some(price) = self.price_cents {
            v.non_negative("price_cents", price);
        }
        v.check(
            "max_participants",
            self.max_participants.map_or(true, |m| m > 0),
            "Must be greater than zero",
        )
        .optional_max_len("description", self.description.as_deref(), 10_000)
        .optional_url("banner_url", self.banner_url.as_deref())
        .optional_url("regulation_url", self.regulation_url.as_deref())
        .finish()
    }
}

pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Published events, soonest first
    pub async fn list_published(&self, query: &EventListQuery) -> Result<Vec<Event>, DatabaseError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {} FROM events
            WHERE status = 'published'
              AND ($1::text IS NULL OR city ILIKE $1)
            ORDER BY starts_at ASC
            LIMIT $2 OFFSET $3
            "#,
            EVENT_COLUMNS
        ))
        .bind(query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()))
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn get_published(&self, id: Uuid) -> Result<Event, DatabaseError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 AND status = 'published'",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    pub async fn list_for_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>, DatabaseError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE organizer_id = $1 ORDER BY starts_at DESC",
            EVENT_COLUMNS
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    /// Fetch an event the caller may manage. `owner = None` means any event (admin).
    pub async fn get_managed(&self, id: Uuid, owner: Option<Uuid>) -> Result<Event, DatabaseError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 AND ($2::uuid IS NULL OR organizer_id = $2)",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    pub async fn create(&self, organizer_id: Uuid, event: &NewEvent) -> Result<Event, DatabaseError> {
        let created = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events
                (organizer_id, title, description, location, city, state, starts_at,
                 price_cents, max_participants, banner_url, regulation_url, status)
            VALUES ($1, $2, $3, $4, $5, UPPER($6), $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(organizer_id)
        .bind(event.title.trim())
        .bind(event.description.as_deref())
        .bind(event.location.trim())
        .bind(event.city.trim())
        .bind(event.state.trim())
        .bind(event.starts_at)
        .bind(event.price_cents)
        .bind(event.max_participants)
        .bind(event.banner_url.as_deref())
        .bind(event.regulation_url.as_deref())
        .bind(event.status.unwrap_or(EventStatus::Draft))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Organizer {} created event {}", organizer_id, created.id);
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, owner: Option<Uuid>, update: &EventUpdate) -> Result<Event, DatabaseError> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events SET
                title            = COALESCE($3, title),
                description      = COALESCE($4, description),
                location         = COALESCE($5, location),
                city             = COALESCE($6, city),
                state            = COALESCE(UPPER($7), state),
                starts_at        = COALESCE($8, starts_at),
                price_cents      = COALESCE($9, price_cents),
                max_participants = COALESCE($10, max_participants),
                banner_url       = COALESCE($11, banner_url),
                regulation_url   = COALESCE($12, regulation_url),
                status           = COALESCE($13, status),
                updated_at       = now()
            WHERE id = $1 AND ($2::uuid IS NULL OR organizer_id = $2)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .bind(update.title.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .bind(update.location.as_deref().map(str::trim))
        .bind(update.city.as_deref().map(str::trim))
        .bind(update.state.as_deref().map(str::trim))
        .bind(update.starts_at)
        .bind(update.price_cents)
        .bind(update.max_participants)
        .bind(update.banner_url.as_deref())
        .bind(update.regulation_url.as_deref())
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    fn not_found(id: Uuid) -> DatabaseError {
        DatabaseError::NotFound(format!("Event {} not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_event() -> NewEvent {
        NewEvent {
            title: "Corrida de São Silvestre".into(),
            description: None,
            location: "Av. Paulista".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            starts_at: Utc::now() + Duration::days(30),
            price_cents: 12_000,
            max_participants: Some(500),
            banner_url: Some("/uploads/banners/a.png".into()),
            regulation_url: None,
            status: None,
        }
    }

    #[test]
    fn valid_event_passes() {
        assert!(new_event().validate().is_ok());
    }

    #[test]
    fn invalid_event_reports_each_field() {
        let mut event = new_event();
        event.title = String::new();
        event.state = "São Paulo".into();
        event.starts_at = Utc::now() - Duration::days(1);
        event.price_cents = -10;
        event.max_participants = Some(0);

        let errors = event.validate().unwrap_err();
        for field in ["title", "state", "starts_at", "price_cents", "max_participants"] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn list_query_paging_is_clamped() {
        let query = EventListQuery { city: None, limit: Some(10_000), offset: Some(-5) };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
        assert_eq!(EventListQuery::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn update_validates_present_fields_only() {
        assert!(EventUpdate::default().validate().is_ok());
        let update = EventUpdate { price_cents: Some(-1), ..Default::default() };
        assert!(update.validate().unwrap_err().contains_key("price_cents"));
    }
}
