use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::DatabaseError;

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct RegistrationTotals {
    pub registrations: i64,
    pub paid: i64,
    pub pending: i64,
    pub refunded: i64,
    /// Sum of amounts on paid registrations
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub users: i64,
    pub organizers: i64,
    pub events: i64,
    pub published_events: i64,
    #[serde(flatten)]
    pub totals: RegistrationTotals,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventBreakdown {
    pub event_id: Uuid,
    pub title: String,
    pub registrations: i64,
    pub paid: i64,
    pub pending: i64,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizerDashboard {
    pub events: i64,
    #[serde(flatten)]
    pub totals: RegistrationTotals,
    pub by_event: Vec<EventBreakdown>,
}

const TOTALS_SELECT: &str = r#"
    SELECT COUNT(r.id) AS registrations,
           COUNT(r.id) FILTER (WHERE r.payment_status = 'paid') AS paid,
           COUNT(r.id) FILTER (WHERE r.payment_status = 'pending') AS pending,
           COUNT(r.id) FILTER (WHERE r.payment_status = 'refunded') AS refunded,
           COALESCE(SUM(r.amount_cents) FILTER (WHERE r.payment_status = 'paid'), 0)::bigint AS revenue_cents
    FROM registrations r
    JOIN events e ON e.id = r.event_id
"#;

pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, DatabaseError> {
        let (users, organizers, events, published_events): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM user_roles WHERE role = 'organizer'),
                (SELECT COUNT(*) FROM events),
                (SELECT COUNT(*) FROM events WHERE status = 'published')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let totals = sqlx::query_as::<_, RegistrationTotals>(TOTALS_SELECT)
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminStats {
            users,
            organizers,
            events,
            published_events,
            totals,
        })
    }

    /// Figures across the organizer's events; `owner = None` covers every event
    pub async fn organizer_dashboard(&self, owner: Option<Uuid>) -> Result<OrganizerDashboard, DatabaseError> {
        let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE $1::uuid IS NULL OR organizer_id = $1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        let totals = sqlx::query_as::<_, RegistrationTotals>(&format!(
            "{} WHERE $1::uuid IS NULL OR e.organizer_id = $1",
            TOTALS_SELECT
        ))
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        let by_event = sqlx::query_as::<_, EventBreakdown>(
            r#"
            SELECT e.id AS event_id, e.title,
                   COUNT(r.id) AS registrations,
                   COUNT(r.id) FILTER (WHERE r.payment_status = 'paid') AS paid,
                   COUNT(r.id) FILTER (WHERE r.payment_status = 'pending') AS pending,
                   COALESCE(SUM(r.amount_cents) FILTER (WHERE r.payment_status = 'paid'), 0)::bigint AS revenue_cents
            FROM events e
            LEFT JOIN registrations r ON r.event_id = e.id
            WHERE $1::uuid IS NULL OR e.organizer_id = $1
            GROUP BY e.id, e.title, e.starts_at
            ORDER BY e.starts_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrganizerDashboard { events, totals, by_event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_flatten_into_dashboard() {
        let dashboard = OrganizerDashboard {
            events: 2,
            totals: RegistrationTotals { registrations: 3, paid: 2, pending: 1, refunded: 0, revenue_cents: 24_000 },
            by_event: vec![],
        };
        let value = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(value["events"], 2);
        assert_eq!(value["paid"], 2);
        assert_eq!(value["revenue_cents"], 24_000);
        assert!(value["by_event"].as_array().unwrap().is_empty());
    }
}
