use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{PaymentHistoryEntry, Registration, RegistrationReportRow, RunnerRegistration};
use crate::database::DatabaseError;
use crate::error::FieldErrors;
use crate::types::PaymentStatus;
use crate::validation::{Validate, Validator};

const REGISTRATION_COLUMNS: &str = "id, event_id, runner_id, payment_status, amount_cents, confirmation_code, payment_id, paid_at, created_at, updated_at";

const REPORT_SELECT: &str = r#"
    SELECT r.id, r.event_id, e.title AS event_title, r.runner_id,
           u.full_name AS runner_name, u.email AS runner_email,
           r.payment_status, r.amount_cents, r.confirmation_code, r.paid_at, r.created_at
    FROM registrations r
    JOIN events e ON e.id = r.event_id
    JOIN users u ON u.id = r.runner_id
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
    pub event_id: Uuid,
}

impl Validate for NewRegistration {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .check("event_id", !self.event_id.is_nil(), "This field is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationReportQuery {
    pub status: Option<PaymentStatus>,
    pub event_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// How a payment notification identifies its registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentReference {
    RegistrationId(Uuid),
    ConfirmationCode(String),
}

impl PaymentReference {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match Uuid::parse_str(raw) {
            Ok(id) => PaymentReference::RegistrationId(id),
            Err(_) => PaymentReference::ConfirmationCode(raw.to_uppercase()),
        })
    }
}

/// Fresh codes tried before giving up on an insert
const CODE_ATTEMPTS: usize = 5;

/// `RH-` followed by eight uppercase hex characters
pub fn generate_confirmation_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("RH-{}", id[..8].to_uppercase())
}

pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a runner for a published event. Free events are confirmed as paid immediately.
    pub async fn create(&self, runner_id: Uuid, event_id: Uuid) -> Result<Registration, DatabaseError> {
        let codes = std::iter::repeat_with(generate_confirmation_code).take(CODE_ATTEMPTS);
        self.create_with_codes(runner_id, event_id, codes).await
    }

    /// Insert using the first candidate code not already taken
    async fn create_with_codes(
        &self,
        runner_id: Uuid,
        event_id: Uuid,
        codes: impl IntoIterator<Item = String>,
    ) -> Result<Registration, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Lock the event row so concurrent registrations see a consistent head count
        let event: Option<(i64, Option<i32>)> = sqlx::query_as(
            "SELECT price_cents, max_participants FROM events WHERE id = $1 AND status = 'published' FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (price_cents, max_participants) =
            event.ok_or_else(|| DatabaseError::NotFound(format!("Event {} not found", event_id)))?;

        let already_registered: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE event_id = $1 AND runner_id = $2)",
        )
        .bind(event_id)
        .bind(runner_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_registered {
            return Err(DatabaseError::Conflict("Already registered for this event".to_string()));
        }

        if let Some(max) = max_participants {
            let taken: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND payment_status <> 'refunded'",
            )
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;

            if taken >= i64::from(max) {
                return Err(DatabaseError::Conflict("Event is full".to_string()));
            }
        }

        let (status, paid_at): (PaymentStatus, Option<DateTime<Utc>>) = if price_cents == 0 {
            (PaymentStatus::Paid, Some(Utc::now()))
        } else {
            (PaymentStatus::Pending, None)
        };

        let mut inserted = None;
        for code in codes {
            inserted = sqlx::query_as::<_, Registration>(&format!(
                r#"
                INSERT INTO registrations (event_id, runner_id, payment_status, amount_cents, confirmation_code, paid_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (confirmation_code) DO NOTHING
                RETURNING {}
                "#,
                REGISTRATION_COLUMNS
            ))
            .bind(event_id)
            .bind(runner_id)
            .bind(status)
            .bind(price_cents)
            .bind(&code)
            .bind(paid_at)
            .fetch_optional(&mut *tx)
            .await?;

            if inserted.is_some() {
                break;
            }
            tracing::warn!("Confirmation code {} already taken, retrying", code);
        }

        let registration = inserted
            .ok_or_else(|| DatabaseError::Conflict("Could not allocate a confirmation code".to_string()))?;

        tx.commit().await?;
        tracing::info!(
            "Runner {} registered for event {} ({})",
            runner_id,
            event_id,
            registration.confirmation_code
        );
        Ok(registration)
    }

    pub async fn list_for_runner(&self, runner_id: Uuid) -> Result<Vec<RunnerRegistration>, DatabaseError> {
        let rows = sqlx::query_as::<_, RunnerRegistration>(
            r#"
            SELECT r.id, r.event_id, e.title AS event_title, e.starts_at AS event_starts_at,
                   e.city AS event_city, r.payment_status, r.amount_cents,
                   r.confirmation_code, r.created_at
            FROM registrations r
            JOIN events e ON e.id = r.event_id
            WHERE r.runner_id = $1
            ORDER BY e.starts_at DESC
            "#,
        )
        .bind(runner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lookup by confirmation code. `runner = None` allows any registration (admin).
    pub async fn find_by_code(&self, code: &str, runner: Option<Uuid>) -> Result<RegistrationReportRow, DatabaseError> {
        sqlx::query_as::<_, RegistrationReportRow>(&format!(
            "{} WHERE r.confirmation_code = $1 AND ($2::uuid IS NULL OR r.runner_id = $2)",
            REPORT_SELECT
        ))
        .bind(code.trim().to_uppercase())
        .bind(runner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Registration {} not found", code)))
    }

    pub async fn payment_history(&self, runner_id: Uuid) -> Result<Vec<PaymentHistoryEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentHistoryEntry>(
            r#"
            SELECT r.id AS registration_id, e.title AS event_title, r.confirmation_code,
                   r.amount_cents, r.payment_status, r.payment_id, r.paid_at, r.created_at
            FROM registrations r
            JOIN events e ON e.id = r.event_id
            WHERE r.runner_id = $1
            ORDER BY COALESCE(r.paid_at, r.created_at) DESC
            "#,
        )
        .bind(runner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<RegistrationReportRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, RegistrationReportRow>(&format!(
            "{} WHERE r.event_id = $1 ORDER BY r.created_at ASC",
            REPORT_SELECT
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn report(&self, query: &RegistrationReportQuery) -> Result<Vec<RegistrationReportRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, RegistrationReportRow>(&format!(
            r#"{}
            WHERE ($1::payment_status IS NULL OR r.payment_status = $1)
              AND ($2::uuid IS NULL OR r.event_id = $2)
            ORDER BY r.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            REPORT_SELECT
        ))
        .bind(query.status)
        .bind(query.event_id)
        .bind(query.limit.unwrap_or(100).clamp(1, 1000))
        .bind(query.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Apply a status change reported by the payment provider.
    ///
    /// Refunds are final: a late or repeated confirmation for a refunded
    /// registration leaves it untouched, since its seat may already be taken.
    pub async fn apply_payment_update(
        &self,
        reference: &PaymentReference,
        status: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<PaymentUpdate, DatabaseError> {
        let (id_bind, code_bind) = match reference {
            PaymentReference::RegistrationId(id) => (Some(*id), None),
            PaymentReference::ConfirmationCode(code) => (None, Some(code.as_str())),
        };

        let updated = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations SET
                payment_status = $1,
                payment_id     = COALESCE($2, payment_id),
                paid_at        = CASE WHEN $1 = 'paid'::payment_status THEN COALESCE(paid_at, $3) ELSE paid_at END,
                updated_at     = now()
            WHERE (($4::uuid IS NOT NULL AND id = $4)
                OR ($5::text IS NOT NULL AND confirmation_code = $5))
              AND NOT (payment_status = 'refunded'::payment_status AND $1 <> 'refunded'::payment_status)
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(status)
        .bind(payment_id)
        .bind(Utc::now())
        .bind(id_bind)
        .bind(code_bind)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(registration) = updated {
            tracing::info!(
                "Registration {} payment status set to {}",
                registration.id,
                registration.payment_status
            );
            return Ok(PaymentUpdate::Applied(registration));
        }

        let current = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {} FROM registrations
            WHERE ($1::uuid IS NOT NULL AND id = $1)
               OR ($2::text IS NOT NULL AND confirmation_code = $2)
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(id_bind)
        .bind(code_bind)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Registration for payment not found".to_string()))?;

        tracing::warn!(
            "Registration {} is {}; ignoring payment update to {}",
            current.id,
            current.payment_status,
            status
        );
        Ok(PaymentUpdate::Ignored(current))
    }
}

/// Result of applying a provider notification
#[derive(Debug, Clone)]
pub enum PaymentUpdate {
    Applied(Registration),
    /// The registration exists but may not move to the reported status
    Ignored(Registration),
}
