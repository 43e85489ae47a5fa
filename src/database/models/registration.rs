use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub runner_id: Uuid,
    pub payment_status: PaymentStatus,
    pub amount_cents: i64,
    pub confirmation_code: String,
    pub payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration joined with the event it belongs to, as shown to runners
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RunnerRegistration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub event_starts_at: DateTime<Utc>,
    pub event_city: String,
    pub payment_status: PaymentStatus,
    pub amount_cents: i64,
    pub confirmation_code: String,
    pub created_at: DateTime<Utc>,
}

/// Registration joined with runner contact data, as shown to organizers and admins
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RegistrationReportRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub runner_id: Uuid,
    pub runner_name: String,
    pub runner_email: String,
    pub payment_status: PaymentStatus,
    pub amount_cents: i64,
    pub confirmation_code: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentHistoryEntry {
    pub registration_id: Uuid,
    pub event_title: String,
    pub confirmation_code: String,
    pub amount_cents: i64,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
