use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Singleton row (id = 1) holding the public landing page content
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HomePageSettings {
    pub hero_title: String,
    pub hero_subtitle: Option<String>,
    pub hero_image_url: Option<String>,
    pub about_text: Option<String>,
    pub contact_email: Option<String>,
    pub featured_event_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrganizerSettings {
    pub organizer_id: Uuid,
    pub organization_name: String,
    pub document: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub pix_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}
