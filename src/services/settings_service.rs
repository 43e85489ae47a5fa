use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{HomePageSettings, OrganizerSettings};
use crate::database::DatabaseError;
use crate::error::FieldErrors;
use crate::validation::{Validate, Validator};

#[derive(Debug, Clone, Deserialize)]
pub struct HomePageSettingsInput {
    pub hero_title: String,
    pub hero_subtitle: Option<String>,
    pub hero_image_url: Option<String>,
    pub about_text: Option<String>,
    pub contact_email: Option<String>,
    pub featured_event_id: Option<Uuid>,
}

impl Validate for HomePageSettingsInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("hero_title", &self.hero_title)
            .max_len("hero_title", &self.hero_title, 160)
            .optional_max_len("hero_subtitle", self.hero_subtitle.as_deref(), 300)
            .optional_url("hero_image_url", self.hero_image_url.as_deref())
            .optional_max_len("about_text", self.about_text.as_deref(), 5_000)
            .optional_email("contact_email", self.contact_email.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizerSettingsInput {
    pub organization_name: String,
    pub document: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub pix_key: Option<String>,
}

impl Validate for OrganizerSettingsInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("organization_name", &self.organization_name)
            .max_len("organization_name", &self.organization_name, 160)
            .optional_max_len("document", self.document.as_deref(), 20)
            .optional_email("contact_email", self.contact_email.as_deref())
            .optional_max_len("contact_phone", self.contact_phone.as_deref(), 20)
            .optional_url("website", self.website.as_deref())
            .optional_url("logo_url", self.logo_url.as_deref())
            .optional_max_len("pix_key", self.pix_key.as_deref(), 140)
            .finish()
    }
}

pub struct SettingsService {
    pool: PgPool,
}

impl SettingsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn home_page(&self) -> Result<HomePageSettings, DatabaseError> {
        sqlx::query_as::<_, HomePageSettings>(
            r#"
            SELECT hero_title, hero_subtitle, hero_image_url, about_text, contact_email,
                   featured_event_id, updated_at, updated_by
            FROM home_page_settings WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Home page settings not found".to_string()))
    }

    pub async fn update_home_page(
        &self,
        input: &HomePageSettingsInput,
        updated_by: Uuid,
    ) -> Result<HomePageSettings, DatabaseError> {
        let settings = sqlx::query_as::<_, HomePageSettings>(
            r#"
            INSERT INTO home_page_settings
                (id, hero_title, hero_subtitle, hero_image_url, about_text, contact_email, featured_event_id, updated_by, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, now())
            ON CONFLICT (id) DO UPDATE SET
                hero_title        = EXCLUDED.hero_title,
                hero_subtitle     = EXCLUDED.hero_subtitle,
                hero_image_url    = EXCLUDED.hero_image_url,
                about_text        = EXCLUDED.about_text,
                contact_email     = EXCLUDED.contact_email,
                featured_event_id = EXCLUDED.featured_event_id,
                updated_by        = EXCLUDED.updated_by,
                updated_at        = now()
            RETURNING hero_title, hero_subtitle, hero_image_url, about_text, contact_email,
                      featured_event_id, updated_at, updated_by
            "#,
        )
        .bind(input.hero_title.trim())
        .bind(input.hero_subtitle.as_deref())
        .bind(input.hero_image_url.as_deref())
        .bind(input.about_text.as_deref())
        .bind(input.contact_email.as_deref())
        .bind(input.featured_event_id)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Home page settings updated by {}", updated_by);
        Ok(settings)
    }

    /// `None` until the organizer saves their profile for the first time
    pub async fn organizer(&self, organizer_id: Uuid) -> Result<Option<OrganizerSettings>, DatabaseError> {
        let settings = sqlx::query_as::<_, OrganizerSettings>(
            r#"
            SELECT organizer_id, organization_name, document, contact_email, contact_phone,
                   website, logo_url, pix_key, updated_at
            FROM organizer_settings WHERE organizer_id = $1
            "#,
        )
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(settings)
    }

    pub async fn upsert_organizer(
        &self,
        organizer_id: Uuid,
        input: &OrganizerSettingsInput,
    ) -> Result<OrganizerSettings, DatabaseError> {
        let settings = sqlx::query_as::<_, OrganizerSettings>(
            r#"
            INSERT INTO organizer_settings
                (organizer_id, organization_name, document, contact_email, contact_phone, website, logo_url, pix_key, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            ON CONFLICT (organizer_id) DO UPDATE SET
                organization_name = EXCLUDED.organization_name,
                document          = EXCLUDED.document,
                contact_email     = EXCLUDED.contact_email,
                contact_phone     = EXCLUDED.contact_phone,
                website           = EXCLUDED.website,
                logo_url          = EXCLUDED.logo_url,
                pix_key           = EXCLUDED.pix_key,
                updated_at        = now()
            RETURNING organizer_id, organization_name, document, contact_email, contact_phone,
                      website, logo_url, pix_key, updated_at
            "#,
        )
        .bind(organizer_id)
        .bind(input.organization_name.trim())
        .bind(input.document.as_deref())
        .bind(input.contact_email.as_deref())
        .bind(input.contact_phone.as_deref())
        .bind(input.website.as_deref())
        .bind(input.logo_url.as_deref())
        .bind(input.pix_key.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_page_requires_title_and_valid_email() {
        let input = HomePageSettingsInput {
            hero_title: " ".into(),
            hero_subtitle: None,
            hero_image_url: Some("ftp://nope".into()),
            about_text: None,
            contact_email: Some("contato".into()),
            featured_event_id: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.contains_key("hero_title"));
        assert!(errors.contains_key("hero_image_url"));
        assert!(errors.contains_key("contact_email"));
    }

    #[test]
    fn organizer_settings_minimal() {
        let input = OrganizerSettingsInput {
            organization_name: "Clube de Corrida Paulista".into(),
            document: None,
            contact_email: Some("".into()),
            contact_phone: None,
            website: Some("https://clube.example.com".into()),
            logo_url: None,
            pix_key: None,
        };
        assert!(input.validate().is_ok());
    }
}
