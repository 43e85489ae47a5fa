use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{User, UserSummary};
use crate::database::DatabaseError;
use crate::error::FieldErrors;
use crate::types::Role;
use crate::validation::{Validate, Validator};

const USER_COLUMNS: &str = "id, email, password_hash, full_name, phone, document, birth_date, city, state, created_at, updated_at";

/// Fields a user may change on their own profile; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(name) = &self.full_name {
            v.required("full_name", name).max_len("full_name", name, 120);
        }
        v.optional_max_len("phone", self.phone.as_deref(), 20)
            .optional_max_len("document", self.document.as_deref(), 20)
            .optional_max_len("city", self.city.as_deref(), 80);
        if let Some(state) = &self.state {
            v.check("state", state.trim().len() == 2, "Use the two-letter state code");
        }
        if let Some(birth_date) = self.birth_date {
            v.check(
                "birth_date",
                birth_date < chrono::Utc::now().date_naive(),
                "Birth date must be in the past",
            );
        }
        v.finish()
    }
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Create a user holding the runner role
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, full_name) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Self::normalize_email(email))
        .bind(password_hash)
        .bind(full_name.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(e).on_conflict("Email already registered"))?;

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user.id)
            .bind(Role::Runner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(Self::normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    pub async fn roles_for(&self, user_id: Uuid) -> Result<Vec<Role>, DatabaseError> {
        let roles = sqlx::query_scalar::<_, Role>("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    pub async fn has_role(&self, user_id: Uuid, role: Role) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Returns false when the user already held the role
    pub async fn grant_role(&self, user_id: Uuid, role: Role) -> Result<bool, DatabaseError> {
        let result = sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT (user_id, role) DO NOTHING")
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::NotFound(_) => DatabaseError::NotFound(format!("User {} not found", user_id)),
                other => other,
            })?;

        if result.rows_affected() > 0 {
            tracing::info!("Granted role {} to user {}", role, user_id);
        }
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when the user did not hold the role
    pub async fn revoke_role(&self, user_id: Uuid, role: Role) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Revoked role {} from user {}", role, user_id);
        }
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                full_name  = COALESCE($2, full_name),
                phone      = COALESCE($3, phone),
                document   = COALESCE($4, document),
                birth_date = COALESCE($5, birth_date),
                city       = COALESCE($6, city),
                state      = COALESCE(UPPER($7), state),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(update.full_name.as_deref().map(str::trim))
        .bind(update.phone.as_deref())
        .bind(update.document.as_deref())
        .bind(update.birth_date)
        .bind(update.city.as_deref())
        .bind(update.state.as_deref().map(str::trim))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", user_id)))
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<UserSummary>, DatabaseError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.email, u.full_name, u.created_at,
                   COALESCE(array_agg(ur.role::text ORDER BY ur.role) FILTER (WHERE ur.role IS NOT NULL), '{}') AS roles
            FROM users u
            LEFT JOIN user_roles ur ON ur.user_id = u.id
            GROUP BY u.id
            ORDER BY u.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
