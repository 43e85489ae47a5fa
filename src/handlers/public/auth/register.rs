// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::State;
use serde::Deserialize;

use crate::auth::hash_password;
use crate::error::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use crate::validation::{Validate, ValidatedJson, Validator};

use super::utils::{issue_session, AuthSession};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .email("email", self.email.trim())
            .max_len("email", &self.email, 254)
            .password("password", &self.password)
            .required("full_name", &self.full_name)
            .max_len("full_name", &self.full_name, 120)
            .finish()
    }
}

/// POST /api/auth/register - Create a runner account and sign it in
pub async fn register_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<AuthSession> {
    let users = UserService::new(state.pool.clone());

    let password_hash = hash_password(&body.password, state.config.security.bcrypt_cost)?;
    let user = users
        .create_user(&body.email, &password_hash, body.full_name.trim())
        .await?;

    let roles = users.roles_for(user.id).await?;
    let session = issue_session(&state, user, roles)?;

    Ok(ApiResponse::created(session))
}
