// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;
use serde::Deserialize;

use crate::auth::verify_password;
use crate::error::{ApiError, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use crate::validation::{Validate, ValidatedJson, Validator};

use super::utils::{issue_session, AuthSession};

/// Same message for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("email", &self.email)
            .required("password", &self.password)
            .finish()
    }
}

/// POST /api/auth/login - Exchange credentials for a JWT
pub async fn login_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthSession> {
    let users = UserService::new(state.pool.clone());

    let Some(user) = users.find_by_email(&body.email).await? else {
        // Spend the same bcrypt time as a wrong password
        verify_password(&body.password, &state.decoy_password_hash);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&body.password, &user.password_hash) {
        tracing::info!("Failed login for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let roles = users.roles_for(user.id).await?;
    let session = issue_session(&state, user, roles)?;

    Ok(ApiResponse::success(session))
}
