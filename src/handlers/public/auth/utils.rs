use serde::Serialize;

use crate::auth::{dashboard_route, generate_jwt, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Role;

/// Body returned by login and register
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
    pub roles: Vec<Role>,
    pub dashboard_route: &'static str,
}

pub fn issue_session(state: &AppState, user: User, roles: Vec<Role>) -> Result<AuthSession, ApiError> {
    let security = &state.config.security;
    let claims = Claims::new(user.id, user.email.clone(), roles.clone(), security.jwt_expiry_hours);
    let token = generate_jwt(&claims, security)?;

    Ok(AuthSession {
        token,
        expires_in: security.jwt_expiry_hours * 3600,
        dashboard_route: dashboard_route(&roles),
        user,
        roles,
    })
}
