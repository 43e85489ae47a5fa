use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::services::UserService;
use crate::state::AppState;
use crate::types::Role;

use super::auth::AuthUser;

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticated(&request)?;
    ensure_role(&state, user, &[Role::Admin]).await?;
    Ok(next.run(request).await)
}

/// Organizer routes also admit admins
pub async fn require_organizer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticated(&request)?;
    ensure_role(&state, user, &[Role::Organizer, Role::Admin]).await?;
    Ok(next.run(request).await)
}

/// Admins pass so they can look up any registration
pub async fn require_runner(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticated(&request)?;
    ensure_role(&state, user, &[Role::Runner, Role::Admin]).await?;
    Ok(next.run(request).await)
}

fn authenticated(request: &Request) -> Result<AuthUser, ApiError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

/// Token roles are a fast reject; the database has the final word so revoked
/// roles stop working before the token expires.
async fn ensure_role(state: &AppState, user: AuthUser, allowed: &[Role]) -> Result<(), ApiError> {
    let claimed: Vec<Role> = allowed
        .iter()
        .copied()
        .filter(|role| user.roles.contains(role))
        .collect();

    if claimed.is_empty() {
        return Err(ApiError::forbidden(format!("{} role required", allowed[0])));
    }

    let users = UserService::new(state.pool.clone());
    for role in claimed {
        if users.has_role(user.id, role).await? {
            return Ok(());
        }
    }

    tracing::warn!("User {} presented role claims no longer held", user.id);
    Err(ApiError::forbidden("Role has been revoked"))
}
