// handlers/protected/auth/me.rs - GET /api/auth/me handler

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::auth::dashboard_route;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<Role>,
    pub dashboard_route: &'static str,
}

/// Roles come from the database, not the token, so grants show up immediately
pub async fn me_get(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<CurrentUser> {
    let users = UserService::new(state.pool.clone());
    let user = users.find_by_id(auth.id).await?;
    let roles = users.roles_for(auth.id).await?;

    Ok(ApiResponse::success(CurrentUser {
        dashboard_route: dashboard_route(&roles),
        user,
        roles,
    }))
}
