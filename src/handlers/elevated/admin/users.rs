use axum::{
    extract::State,
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::UserSummary;
use crate::error::{ApiError, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::event_service::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::services::UserService;
use crate::state::AppState;
use crate::types::Role;
use crate::validation::{ApiPath, ApiQuery, Validate, ValidatedJson};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

impl Validate for RoleRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RoleChange {
    pub user_id: Uuid,
    pub role: Role,
    /// False when the request was a no-op
    pub changed: bool,
    pub roles: Vec<Role>,
}

/// GET /api/admin/users
pub async fn users_list(State(state): State<AppState>, ApiQuery(page): ApiQuery<PageQuery>) -> ApiResult<Vec<UserSummary>> {
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = page.offset.unwrap_or(0).max(0);

    let users = UserService::new(state.pool.clone()).list_users(limit, offset).await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/admin/users/:id/roles
pub async fn role_grant(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<RoleRequest>,
) -> ApiResult<RoleChange> {
    let users = UserService::new(state.pool.clone());
    users.find_by_id(user_id).await?;

    let changed = users.grant_role(user_id, body.role).await?;
    let roles = users.roles_for(user_id).await?;

    Ok(ApiResponse::success(RoleChange { user_id, role: body.role, changed, roles }))
}

/// DELETE /api/admin/users/:id/roles/:role
pub async fn role_revoke(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath((user_id, role)): ApiPath<(Uuid, String)>,
) -> ApiResult<RoleChange> {
    let role: Role = role.parse().map_err(|e: String| ApiError::invalid_field("role", e))?;

    if user_id == auth.id && role == Role::Admin {
        return Err(ApiError::bad_request("Admins cannot revoke their own admin role"));
    }

    let users = UserService::new(state.pool.clone());
    users.find_by_id(user_id).await?;

    let changed = users.revoke_role(user_id, role).await?;
    let roles = users.roles_for(user_id).await?;

    Ok(ApiResponse::success(RoleChange { user_id, role, changed, roles }))
}
