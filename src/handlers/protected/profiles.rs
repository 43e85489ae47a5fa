// handlers/protected/profiles.rs - /api/profiles/me handlers

use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ProfileUpdate, UserService};
use crate::state::AppState;
use crate::validation::ValidatedJson;

pub async fn profile_get(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<User> {
    let user = UserService::new(state.pool.clone()).find_by_id(auth.id).await?;
    Ok(ApiResponse::success(user))
}

/// Partial update; omitted fields keep their value
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> ApiResult<User> {
    let user = UserService::new(state.pool.clone())
        .update_profile(auth.id, &update)
        .await?;
    Ok(ApiResponse::success(user))
}
