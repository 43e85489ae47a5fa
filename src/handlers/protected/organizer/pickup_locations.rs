use axum::{
    extract::State,
    Extension,
};
use uuid::Uuid;

use crate::database::models::KitPickupLocation;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{PickupLocationInput, PickupLocationService};
use crate::state::AppState;
use crate::validation::{ApiPath, ValidatedJson};

/// POST /api/organizer/events/:id/pickup-locations
pub async fn pickup_location_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(event_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<PickupLocationInput>,
) -> ApiResult<KitPickupLocation> {
    let location = PickupLocationService::new(state.pool.clone())
        .create(event_id, auth.owner_scope(), &body)
        .await?;
    Ok(ApiResponse::created(location))
}

/// PUT /api/organizer/pickup-locations/:id
pub async fn pickup_location_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<PickupLocationInput>,
) -> ApiResult<KitPickupLocation> {
    let location = PickupLocationService::new(state.pool.clone())
        .update(id, auth.owner_scope(), &body)
        .await?;
    Ok(ApiResponse::success(location))
}

/// DELETE /api/organizer/pickup-locations/:id
pub async fn pickup_location_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    PickupLocationService::new(state.pool.clone())
        .delete(id, auth.owner_scope())
        .await?;
    Ok(ApiResponse::no_content())
}
