use axum::{
    extract::State,
    Extension,
};
use uuid::Uuid;

use crate::database::models::{Event, RegistrationReportRow};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{EventService, EventUpdate, NewEvent, RegistrationService};
use crate::state::AppState;
use crate::validation::{ApiPath, ValidatedJson};

/// GET /api/organizer/events - Own events in any status
pub async fn events_list(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<Event>> {
    let events = EventService::new(state.pool.clone())
        .list_for_organizer(auth.id)
        .await?;
    Ok(ApiResponse::success(events))
}

/// GET /api/organizer/events/:id
pub async fn event_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Event> {
    let event = EventService::new(state.pool.clone())
        .get_managed(id, auth.owner_scope())
        .await?;
    Ok(ApiResponse::success(event))
}

/// POST /api/organizer/events
pub async fn event_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewEvent>,
) -> ApiResult<Event> {
    let event = EventService::new(state.pool.clone()).create(auth.id, &body).await?;
    Ok(ApiResponse::created(event))
}

/// PUT /api/organizer/events/:id
pub async fn event_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<EventUpdate>,
) -> ApiResult<Event> {
    let event = EventService::new(state.pool.clone())
        .update(id, auth.owner_scope(), &body)
        .await?;
    Ok(ApiResponse::success(event))
}

/// GET /api/organizer/events/:id/registrations
pub async fn event_registrations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<RegistrationReportRow>> {
    EventService::new(state.pool.clone())
        .get_managed(id, auth.owner_scope())
        .await?;

    let registrations = RegistrationService::new(state.pool.clone())
        .list_for_event(id)
        .await?;
    Ok(ApiResponse::success(registrations))
}
