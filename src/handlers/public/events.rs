// handlers/public/events.rs - Published event catalogue

use axum::extract::State;
use uuid::Uuid;

use crate::database::models::{Event, KitPickupLocation};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{EventListQuery, EventService, PickupLocationService};
use crate::state::AppState;
use crate::validation::{ApiPath, ApiQuery};

/// GET /api/events - Published events, soonest first
pub async fn events_list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventListQuery>,
) -> ApiResult<Vec<Event>> {
    let events = EventService::new(state.pool.clone()).list_published(&query).await?;
    Ok(ApiResponse::success(events))
}

/// GET /api/events/:id
pub async fn event_get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Event> {
    let event = EventService::new(state.pool.clone()).get_published(id).await?;
    Ok(ApiResponse::success(event))
}

/// GET /api/events/:id/pickup-locations
pub async fn event_pickup_locations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<KitPickupLocation>> {
    // 404 for drafts and unknown ids rather than an empty list
    EventService::new(state.pool.clone()).get_published(id).await?;
    let locations = PickupLocationService::new(state.pool.clone()).list_for_event(id).await?;
    Ok(ApiResponse::success(locations))
}
