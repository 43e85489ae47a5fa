use axum::{extract::State, Extension};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{OrganizerDashboard, StatsService};
use crate::state::AppState;

/// GET /api/organizer/dashboard - Admins get platform-wide figures
pub async fn dashboard_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<OrganizerDashboard> {
    let dashboard = StatsService::new(state.pool.clone())
        .organizer_dashboard(auth.owner_scope())
        .await?;
    Ok(ApiResponse::success(dashboard))
}
