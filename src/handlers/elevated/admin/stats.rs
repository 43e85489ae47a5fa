use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AdminStats, StatsService};
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn stats_get(State(state): State<AppState>) -> ApiResult<AdminStats> {
    let stats = StatsService::new(state.pool.clone()).admin_stats().await?;
    Ok(ApiResponse::success(stats))
}
