use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /api/admin/rate-limit/reset - Clear every auth lockout in this process
pub async fn rate_limit_reset(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let cleared = state.rate_limiter.reset();
    tracing::warn!(target: "security", "Rate limiter reset by {} ({} clients cleared)", auth.id, cleared);

    Ok(ApiResponse::success(json!({
        "enabled": state.rate_limiter.enabled(),
        "cleared": cleared
    })))
}
