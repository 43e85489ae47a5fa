// handlers/public/home_page.rs - GET /api/home-page-settings handler

use axum::extract::State;

use crate::database::models::HomePageSettings;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SettingsService;
use crate::state::AppState;

pub async fn home_page_get(State(state): State<AppState>) -> ApiResult<HomePageSettings> {
    let settings = SettingsService::new(state.pool.clone()).home_page().await?;
    Ok(ApiResponse::success(settings))
}
