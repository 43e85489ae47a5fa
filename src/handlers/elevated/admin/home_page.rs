// handlers/elevated/admin/home_page.rs - PUT /api/home-page-settings handler

use axum::{extract::State, Extension};

use crate::database::models::HomePageSettings;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{HomePageSettingsInput, SettingsService};
use crate::state::AppState;
use crate::validation::ValidatedJson;

pub async fn home_page_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<HomePageSettingsInput>,
) -> ApiResult<HomePageSettings> {
    let settings = SettingsService::new(state.pool.clone())
        .update_home_page(&body, auth.id)
        .await?;
    Ok(ApiResponse::success(settings))
}
