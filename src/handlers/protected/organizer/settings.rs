use axum::{extract::State, Extension};

use crate::database::models::OrganizerSettings;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{OrganizerSettingsInput, SettingsService};
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// GET /api/organizer/settings - `data: null` until first saved
pub async fn settings_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Option<OrganizerSettings>> {
    let settings = SettingsService::new(state.pool.clone()).organizer(auth.id).await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/organizer/settings
pub async fn settings_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<OrganizerSettingsInput>,
) -> ApiResult<OrganizerSettings> {
    let settings = SettingsService::new(state.pool.clone())
        .upsert_organizer(auth.id, &body)
        .await?;
    Ok(ApiResponse::success(settings))
}
