use axum::{
    extract::State,
    Extension,
};

use crate::database::models::{Registration, RegistrationReportRow, RunnerRegistration};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{NewRegistration, RegistrationService};
use crate::state::AppState;
use crate::validation::{ApiPath, ValidatedJson};

/// POST /api/runner/registrations
pub async fn registration_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewRegistration>,
) -> ApiResult<Registration> {
    let registration = RegistrationService::new(state.pool.clone())
        .create(auth.id, body.event_id)
        .await?;
    Ok(ApiResponse::created(registration))
}

/// GET /api/runner/registrations
pub async fn registrations_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<RunnerRegistration>> {
    let registrations = RegistrationService::new(state.pool.clone())
        .list_for_runner(auth.id)
        .await?;
    Ok(ApiResponse::success(registrations))
}

/// GET /api/runner/registrations/:code - Runners see their own, admins any
pub async fn registration_by_code(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<RegistrationReportRow> {
    let registration = RegistrationService::new(state.pool.clone())
        .find_by_code(&code, auth.owner_scope())
        .await?;
    Ok(ApiResponse::success(registration))
}
