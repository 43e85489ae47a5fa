use axum::extract::State;

use crate::database::models::RegistrationReportRow;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{RegistrationReportQuery, RegistrationService};
use crate::state::AppState;
use crate::validation::ApiQuery;

/// GET /api/admin/registrations?status=&event_id=
pub async fn registrations_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RegistrationReportQuery>,
) -> ApiResult<Vec<RegistrationReportRow>> {
    let rows = RegistrationService::new(state.pool.clone()).report(&query).await?;
    Ok(ApiResponse::success(rows))
}
