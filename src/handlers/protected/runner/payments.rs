use axum::{extract::State, Extension};

use crate::database::models::PaymentHistoryEntry;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::RegistrationService;
use crate::state::AppState;

/// GET /api/runner/payments - Newest first
pub async fn payments_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<PaymentHistoryEntry>> {
    let history = RegistrationService::new(state.pool.clone())
        .payment_history(auth.id)
        .await?;
    Ok(ApiResponse::success(history))
}
