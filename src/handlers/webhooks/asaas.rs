// handlers/webhooks/asaas.rs - POST /api/webhooks/asaas handler

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AsaasWebhook, PaymentWebhookService, WebhookOutcome};
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// Events we do not act on are acknowledged with `processed: false` so Asaas
/// does not queue retries for them.
pub async fn asaas_post(
    State(state): State<AppState>,
    ValidatedJson(webhook): ValidatedJson<AsaasWebhook>,
) -> ApiResult<WebhookOutcome> {
    let outcome = PaymentWebhookService::new(state.pool.clone()).handle(webhook).await?;
    Ok(ApiResponse::success(outcome))
}
