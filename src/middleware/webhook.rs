use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;

pub const ASAAS_TOKEN_HEADER: &str = "asaas-access-token";

/// Rejects webhook calls whose shared-secret header does not match `ASAAS_WEBHOOK_TOKEN`
pub async fn asaas_webhook_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state
        .config
        .security
        .asaas_webhook_token
        .as_deref()
        .ok_or_else(|| {
            tracing::error!("ASAAS_WEBHOOK_TOKEN is not configured; rejecting webhook");
            ApiError::service_unavailable("Webhook receiver is not configured")
        })?;

    let provided = request
        .headers()
        .get(ASAAS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing webhook token"))?;

    if !tokens_match(provided, expected) {
        return Err(ApiError::unauthorized("Invalid webhook token"));
    }

    Ok(next.run(request).await)
}

/// Compares fixed-length digests so timing does not depend on where the inputs differ
pub fn tokens_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
