// handlers/public/address.rs - GET /api/address/cep/:cep handler

use axum::extract::State;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::address_service::{normalize_cep, Address};
use crate::state::AppState;
use crate::validation::ApiPath;

pub async fn cep_lookup(State(state): State<AppState>, ApiPath(raw): ApiPath<String>) -> ApiResult<Address> {
    let cep = normalize_cep(&raw).ok_or_else(|| ApiError::invalid_field("cep", "CEP must have 8 digits"))?;

    match state.address_lookup.lookup(&cep).await {
        Ok(Some(address)) => Ok(ApiResponse::success(address)),
        Ok(None) => Err(ApiError::not_found("CEP not found")),
        Err(e) => {
            tracing::warn!("CEP lookup for {} failed: {}", cep, e);
            Err(ApiError::bad_gateway("Address lookup service unavailable"))
        }
    }
}
