use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

use super::client_ip;

/// Emits `security` events for rejected requests after the handler has responded
pub async fn security_log_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let ip = client_ip(&request, state.config.api.trust_forwarded_for);

    let response = next.run(request).await;
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!(
                target: "security",
                %method,
                %path,
                %ip,
                status = status.as_u16(),
                "request rejected"
            );
        }
        s if s.is_server_error() => {
            tracing::error!(
                target: "security",
                %method,
                %path,
                %ip,
                status = s.as_u16(),
                "request failed"
            );
        }
        s if path.starts_with("/api/webhooks") && !s.is_success() => {
            tracing::warn!(
                target: "security",
                %method,
                %path,
                %ip,
                status = s.as_u16(),
                "webhook not accepted"
            );
        }
        _ => {}
    }

    response
}
