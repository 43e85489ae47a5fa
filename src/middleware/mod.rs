pub mod auth;
pub mod rate_limit;
pub mod response;
pub mod roles;
pub mod security_log;
pub mod webhook;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use rate_limit::{rate_limit_middleware, AuthRateLimiter};
pub use response::{ApiResponse, ApiResult};
pub use roles::{require_admin, require_organizer, require_runner};
pub use security_log::security_log_middleware;
pub use webhook::asaas_webhook_middleware;

use axum::extract::{ConnectInfo, Request};
use std::net::SocketAddr;

/// Client address: the socket peer, or the first `x-forwarded-for` hop when
/// the deployment sits behind a trusted proxy
pub fn client_ip(request: &Request, trust_forwarded_for: bool) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| trust_forwarded_for && !v.is_empty())
    {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(peer: Option<&str>) -> Request {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn forwarded_header_needs_trusted_proxy() {
        assert_eq!(client_ip(&request(Some("192.0.2.1:5000")), false), "192.0.2.1");
        assert_eq!(client_ip(&request(Some("192.0.2.1:5000")), true), "203.0.113.9");
        assert_eq!(client_ip(&request(None), false), "unknown");
    }
}
