use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::clock::Clock;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::state::AppState;

use super::client_ip;

/// Idle clients are pruned once every this many checks
const PRUNE_EVERY: u64 = 1024;

/// Per-client limiter for login and registration.
///
/// State lives in process memory only. `reset` swaps in a fresh limiter so
/// operators can clear lockouts without restarting the server.
#[derive(Clone)]
pub struct AuthRateLimiter {
    enabled: bool,
    quota: Quota,
    limiter: Arc<RwLock<Arc<DefaultKeyedRateLimiter<String>>>>,
    checks: Arc<AtomicU64>,
}

impl AuthRateLimiter {
    pub fn new(api: &ApiConfig) -> Self {
        let quota = Self::quota(api.rate_limit_requests, api.rate_limit_window_secs);
        Self {
            enabled: api.enable_rate_limiting,
            quota,
            limiter: Arc::new(RwLock::new(Arc::new(RateLimiter::keyed(quota)))),
            checks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// `requests` per `window_secs`, all of them available as an initial burst
    fn quota(requests: u32, window_secs: u64) -> Quota {
        let burst = NonZeroU32::new(requests.max(1)).unwrap_or(NonZeroU32::MIN);
        let period = Duration::from_secs(window_secs.max(1)) / burst.get();
        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_minute(burst))
            .allow_burst(burst)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn current(&self) -> Arc<DefaultKeyedRateLimiter<String>> {
        self.limiter
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Ok when the request may proceed, otherwise how long to wait
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % PRUNE_EVERY == 0 {
            self.prune();
        }

        let limiter = self.current();
        limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(limiter.clock().now()))
    }

    /// Drop clients whose budget has fully refilled; returns how many remain tracked
    pub fn prune(&self) -> usize {
        let limiter = self.current();
        limiter.retain_recent();
        limiter.shrink_to_fit();
        limiter.len()
    }

    /// Forget every tracked client; returns how many were tracked
    pub fn reset(&self) -> usize {
        let mut guard = self
            .limiter
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let cleared = guard.len();
        *guard = Arc::new(RateLimiter::keyed(self.quota));
        tracing::info!("Auth rate limiter reset ({} tracked clients cleared)", cleared);
        cleared
    }
}

pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.rate_limiter.enabled() {
        return next.run(request).await;
    }

    let key = client_ip(&request, state.config.api.trust_forwarded_for);
    match state.rate_limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            let mut response =
                ApiError::too_many_requests("Too many attempts, please try again later").into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(wait.as_secs().max(1)));
            response
        }
    }
}
