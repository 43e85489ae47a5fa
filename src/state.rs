use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::decoy_password_hash;
use crate::config::AppConfig;
use crate::middleware::AuthRateLimiter;
use crate::services::address_service::{AddressLookup, ViaCepClient};

/// Shared handles every handler and middleware can reach
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub rate_limiter: AuthRateLimiter,
    pub address_lookup: Arc<dyn AddressLookup>,
    /// Verified against when a login names an unknown email
    pub decoy_password_hash: Arc<str>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, reqwest::Error> {
        let address_lookup = Arc::new(ViaCepClient::new(&config.address)?);
        let decoy = decoy_password_hash(config.security.bcrypt_cost).unwrap_or_else(|e| {
            tracing::warn!("Could not build decoy password hash: {}", e);
            String::new()
        });
        Ok(Self {
            pool,
            decoy_password_hash: decoy.into(),
            rate_limiter: AuthRateLimiter::new(&config.api),
            config: Arc::new(config),
            address_lookup,
        })
    }

    /// Swap the address backend, used by tests to avoid the network
    pub fn with_address_lookup(mut self, lookup: Arc<dyn AddressLookup>) -> Self {
        self.address_lookup = lookup;
        self
    }
}
