#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use racehub_api::{
    auth::{generate_jwt, Claims},
    config::AppConfig,
    database::DatabaseManager,
    services::{Address, AddressError, AddressLookup},
    types::Role,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const WEBHOOK_TOKEN: &str = "test-webhook-token";

/// Nothing listens here; requests that reach the database fail fast
const UNREACHABLE_DB: &str = "postgres://racehub@127.0.0.1:1/racehub_test";

/// Development preset with a webhook token and a throwaway uploads dir
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.url = UNREACHABLE_DB.to_string();
    config.database.connection_timeout = 1;
    config.security.asaas_webhook_token = Some(WEBHOOK_TOKEN.to_string());
    config.uploads.dir = std::env::temp_dir().join(format!("racehub-test-{}", Uuid::new_v4()));
    config
}

/// Known CEPs for the stub lookup
pub struct StubAddressLookup;

#[async_trait]
impl AddressLookup for StubAddressLookup {
    async fn lookup(&self, cep: &str) -> Result<Option<Address>, AddressError> {
        match cep {
            "01310100" => Ok(Some(Address {
                cep: "01310-100".to_string(),
                street: "Avenida Paulista".to_string(),
                complement: String::new(),
                neighborhood: "Bela Vista".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
            })),
            "99999999" => Err(AddressError::Upstream("connection reset".to_string())),
            _ => Ok(None),
        }
    }
}

/// State over a lazily connected pool; must be called inside a Tokio runtime
pub fn lazy_state(config: AppConfig) -> AppState {
    let pool = DatabaseManager::connect_lazy(&config.database).expect("lazy pool");
    AppState::new(pool, config)
        .expect("http client")
        .with_address_lookup(Arc::new(StubAddressLookup))
}

pub fn lazy_app() -> Router {
    racehub_api::app(lazy_state(test_config()))
}

/// State on the database named by DATABASE_URL, migrated; None when unset
pub async fn db_state() -> Option<AppState> {
    let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty())?;
    let mut config = test_config();
    config.database.url = url;
    config.database.connection_timeout = 5;

    let pool = DatabaseManager::connect(&config.database).await.expect("connect to DATABASE_URL");
    DatabaseManager::migrate(&pool).await.expect("migrations");

    Some(
        AppState::new(pool, config)
            .expect("http client")
            .with_address_lookup(Arc::new(StubAddressLookup)),
    )
}

pub fn token_for(config: &AppConfig, user_id: Uuid, roles: Vec<Role>) -> String {
    let claims = Claims::new(user_id, format!("{}@example.com", user_id), roles, 1);
    generate_jwt(&claims, &config.security).expect("token")
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Drive the router once and decode the JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Serve the app on a free local port, returning its base URL
pub async fn spawn_server(state: AppState) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = racehub_api::app(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await;
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    wait_ready(&base_url, Duration::from_secs(5)).await?;
    Ok(base_url)
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if client.get(format!("{}/", base_url)).send().await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}

/// Insert a user holding `roles` (plus runner) and mint a token for it
pub async fn create_user(state: &AppState, roles: &[Role]) -> (Uuid, String) {
    use racehub_api::{auth::hash_password, services::UserService};

    let users = UserService::new(state.pool.clone());
    let hash = hash_password("test-password", 4).expect("hash");
    let user = users
        .create_user(&unique_email("user"), &hash, "Test User")
        .await
        .expect("create user");
    for role in roles {
        users.grant_role(user.id, *role).await.expect("grant role");
    }

    let all_roles = users.roles_for(user.id).await.expect("roles");
    let token = token_for(&state.config, user.id, all_roles);
    (user.id, token)
}
