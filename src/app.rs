use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public, webhooks};
use crate::middleware::{
    asaas_webhook_middleware, jwt_auth_middleware, rate_limit_middleware, require_admin, require_organizer,
    require_runner, security_log_middleware,
};
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let max_body = state.config.api.max_request_size_bytes;
    let uploads_dir = state.config.uploads.dir.clone();

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_auth_routes(&state))
        .merge(public_routes())
        // Protected API
        .merge(session_routes(&state))
        .merge(runner_routes(&state))
        .merge(organizer_routes(&state))
        .merge(upload_routes(&state))
        // Elevated API
        .merge(admin_routes(&state))
        // Provider callbacks
        .merge(webhook_routes(&state))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback(not_found)
        .with_state(state.clone())
        // Global middleware, innermost first
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(from_fn_with_state(state.clone(), security_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.security))
}

fn public_auth_routes(state: &AppState) -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware))
}

fn public_routes() -> Router<AppState> {
    use public::{address, events, home_page};

    Router::new()
        .route("/api/events", get(events::events_list))
        .route("/api/events/:id", get(events::event_get))
        .route("/api/events/:id/pickup-locations", get(events::event_pickup_locations))
        .route("/api/home-page-settings", get(home_page::home_page_get))
        .route("/api/address/cep/:cep", get(address::cep_lookup))
}

/// Any authenticated user
fn session_routes(state: &AppState) -> Router<AppState> {
    use protected::{auth, profiles};

    Router::new()
        .route("/api/auth/me", get(auth::me_get))
        .route("/api/profiles/me", get(profiles::profile_get).put(profiles::profile_put))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn runner_routes(state: &AppState) -> Router<AppState> {
    use protected::runner;

    Router::new()
        .route(
            "/api/runner/registrations",
            get(runner::registrations_list).post(runner::registration_create),
        )
        .route("/api/runner/registrations/:code", get(runner::registration_by_code))
        .route("/api/runner/payments", get(runner::payments_list))
        // Last layer runs first: authenticate, then gate
        .route_layer(from_fn_with_state(state.clone(), require_runner))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn organizer_routes(state: &AppState) -> Router<AppState> {
    use protected::organizer;

    Router::new()
        .route("/api/organizer/dashboard", get(organizer::dashboard_get))
        .route(
            "/api/organizer/events",
            get(organizer::events_list).post(organizer::event_create),
        )
        .route(
            "/api/organizer/events/:id",
            get(organizer::event_get).put(organizer::event_update),
        )
        .route("/api/organizer/events/:id/registrations", get(organizer::event_registrations))
        .route(
            "/api/organizer/events/:id/pickup-locations",
            post(organizer::pickup_location_create),
        )
        .route(
            "/api/organizer/pickup-locations/:id",
            put(organizer::pickup_location_update).delete(organizer::pickup_location_delete),
        )
        .route(
            "/api/organizer/settings",
            get(organizer::settings_get).put(organizer::settings_put),
        )
        .route_layer(from_fn_with_state(state.clone(), require_organizer))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn upload_routes(state: &AppState) -> Router<AppState> {
    use protected::uploads;

    Router::new()
        .route("/api/uploads/banner", post(uploads::banner_post))
        .route("/api/uploads/regulation", post(uploads::regulation_post))
        .route_layer(from_fn_with_state(state.clone(), require_organizer))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use elevated::admin;

    Router::new()
        // GET on the same path is public; merging keeps both methods
        .route("/api/home-page-settings", put(admin::home_page_put))
        .route("/api/admin/stats", get(admin::stats_get))
        .route("/api/admin/users", get(admin::users_list))
        .route("/api/admin/users/:id/roles", post(admin::role_grant))
        .route("/api/admin/users/:id/roles/:role", delete(admin::role_revoke))
        .route("/api/admin/registrations", get(admin::registrations_report))
        .route("/api/admin/rate-limit/reset", post(admin::rate_limit_reset))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn webhook_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/webhooks/asaas", post(webhooks::asaas_post))
        .route_layer(from_fn_with_state(state.clone(), asaas_webhook_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AnyOrigin);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);

    ApiError::internal_server_error("An error occurred while processing your request").into_response()
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "RaceHub API",
            "version": version,
            "description": "Race registration, payments and organizer dashboards",
            "endpoints": {
                "health": "/health (public)",
                "auth": "/api/auth/register, /api/auth/login (public, rate limited), /api/auth/me",
                "events": "/api/events[/:id[/pickup-locations]] (public)",
                "home": "/api/home-page-settings (GET public, PUT admin)",
                "address": "/api/address/cep/:cep (public)",
                "profiles": "/api/profiles/me (authenticated)",
                "runner": "/api/runner/* (runner)",
                "organizer": "/api/organizer/* (organizer or admin)",
                "uploads": "/api/uploads/{banner,regulation} (organizer or admin)",
                "admin": "/api/admin/* (admin)",
                "webhooks": "/api/webhooks/asaas (asaas-access-token)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
