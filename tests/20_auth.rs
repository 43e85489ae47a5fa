mod common;

use axum::http::StatusCode;
use racehub_api::types::Role;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn protected_route_requires_bearer_token() {
    let app = common::lazy_app();

    let (status, body) = common::send(&app, common::get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = common::send(&app, common::get_with_token("/api/auth/me", "not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let config = common::test_config();
    let mut other = config.clone();
    other.security.jwt_secret = "some-other-secret".to_string();
    let token = common::token_for(&other, Uuid::new_v4(), vec![Role::Admin]);

    let app = racehub_api::app(common::lazy_state(config));
    let (status, _) = common::send(&app, common::get_with_token("/api/admin/stats", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_gates_reject_missing_roles_without_database() {
    let config = common::test_config();
    let runner = common::token_for(&config, Uuid::new_v4(), vec![Role::Runner]);
    let app = racehub_api::app(common::lazy_state(config));

    for uri in ["/api/admin/stats", "/api/organizer/events", "/api/organizer/dashboard"] {
        let (status, body) = common::send(&app, common::get_with_token(uri, &runner)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["code"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn login_validates_body() {
    let app = common::lazy_app();

    let (status, body) = common::send(
        &app,
        common::json_request("POST", "/api/auth/login", None, &json!({ "email": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": "nope", "password": "short", "full_name": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["email"], "Invalid email format");
    assert!(body["field_errors"]["password"].is_string());
    assert!(body["field_errors"]["full_name"].is_string());
}

#[tokio::test]
async fn register_login_and_me() {
    let Some(state) = common::db_state().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let app = racehub_api::app(state);
    let email = common::unique_email("runner");

    let (status, body) = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": email, "password": "correct-horse", "full_name": "Ana Runner" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["roles"], json!(["runner"]));
    assert_eq!(body["data"]["dashboard_route"], "/runner/dashboard");
    assert!(body["data"]["user"].get("password_hash").is_none());

    // Same email again
    let (status, body) = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": email.to_uppercase(), "password": "correct-horse", "full_name": "Ana" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, wrong) = common::send(
        &app,
        common::json_request("POST", "/api/auth/login", None, &json!({ "email": email, "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, unknown) = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": common::unique_email("ghost"), "password": "whatever1" }),
        ),
    )
    .await;
    assert_eq!(wrong["error"], unknown["error"]);

    let (status, body) = common::send(
        &app,
        common::json_request("POST", "/api/auth/login", None, &json!({ "email": email, "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = common::send(&app, common::get_with_token("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], email);
    assert_eq!(body["data"]["dashboard_route"], "/runner/dashboard");
}

#[tokio::test]
async fn profile_read_and_partial_update() {
    let Some(state) = common::db_state().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let (user_id, token) = common::create_user(&state, &[]).await;
    let app = racehub_api::app(state);

    let (status, body) = common::send(&app, common::get_with_token("/api/profiles/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.to_string());
    assert_eq!(body["data"]["full_name"], "Test User");
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = common::send(
        &app,
        common::json_request(
            "PUT",
            "/api/profiles/me",
            Some(&token),
            &json!({ "phone": "+55 11 99999-0000", "city": "Campinas", "state": "SP", "birth_date": "1990-04-12" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Campinas");
    assert_eq!(body["data"]["birth_date"], "1990-04-12");
    // Omitted fields keep their value
    assert_eq!(body["data"]["full_name"], "Test User");

    let (status, body) = common::send(
        &app,
        common::json_request("PUT", "/api/profiles/me", Some(&token), &json!({ "state": "Sao Paulo" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["state"].is_string());
}

#[tokio::test]
async fn admin_manages_user_roles() {
    let Some(state) = common::db_state().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let (admin_id, admin) = common::create_user(&state, &[Role::Admin]).await;
    let (target_id, _) = common::create_user(&state, &[]).await;
    let app = racehub_api::app(state);
    let roles_uri = format!("/api/admin/users/{}/roles", target_id);

    let (status, body) = common::send(
        &app,
        common::json_request("POST", &roles_uri, Some(&admin), &json!({ "role": "organizer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], true);
    assert_eq!(body["data"]["roles"], json!(["organizer", "runner"]));

    let (status, body) = common::send(
        &app,
        common::json_request("POST", &roles_uri, Some(&admin), &json!({ "role": "organizer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], false);

    let (status, body) = common::send(&app, common::get_with_token("/api/admin/users?limit=200", &admin)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == target_id.to_string())
        .cloned()
        .expect("target user listed");
    assert_eq!(listed["roles"], json!(["organizer", "runner"]));

    let revoke = format!("{}/organizer", roles_uri);
    let (status, body) = common::send(
        &app,
        common::json_request("DELETE", &revoke, Some(&admin), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["roles"], json!(["runner"]));

    let (status, body) = common::send(
        &app,
        common::json_request("DELETE", &format!("{}/superuser", roles_uri), Some(&admin), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["role"].is_string());

    let own = format!("/api/admin/users/{}/roles/admin", admin_id);
    let (status, body) = common::send(&app, common::json_request("DELETE", &own, Some(&admin), &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Admins cannot revoke their own admin role");

    let (status, body) = common::send(
        &app,
        common::json_request("POST", "/api/admin/users/not-a-uuid/roles", Some(&admin), &json!({ "role": "runner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = common::send(
        &app,
        common::json_request(
            "POST",
            &format!("/api/admin/users/{}/roles", Uuid::new_v4()),
            Some(&admin),
            &json!({ "role": "runner" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
