mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use racehub_api::types::Role;
use serde_json::{json, Value};

fn webhook(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/asaas")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("asaas-access-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn payment_event(event: &str, reference: &str) -> Value {
    json!({
        "event": event,
        "payment": {
            "id": "pay_test_1",
            "externalReference": reference,
            "value": 120.0,
            "status": "CONFIRMED"
        }
    })
}

#[tokio::test]
async fn mismatched_token_is_unauthorized() {
    let app = common::lazy_app();
    let (status, body) = common::send(
        &app,
        webhook(Some("wrong-token"), &payment_event("PAYMENT_CONFIRMED", "RH-00000000")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid webhook token");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = common::lazy_app();
    let (status, _) = common::send(&app, webhook(None, &payment_event("PAYMENT_CONFIRMED", "RH-00000000"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_receiver_rejects_everything() {
    let mut config = common::test_config();
    config.security.asaas_webhook_token = None;
    let app = racehub_api::app(common::lazy_state(config));

    let (status, body) = common::send(
        &app,
        webhook(Some(common::WEBHOOK_TOKEN), &payment_event("PAYMENT_CONFIRMED", "RH-00000000")),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn ignored_events_are_acknowledged() {
    let app = common::lazy_app();
    let (status, body) = common::send(
        &app,
        webhook(Some(common::WEBHOOK_TOKEN), &payment_event("PAYMENT_OVERDUE", "RH-00000000")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["processed"], false);
    assert_eq!(body["data"]["event"], "PAYMENT_OVERDUE");
}

#[tokio::test]
async fn confirmed_payment_marks_registration_paid() {
    let Some(state) = common::db_state().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let (_, organizer) = common::create_user(&state, &[Role::Organizer]).await;
    let (_, runner) = common::create_user(&state, &[]).await;
    let app = racehub_api::app(state);

    let (status, event) = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/organizer/events",
            Some(&organizer),
            &json!({
                "title": "Corrida do Parque",
                "location": "Parque Ibirapuera",
                "city": "São Paulo",
                "state": "sp",
                "starts_at": (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339(),
                "price_cents": 12000,
                "status": "published"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["data"]["id"].as_str().unwrap().to_string();

    let (status, registration) = common::send(
        &app,
        common::json_request("POST", "/api/runner/registrations", Some(&runner), &json!({ "event_id": event_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["data"]["payment_status"], "pending");
    let code = registration["data"]["confirmation_code"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        &app,
        webhook(Some(common::WEBHOOK_TOKEN), &payment_event("PAYMENT_CONFIRMED", &code)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["processed"], true);
    assert_eq!(body["data"]["registration"]["payment_status"], "paid");
    assert_eq!(body["data"]["registration"]["payment_id"], "pay_test_1");

    let (status, body) = common::send(
        &app,
        webhook(Some(common::WEBHOOK_TOKEN), &payment_event("PAYMENT_REFUNDED", &code)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["registration"]["payment_status"], "refunded");
}

#[tokio::test]
async fn late_confirmation_does_not_revive_refund() {
    let Some(state) = common::db_state().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let (_, organizer) = common::create_user(&state, &[Role::Organizer]).await;
    let (_, first_runner) = common::create_user(&state, &[]).await;
    let (_, second_runner) = common::create_user(&state, &[]).await;
    let app = racehub_api::app(state);

    let (status, event) = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/organizer/events",
            Some(&organizer),
            &json!({
                "title": "Corrida de Um Lugar",
                "location": "Orla",
                "city": "Santos",
                "state": "SP",
                "starts_at": (chrono::Utc::now() + chrono::Duration::days(15)).to_rfc3339(),
                "price_cents": 5000,
                "max_participants": 1,
                "status": "published"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["data"]["id"].as_str().unwrap().to_string();

    let (status, registration) = common::send(
        &app,
        common::json_request("POST", "/api/runner/registrations", Some(&first_runner), &json!({ "event_id": event_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = registration["data"]["confirmation_code"].as_str().unwrap().to_string();

    for event in ["PAYMENT_CONFIRMED", "PAYMENT_REFUNDED"] {
        let (status, _) = common::send(&app, webhook(Some(common::WEBHOOK_TOKEN), &payment_event(event, &code))).await;
        assert_eq!(status, StatusCode::OK);
    }

    // The refund freed the only seat
    let (status, _) = common::send(
        &app,
        common::json_request("POST", "/api/runner/registrations", Some(&second_runner), &json!({ "event_id": event_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::send(
        &app,
        webhook(Some(common::WEBHOOK_TOKEN), &payment_event("PAYMENT_RECEIVED", &code)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["processed"], false);
    assert_eq!(body["data"]["registration"]["payment_status"], "refunded");
}

#[tokio::test]
async fn unknown_registration_is_not_found() {
    let Some(state) = common::db_state().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let app = racehub_api::app(state);

    let (status, _) = common::send(
        &app,
        webhook(Some(common::WEBHOOK_TOKEN), &payment_event("PAYMENT_RECEIVED", "RH-FFFFFFFF")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
