mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn known_cep_is_mapped() {
    let app = common::lazy_app();
    let (status, body) = common::send(&app, common::get("/api/address/cep/01310-100")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["street"], "Avenida Paulista");
    assert_eq!(body["data"]["state"], "SP");
}

#[tokio::test]
async fn malformed_cep_is_bad_request() {
    let app = common::lazy_app();
    let (status, body) = common::send(&app, common::get("/api/address/cep/123")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["cep"].is_string());
}

#[tokio::test]
async fn unknown_cep_is_not_found() {
    let app = common::lazy_app();
    let (status, _) = common::send(&app, common::get("/api/address/cep/00000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let app = common::lazy_app();
    let (status, body) = common::send(&app, common::get("/api/address/cep/99999-999")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BAD_GATEWAY");
}
