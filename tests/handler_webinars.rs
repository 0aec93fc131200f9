mod common;

use axum::http::StatusCode;
use referral_ledger::domain::entities::Role;
use referral_ledger::domain::repositories::{AccountRepository, RegistrationRepository};
use serde_json::json;

fn registration_body(referrer_code: Option<&str>) -> serde_json::Value {
    json!({
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "mobile": "+15550100",
        "country": "US",
        "referrer_code": referrer_code
    })
}

#[tokio::test]
async fn test_registration_returns_referrer_redirect_url() {
    let app = common::spawn_app();
    let referrer =
        common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, Some("Ada")).await;
    app.store
        .update_redirect_url(referrer.id, Some("https://ada.example.com/thanks".to_string()))
        .await
        .unwrap();

    let response = app
        .server
        .post("/api/webinars/w-42/registrations")
        .json(&registration_body(Some("QR1A2B3C")))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["registration"]["webinar_id"], "w-42");
    assert_eq!(json["registration"]["referrer_code"], "QR1A2B3C");
    assert_eq!(json["redirect_url"], "https://ada.example.com/thanks");
}

#[tokio::test]
async fn test_registration_with_unknown_code_is_stored_verbatim() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/webinars/w-42/registrations")
        .json(&registration_body(Some("not a code")))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["registration"]["referrer_code"], "not a code");
    assert!(json["redirect_url"].is_null());
    assert_eq!(app.store.count_by_referrer_code("not a code").await.unwrap(), 1);
}

#[tokio::test]
async fn test_blank_referrer_code_is_treated_as_absent() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/webinars/w-42/registrations")
        .json(&registration_body(Some("   ")))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert!(json["registration"]["referrer_code"].is_null());
}

#[tokio::test]
async fn test_registration_validation_errors() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/webinars/w-42/registrations")
        .json(&json!({
            "name": "",
            "email": "grace",
            "mobile": "1",
            "country": "US"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"].get("email").is_some());
}

#[tokio::test]
async fn test_registration_code_is_not_normalized_for_redirect() {
    let app = common::spawn_app();
    let referrer = common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, None).await;
    app.store
        .update_redirect_url(referrer.id, Some("https://ada.example.com/thanks".to_string()))
        .await
        .unwrap();

    let response = app
        .server
        .post("/api/webinars/w-42/registrations")
        .json(&registration_body(Some("qr1a2b3c")))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert!(json["redirect_url"].is_null());
}
