mod common;

use axum::http::StatusCode;
use referral_ledger::domain::entities::Role;
use referral_ledger::domain::repositories::ReferralRepository;
use serde_json::json;

async fn pending_referral(app: &common::TestApp) -> i64 {
    let referrer = common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, None).await;
    common::signup(&app.server, Some("QR1A2B3C")).await;

    app.store.list_by_referrer(referrer.id, None).await.unwrap()[0].id
}

#[tokio::test]
async fn test_admin_routes_refuse_standard_accounts() {
    let app = common::spawn_app();
    let id = pending_referral(&app).await;
    let standard = common::create_test_account(&app.store, "QRPLAIN1", Role::Standard, None).await;

    let response = app
        .server
        .post(&format!("/api/admin/referrals/{id}/status"))
        .add_header(common::ACCOUNT_HEADER, standard.id.to_string())
        .json(&json!({ "status": "completed" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<serde_json::Value>()["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_ledger_moves_forward_one_step() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;
    let id = pending_referral(&app).await;
    let path = format!("/api/admin/referrals/{id}/status");

    let response = app
        .server
        .post(&path)
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "status": "completed" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["status"], "completed");

    let response = app
        .server
        .post(&path)
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "status": "paid" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["status"], "paid");
}

#[tokio::test]
async fn test_skipping_and_regressing_are_rejected() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;
    let id = pending_referral(&app).await;
    let path = format!("/api/admin/referrals/{id}/status");

    let response = app
        .server
        .post(&path)
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "status": "paid" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_transition");
    assert_eq!(json["error"]["details"]["from"], "pending");
    assert_eq!(json["error"]["details"]["allowed"], "completed");

    let response = app
        .server
        .post(&path)
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "status": "pending" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let stored = app.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status.as_str(), "pending");
}

#[tokio::test]
async fn test_transition_unknown_referral_is_not_found() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;

    let response = app
        .server
        .post("/api/admin/referrals/9999/status")
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "status": "completed" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_commission_set_and_negative_rejected() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;
    let id = pending_referral(&app).await;
    let path = format!("/api/admin/referrals/{id}/commission");

    let response = app
        .server
        .put(&path)
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "amount": "12.50" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["commission_amount"],
        "12.50"
    );

    let response = app
        .server
        .put(&path)
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .json(&json!({ "amount": "-1" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_amount"
    );

    let stored = app.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.commission_amount.to_string(), "12.50");
}

#[tokio::test]
async fn test_admin_account_stats() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;
    let referrer = common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, None).await;
    common::signup(&app.server, Some("QR1A2B3C")).await;

    let response = app
        .server
        .get(&format!("/api/admin/accounts/{}/stats", referrer.id))
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["account_id"], referrer.id.to_string());
    assert_eq!(json["total_referrals"], 1);
    assert_eq!(json["completed_referrals"], 0);
}

#[tokio::test]
async fn test_registration_list_resolves_referrer_names() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;
    common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, Some("Ada Lovelace"))
        .await;

    for code in [Some("QR1A2B3C"), Some("QRGHOST0"), None] {
        app.server
            .post("/api/webinars/w-7/registrations")
            .json(&json!({
                "name": "Attendee",
                "email": "a@example.com",
                "mobile": "+15550100",
                "country": "US",
                "referrer_code": code
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .get("/api/admin/webinar-registrations?webinar_id=w-7")
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["pagination"]["total_items"], 3);

    // Newest first.
    let items = json["items"].as_array().unwrap();
    assert_eq!(items[0]["referrer"]["state"], "unattributed");
    assert_eq!(items[1]["referrer"]["state"], "unresolved");
    assert_eq!(items[1]["referrer"]["code"], "QRGHOST0");
    assert_eq!(items[2]["referrer"]["state"], "resolved");
    assert_eq!(items[2]["referrer"]["display_name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_lowercase_stored_code_is_neither_named_nor_counted() {
    let app = common::spawn_app();
    let admin = common::create_admin(&app.store).await;
    let ada =
        common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, Some("Ada Lovelace"))
            .await;

    app.server
        .post("/api/webinars/w-7/registrations")
        .json(&json!({
            "name": "Attendee",
            "email": "a@example.com",
            "mobile": "+15550100",
            "country": "US",
            "referrer_code": "qr1a2b3c"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let list = app
        .server
        .get("/api/admin/webinar-registrations?webinar_id=w-7")
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .await
        .json::<serde_json::Value>();
    assert_eq!(list["items"][0]["referrer"]["state"], "unresolved");
    assert_eq!(list["items"][0]["referrer"]["code"], "qr1a2b3c");

    let stats = app
        .server
        .get(&format!("/api/admin/accounts/{}/stats", ada.id))
        .add_header(common::ACCOUNT_HEADER, admin.id.to_string())
        .await
        .json::<serde_json::Value>();
    assert_eq!(stats["webinar_registration_count"], 0);
}
