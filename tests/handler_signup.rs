mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use referral_ledger::domain::entities::{Account, NewAccount, Role};
use referral_ledger::domain::repositories::{AccountRepository, ReferralRepository};
use referral_ledger::error::AppError;
use referral_ledger::infrastructure::memory::MemoryStore;
use referral_ledger::state::{AppState, Repositories};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Memory-backed accounts whose lookups by id always fail.
struct FailingReads(Arc<MemoryStore>);

#[async_trait]
impl AccountRepository for FailingReads {
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        AccountRepository::create(self.0.as_ref(), new_account).await
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Account>, AppError> {
        Err(AppError::store_unavailable("connection reset", json!({})))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Account>, AppError> {
        AccountRepository::find_by_code(self.0.as_ref(), code).await
    }

    async fn update_redirect_url(
        &self,
        id: Uuid,
        redirect_url: Option<String>,
    ) -> Result<Account, AppError> {
        AccountRepository::update_redirect_url(self.0.as_ref(), id, redirect_url).await
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, AppError> {
        AccountRepository::set_role(self.0.as_ref(), id, role).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        AccountRepository::ping(self.0.as_ref()).await
    }
}

#[tokio::test]
async fn test_signup_without_code_mints_referral_code() {
    let app = common::spawn_app();
    let id = Uuid::new_v4();

    let response = app
        .server
        .post("/api/signups")
        .json(&json!({
            "account_id": id,
            "full_name": "Ada Lovelace",
            "email": "ada@example.com"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    let code = json["account"]["referral_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.starts_with("QR"));
    assert_eq!(json["account"]["role"], "standard");
    assert_eq!(
        json["account"]["referral_link"],
        format!("{}/r/{}", common::PUBLIC_BASE_URL, code)
    );
    assert_eq!(json["attribution"]["outcome"], "no_code");
    assert!(json["account"]["referrer_id"].is_null());
}

#[tokio::test]
async fn test_signup_with_code_credits_referrer() {
    let app = common::spawn_app();
    let referrer = common::create_test_account(&app.store, "QR1A2B3C", Role::Standard, None).await;

    let response = app
        .server
        .post("/api/signups")
        .json(&json!({
            "account_id": Uuid::new_v4(),
            "referral_code": "  qr1a2b3c "
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["attribution"]["outcome"], "attributed");
    assert_eq!(json["attribution"]["referral"]["status"], "pending");
    assert_eq!(json["attribution"]["referral"]["commission_amount"], "0");
    assert_eq!(json["account"]["referrer_id"], referrer.id.to_string());

    let referrals = app.store.list_by_referrer(referrer.id, None).await.unwrap();
    assert_eq!(referrals.len(), 1);
}

#[tokio::test]
async fn test_signup_with_unknown_code_creates_account_only() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/signups")
        .json(&json!({
            "account_id": Uuid::new_v4(),
            "referral_code": "QRNOBODY"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["attribution"]["outcome"], "unknown_code");
    assert!(json["account"]["referrer_id"].is_null());
}

#[tokio::test]
async fn test_signup_duplicate_account_conflicts() {
    let app = common::spawn_app();
    let id = Uuid::new_v4();
    let body = json!({ "account_id": id });

    app.server
        .post("/api/signups")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.server.post("/api/signups").json(&body).await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_signup_invalid_email_rejected() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/signups")
        .json(&json!({
            "account_id": Uuid::new_v4(),
            "email": "not-an-email"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_attribution_is_first_write_wins() {
    let app = common::spawn_app();
    let first = common::create_test_account(&app.store, "QRFIRST1", Role::Standard, None).await;
    let second = common::create_test_account(&app.store, "QRSECND2", Role::Standard, None).await;

    let subject = common::signup(&app.server, Some("QRFIRST1")).await;

    // A second attribution for the same account is a no-op.
    let referral = app.store.attribute(second.id, subject).await.unwrap();
    assert!(referral.is_none());

    let account = AccountRepository::find_by_id(app.store.as_ref(), subject)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.referrer_id, Some(first.id));
    assert!(app.store.list_by_referrer(second.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_survives_failed_reread() {
    let store = Arc::new(MemoryStore::new());
    let referrer = common::create_test_account(&store, "QR1A2B3C", Role::Standard, None).await;

    let repositories = Repositories {
        accounts: Arc::new(FailingReads(store.clone())),
        ..Repositories::memory(store.clone())
    };
    let (tx, _rx) = mpsc::channel(10);
    let state = AppState::new(repositories, &common::test_settings(), tx);
    let server = TestServer::new(common::test_router(state)).unwrap();
    let id = Uuid::new_v4();

    let response = server
        .post("/api/signups")
        .json(&json!({ "account_id": id, "referral_code": "QR1A2B3C" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["attribution"]["outcome"], "attributed");
    // The stale row from before attribution is returned.
    assert!(json["account"]["referrer_id"].is_null());

    let stored = AccountRepository::find_by_id(store.as_ref(), id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.referrer_id, Some(referrer.id));
}
