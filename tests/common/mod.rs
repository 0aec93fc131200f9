#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use chrono::{FixedOffset, Utc};
use referral_ledger::api;
use referral_ledger::api::handlers::{health_handler, referral_link_handler};
use referral_ledger::domain::click_event::ClickEvent;
use referral_ledger::domain::entities::{Account, NewAccount, Role};
use referral_ledger::domain::repositories::AccountRepository;
use referral_ledger::infrastructure::memory::MemoryStore;
use referral_ledger::state::{AppState, Repositories, ServiceSettings};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const SIGNUP_URL: &str = "https://app.example.com/signup";
pub const PUBLIC_BASE_URL: &str = "https://ref.example.com";
pub use referral_ledger::api::middleware::ACCOUNT_ID_HEADER as ACCOUNT_HEADER;

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        referral_code_prefix: "QR".to_string(),
        code_generation_attempts: 5,
        reporting_offset: FixedOffset::east_opt(0).unwrap(),
        signup_url: SIGNUP_URL.to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
    }
}

pub fn create_test_state(
    store: Arc<MemoryStore>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let state = AppState::new(Repositories::memory(store), &test_settings(), tx);
    (state, rx)
}

/// Same routes as the production router, without path normalization.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/r/{code}", get(referral_link_handler))
        .route("/health", get(health_handler))
        .nest(
            "/api",
            api::routes::public_routes()
                .merge(api::routes::account_routes())
                .merge(api::routes::admin_routes()),
        )
        .with_state(state)
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_queue(100)
}

pub fn spawn_app_with_queue(queue_capacity: usize) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (state, clicks) = create_test_state(store.clone(), queue_capacity);
    let server = TestServer::new(test_router(state)).unwrap();

    TestApp {
        server,
        store,
        clicks,
    }
}

pub async fn create_test_account(
    store: &MemoryStore,
    code: &str,
    role: Role,
    full_name: Option<&str>,
) -> Account {
    store
        .create(NewAccount {
            id: Uuid::new_v4(),
            referral_code: code.to_string(),
            role,
            full_name: full_name.map(str::to_string),
            email: None,
        })
        .await
        .unwrap()
}

pub async fn create_admin(store: &MemoryStore) -> Account {
    create_test_account(store, "QRADMIN1", Role::Administrator, Some("Back Office")).await
}

/// Signs up a fresh account through the API and returns its id.
pub async fn signup(server: &TestServer, referral_code: Option<&str>) -> Uuid {
    let id = Uuid::new_v4();
    let response = server
        .post("/api/signups")
        .json(&serde_json::json!({
            "account_id": id,
            "full_name": "New Member",
            "email": format!("{}@example.com", id.simple()),
            "referral_code": referral_code,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    id
}

pub fn now_year_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}
