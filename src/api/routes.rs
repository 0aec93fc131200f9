//! API route configuration.
//!
//! Account and admin routes identify the caller through the
//! [`crate::api::middleware::CurrentAccount`] extractor; public routes do not.

use crate::api::handlers::{
    account_stats_handler, list_registrations_handler, me_handler, my_referrals_handler,
    my_registrations_handler, my_stats_handler, set_commission_handler, signup_handler,
    transition_referral_handler, update_redirect_url_handler, webinar_registration_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// Unauthenticated API routes.
///
/// # Endpoints
///
/// - `POST /signups`                                - Register an account with optional referral code
/// - `POST /webinars/{webinar_id}/registrations`    - Register for a webinar
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/signups", post(signup_handler))
        .route(
            "/webinars/{webinar_id}/registrations",
            post(webinar_registration_handler),
        )
}

/// Routes scoped to the requesting account.
///
/// # Endpoints
///
/// - `GET   /me`                        - Current account with referral link
/// - `GET   /me/stats`                  - Referral statistics
/// - `GET   /me/referrals`              - Referrals made, optional `status` filter
/// - `PATCH /me/redirect-url`           - Set or clear the post-registration redirect
/// - `GET   /me/webinar-registrations`  - Registrations made with my code (paginated)
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route("/me/stats", get(my_stats_handler))
        .route("/me/referrals", get(my_referrals_handler))
        .route("/me/redirect-url", patch(update_redirect_url_handler))
        .route("/me/webinar-registrations", get(my_registrations_handler))
}

/// Back-office routes, administrator role required.
///
/// # Endpoints
///
/// - `POST /admin/referrals/{id}/status`       - Advance a referral's status
/// - `PUT  /admin/referrals/{id}/commission`   - Set a commission amount
/// - `GET  /admin/accounts/{id}/stats`         - Statistics for any account
/// - `GET  /admin/webinar-registrations`       - Registrations with resolved referrers
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/referrals/{id}/status",
            post(transition_referral_handler),
        )
        .route(
            "/admin/referrals/{id}/commission",
            put(set_commission_handler),
        )
        .route("/admin/accounts/{id}/stats", get(account_stats_handler))
        .route(
            "/admin/webinar-registrations",
            get(list_registrations_handler),
        )
}
