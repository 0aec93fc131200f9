//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod health;
pub mod me;
pub mod redirect;
pub mod signup;
pub mod webinars;

pub use admin::{
    account_stats_handler, list_registrations_handler, set_commission_handler,
    transition_referral_handler,
};
pub use health::health_handler;
pub use me::{
    me_handler, my_referrals_handler, my_registrations_handler, my_stats_handler,
    update_redirect_url_handler,
};
pub use redirect::referral_link_handler;
pub use signup::signup_handler;
pub use webinars::webinar_registration_handler;
