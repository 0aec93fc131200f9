//! HTTP middleware and request extractors.
//!
//! Provides current-account resolution and observability middleware.

pub mod current_account;
pub mod tracing;

pub use current_account::{ACCOUNT_ID_HEADER, AdminAccount, CurrentAccount};
