//! Repository traits for the append-only event logs.

use crate::domain::entities::{
    Click, NewClick, NewWebinarRegistration, RegistrationFilter, WebinarRegistration,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only log of referral link visits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click. The code is not checked against accounts.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts clicks whose stored code equals `code` exactly (case-sensitive).
    async fn count_by_code(&self, code: &str) -> Result<i64, AppError>;
}

/// Append-only log of webinar registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Appends a registration, storing `referrer_code` verbatim.
    async fn record_registration(
        &self,
        new_registration: NewWebinarRegistration,
    ) -> Result<WebinarRegistration, AppError>;

    /// Counts registrations whose stored referrer code equals `code` exactly.
    async fn count_by_referrer_code(&self, code: &str) -> Result<i64, AppError>;

    /// Lists registrations, newest first, with pagination.
    async fn list(&self, filter: RegistrationFilter) -> Result<Vec<WebinarRegistration>, AppError>;

    /// Counts registrations matching the filter, ignoring pagination.
    async fn count(&self, filter: RegistrationFilter) -> Result<i64, AppError>;
}
