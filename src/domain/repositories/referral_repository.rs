//! Repository trait for the commission ledger.

use crate::domain::entities::{Referral, ReferralStatus};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Repository interface for referral records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReferralRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Links `referred_account_id` to `referrer_id` and opens a pending referral.
    ///
    /// Both writes happen atomically. The account's `referrer_id` is only set
    /// when it is currently null, so concurrent attempts for the same subject
    /// produce exactly one referral.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Referral))` if this call performed the attribution
    /// - `Ok(None)` if the subject already had a referrer or does not exist
    async fn attribute(
        &self,
        referrer_id: Uuid,
        referred_account_id: Uuid,
    ) -> Result<Option<Referral>, AppError>;

    /// Finds a referral by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Referral>, AppError>;

    /// Lists a referrer's referrals, newest first, optionally filtered by status.
    async fn list_by_referrer(
        &self,
        referrer_id: Uuid,
        status: Option<ReferralStatus>,
    ) -> Result<Vec<Referral>, AppError>;

    /// Moves a referral from `from` to `to` if it is still in `from`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Referral))` with the updated row
    /// - `Ok(None)` if the referral is missing or no longer in `from`
    async fn update_status(
        &self,
        id: i64,
        from: ReferralStatus,
        to: ReferralStatus,
    ) -> Result<Option<Referral>, AppError>;

    /// Overwrites the commission amount.
    ///
    /// Returns `Ok(None)` if the referral does not exist.
    async fn set_commission(&self, id: i64, amount: Decimal)
    -> Result<Option<Referral>, AppError>;
}
