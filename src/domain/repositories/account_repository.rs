//! Repository trait for account (profile) storage.

use crate::domain::entities::{Account, NewAccount, Role};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Constraint guarding referral code uniqueness.
///
/// Implementations report a code collision as [`AppError::Conflict`] whose
/// details carry `{"constraint": REFERRAL_CODE_CONSTRAINT}`.
pub const REFERRAL_CODE_CONSTRAINT: &str = "profiles_referral_code_key";

/// Repository interface for accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccountRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the id or the referral code is taken.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError>;

    /// Finds an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    /// Finds the account owning an exact (already normalized) referral code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Account>, AppError>;

    /// Replaces the post-registration redirect URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    async fn update_redirect_url(
        &self,
        id: Uuid,
        redirect_url: Option<String>,
    ) -> Result<Account, AppError>;

    /// Changes an account's role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, AppError>;

    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
