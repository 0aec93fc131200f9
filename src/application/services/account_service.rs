//! Account registration and referral code registry.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Account, NewAccount, Role};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, normalize_code};
use crate::utils::db_error::is_unique_violation_on_code;
use crate::utils::url_normalizer::normalize_redirect_url;

/// Service owning account creation and referral code resolution.
///
/// Codes are minted here and never change afterwards. Uniqueness is left to
/// the store: a collision on the code column triggers a fresh code, up to
/// `max_attempts` tries.
pub struct AccountService<A: AccountRepository + ?Sized> {
    repository: Arc<A>,
    code_prefix: String,
    max_attempts: u32,
}

impl<A: AccountRepository + ?Sized> AccountService<A> {
    pub fn new(repository: Arc<A>, code_prefix: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            repository,
            code_prefix: code_prefix.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates an account with a freshly minted referral code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the account id already exists.
    /// Returns [`AppError::Internal`] if every generated code collided.
    pub async fn register(
        &self,
        id: Uuid,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<Account, AppError> {
        for attempt in 1..=self.max_attempts {
            let new_account = NewAccount {
                id,
                referral_code: generate_code(&self.code_prefix),
                role: Role::Standard,
                full_name: full_name.clone(),
                email: email.clone(),
            };

            match self.repository.create(new_account).await {
                Ok(account) => {
                    tracing::info!(
                        account_id = %account.id,
                        code = %account.referral_code,
                        "Account registered"
                    );
                    return Ok(account);
                }
                Err(e) if is_unique_violation_on_code(&e) => {
                    tracing::debug!(attempt, "Referral code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique referral code",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Resolves a user-supplied code to its owning account.
    ///
    /// The code is trimmed and uppercased first. Blank input and unknown
    /// codes both yield `Ok(None)`.
    pub async fn resolve(&self, raw_code: &str) -> Result<Option<Account>, AppError> {
        let Some(code) = normalize_code(raw_code) else {
            return Ok(None);
        };

        self.repository.find_by_code(&code).await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        self.repository.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Account, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found", json!({ "account_id": id })))
    }

    /// Like [`Self::resolve`] but treats an unknown code as an error.
    pub async fn get_by_code(&self, raw_code: &str) -> Result<Account, AppError> {
        self.resolve(raw_code).await?.ok_or_else(|| {
            AppError::not_found("Referral code not found", json!({ "code": raw_code }))
        })
    }

    /// Owner of a code exactly as it was stored in an event log.
    ///
    /// No normalization: `qr1a2b3c` does not match `QR1A2B3C`, in line with
    /// how clicks and registrations are counted.
    pub async fn find_by_stored_code(&self, code: &str) -> Result<Option<Account>, AppError> {
        self.repository.find_by_code(code).await
    }

    /// Sets or clears the post-registration redirect URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not a plain http(s) URL.
    pub async fn update_redirect_url(
        &self,
        id: Uuid,
        redirect_url: Option<String>,
    ) -> Result<Account, AppError> {
        let normalized = match redirect_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_redirect_url(raw).map_err(|e| {
                AppError::bad_request("Invalid redirect URL", json!({ "reason": e.to_string() }))
            })?),
        };

        let account = self.repository.update_redirect_url(id, normalized).await?;
        tracing::info!(account_id = %id, "Redirect URL updated");
        Ok(account)
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, AppError> {
        let account = self.repository.set_role(id, role).await?;
        tracing::info!(account_id = %id, role = %role, "Account role changed");
        Ok(account)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
