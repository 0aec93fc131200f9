//! Attribution of new accounts to the referrer whose code they arrived with.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::services::AccountService;
use crate::domain::entities::Referral;
use crate::domain::repositories::{AccountRepository, ReferralRepository};
use crate::error::AppError;
use crate::utils::code_generator::normalize_code;

/// What an attribution attempt did.
///
/// Only [`AttributionOutcome::Attributed`] wrote anything; every other
/// outcome is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttributionOutcome {
    NoCode,
    UnknownCode { code: String },
    SelfReferral,
    AlreadyAttributed,
    Attributed { referral: Referral },
}

impl AttributionOutcome {
    fn label(&self) -> &'static str {
        match self {
            AttributionOutcome::NoCode => "no_code",
            AttributionOutcome::UnknownCode { .. } => "unknown_code",
            AttributionOutcome::SelfReferral => "self_referral",
            AttributionOutcome::AlreadyAttributed => "already_attributed",
            AttributionOutcome::Attributed { .. } => "attributed",
        }
    }
}

pub struct AttributionService<A, R>
where
    A: AccountRepository + ?Sized,
    R: ReferralRepository + ?Sized,
{
    accounts: Arc<AccountService<A>>,
    referrals: Arc<R>,
}

impl<A, R> AttributionService<A, R>
where
    A: AccountRepository + ?Sized,
    R: ReferralRepository + ?Sized,
{
    pub fn new(accounts: Arc<AccountService<A>>, referrals: Arc<R>) -> Self {
        Self {
            accounts,
            referrals,
        }
    }

    /// Credits `subject_account_id` to the owner of `raw_code`.
    ///
    /// Sets the subject's `referrer_id` and opens a pending referral with a
    /// zero commission. The first successful attribution wins; later calls
    /// for the same subject return [`AttributionOutcome::AlreadyAttributed`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store fails. Callers on
    /// the signup path log this and carry on.
    pub async fn attribute(
        &self,
        raw_code: Option<&str>,
        subject_account_id: Uuid,
    ) -> Result<AttributionOutcome, AppError> {
        let outcome = self.try_attribute(raw_code, subject_account_id).await?;

        metrics::counter!("referral_attributions_total", "outcome" => outcome.label())
            .increment(1);
        match &outcome {
            AttributionOutcome::Attributed { referral } => tracing::info!(
                referral_id = referral.id,
                referrer_id = %referral.referrer_id,
                referred_account_id = %subject_account_id,
                "Referral attributed"
            ),
            other => tracing::debug!(
                subject = %subject_account_id,
                outcome = other.label(),
                "Attribution skipped"
            ),
        }

        Ok(outcome)
    }

    async fn try_attribute(
        &self,
        raw_code: Option<&str>,
        subject_account_id: Uuid,
    ) -> Result<AttributionOutcome, AppError> {
        let Some(code) = raw_code.and_then(normalize_code) else {
            return Ok(AttributionOutcome::NoCode);
        };

        let Some(referrer) = self.accounts.resolve(&code).await? else {
            return Ok(AttributionOutcome::UnknownCode { code });
        };

        if referrer.id == subject_account_id {
            return Ok(AttributionOutcome::SelfReferral);
        }

        match self
            .referrals
            .attribute(referrer.id, subject_account_id)
            .await?
        {
            Some(referral) => Ok(AttributionOutcome::Attributed { referral }),
            None => Ok(AttributionOutcome::AlreadyAttributed),
        }
    }
}
