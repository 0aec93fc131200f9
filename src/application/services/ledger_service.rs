//! Commission ledger: referral status transitions and commission amounts.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Referral, ReferralStatus};
use crate::domain::repositories::ReferralRepository;
use crate::error::AppError;

pub struct LedgerService<R: ReferralRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ReferralRepository + ?Sized> LedgerService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no referral has this id.
    pub async fn get(&self, id: i64) -> Result<Referral, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Referral not found", json!({ "referral_id": id })))
    }

    /// Moves a referral to `target`.
    ///
    /// Only `pending -> completed` and `completed -> paid` are legal. The
    /// write is conditional on the status read here, so a concurrent move
    /// surfaces as an invalid transition rather than a silent overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidTransition`] for any other move; the stored
    /// status is unchanged.
    /// Returns [`AppError::NotFound`] if the referral does not exist.
    pub async fn transition(&self, id: i64, target: ReferralStatus) -> Result<Referral, AppError> {
        let current = self.get(id).await?;

        if !current.status.can_transition_to(&target) {
            return Err(invalid_transition(id, current.status, target));
        }

        match self
            .repository
            .update_status(id, current.status, target)
            .await?
        {
            Some(updated) => {
                tracing::info!(
                    referral_id = id,
                    from = %current.status,
                    to = %target,
                    "Referral status changed"
                );
                Ok(updated)
            }
            None => {
                let latest = self.get(id).await?;
                Err(invalid_transition(id, latest.status, target))
            }
        }
    }

    /// Overwrites a referral's commission amount.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidAmount`] if `amount` is negative.
    /// Returns [`AppError::NotFound`] if the referral does not exist.
    pub async fn set_commission(&self, id: i64, amount: Decimal) -> Result<Referral, AppError> {
        if amount < Decimal::ZERO {
            return Err(AppError::invalid_amount(
                "Commission amount must not be negative",
                json!({ "referral_id": id, "amount": amount.to_string() }),
            ));
        }

        let updated = self
            .repository
            .set_commission(id, amount)
            .await?
            .ok_or_else(|| AppError::not_found("Referral not found", json!({ "referral_id": id })))?;

        tracing::info!(referral_id = id, amount = %amount, "Commission amount set");
        Ok(updated)
    }

    /// Lists a referrer's referrals, newest first.
    pub async fn list_for_referrer(
        &self,
        referrer_id: Uuid,
        status: Option<ReferralStatus>,
    ) -> Result<Vec<Referral>, AppError> {
        self.repository.list_by_referrer(referrer_id, status).await
    }
}

fn invalid_transition(id: i64, from: ReferralStatus, to: ReferralStatus) -> AppError {
    AppError::invalid_transition(
        format!("Cannot move referral from {from} to {to}"),
        json!({
            "referral_id": id,
            "from": from,
            "to": to,
            "allowed": from.next(),
        }),
    )
}
