//! PostgreSQL implementation of the referral ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Referral, ReferralStatus};
use crate::domain::repositories::ReferralRepository;
use crate::error::AppError;

const REFERRAL_COLUMNS: &str =
    "id, referrer_id, referred_account_id, status, commission_amount, created_at";

pub struct PgReferralRepository {
    pool: Arc<PgPool>,
}

impl PgReferralRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ReferralRow {
    id: i64,
    referrer_id: Uuid,
    referred_account_id: Uuid,
    status: String,
    commission_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReferralRow> for Referral {
    type Error = AppError;

    fn try_from(row: ReferralRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ReferralStatus>().map_err(|reason| {
            AppError::internal(
                "Corrupt referral row",
                json!({ "referral_id": row.id, "reason": reason }),
            )
        })?;

        Ok(Referral {
            id: row.id,
            referrer_id: row.referrer_id,
            referred_account_id: row.referred_account_id,
            status,
            commission_amount: row.commission_amount,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ReferralRepository for PgReferralRepository {
    async fn attribute(
        &self,
        referrer_id: Uuid,
        referred_account_id: Uuid,
    ) -> Result<Option<Referral>, AppError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE profiles
            SET referrer_id = $2
            WHERE id = $1 AND referrer_id IS NULL AND id <> $2
            "#,
        )
        .bind(referred_account_id)
        .bind(referrer_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, ReferralRow>(&format!(
            r#"
            INSERT INTO referrals (referrer_id, referred_account_id, status, commission_amount)
            VALUES ($1, $2, 'pending', 0)
            RETURNING {REFERRAL_COLUMNS}
            "#
        ))
        .bind(referrer_id)
        .bind(referred_account_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into().map(Some)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Referral>, AppError> {
        let row = sqlx::query_as::<_, ReferralRow>(&format!(
            "SELECT {REFERRAL_COLUMNS} FROM referrals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Referral::try_from).transpose()
    }

    async fn list_by_referrer(
        &self,
        referrer_id: Uuid,
        status: Option<ReferralStatus>,
    ) -> Result<Vec<Referral>, AppError> {
        let rows = sqlx::query_as::<_, ReferralRow>(&format!(
            r#"
            SELECT {REFERRAL_COLUMNS}
            FROM referrals
            WHERE referrer_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(referrer_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Referral::try_from).collect()
    }

    async fn update_status(
        &self,
        id: i64,
        from: ReferralStatus,
        to: ReferralStatus,
    ) -> Result<Option<Referral>, AppError> {
        let row = sqlx::query_as::<_, ReferralRow>(&format!(
            r#"
            UPDATE referrals SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING {REFERRAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Referral::try_from).transpose()
    }

    async fn set_commission(
        &self,
        id: i64,
        amount: Decimal,
    ) -> Result<Option<Referral>, AppError> {
        let row = sqlx::query_as::<_, ReferralRow>(&format!(
            "UPDATE referrals SET commission_amount = $2 WHERE id = $1 RETURNING {REFERRAL_COLUMNS}"
        ))
        .bind(id)
        .bind(amount)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Referral::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_an_error() {
        let row = ReferralRow {
            id: 3,
            referrer_id: Uuid::new_v4(),
            referred_account_id: Uuid::new_v4(),
            status: "refunded".to_string(),
            commission_amount: Decimal::ZERO,
            created_at: Utc::now(),
        };

        assert!(matches!(
            Referral::try_from(row).unwrap_err(),
            AppError::Internal { .. }
        ));
    }
}
