//! PostgreSQL implementation of the account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Account, NewAccount, Role};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;

const ACCOUNT_COLUMNS: &str =
    "id, referral_code, referrer_id, redirect_url, role, full_name, email, created_at";

pub struct PgAccountRepository {
    pool: Arc<PgPool>,
}

impl PgAccountRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AccountRow {
    id: Uuid,
    referral_code: String,
    referrer_id: Option<Uuid>,
    redirect_url: Option<String>,
    role: String,
    full_name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|reason| {
            AppError::internal(
                "Corrupt account row",
                json!({ "account_id": row.id, "reason": reason }),
            )
        })?;

        Ok(Account {
            id: row.id,
            referral_code: row.referral_code,
            referrer_id: row.referrer_id,
            redirect_url: row.redirect_url,
            role,
            full_name: row.full_name,
            email: row.email,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO profiles (id, referral_code, role, full_name, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(new_account.id)
        .bind(&new_account.referral_code)
        .bind(new_account.role.as_str())
        .bind(&new_account.full_name)
        .bind(&new_account.email)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM profiles WHERE referral_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn update_redirect_url(
        &self,
        id: Uuid,
        redirect_url: Option<String>,
    ) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE profiles SET redirect_url = $2 WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(redirect_url)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Account not found", json!({ "account_id": id })))?;

        row.try_into()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE profiles SET role = $2 WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Account not found", json!({ "account_id": id })))?;

        row.try_into()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
