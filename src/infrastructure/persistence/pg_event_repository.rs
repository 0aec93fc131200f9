//! PostgreSQL implementations of the click and registration logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    Click, NewClick, NewWebinarRegistration, RegistrationFilter, WebinarRegistration,
};
use crate::domain::repositories::{ClickRepository, RegistrationRepository};
use crate::error::AppError;

const REGISTRATION_COLUMNS: &str =
    "id, name, email, mobile, country, webinar_id, referrer_code, created_at";

pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let (id, referral_code, created_at): (i64, String, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO referral_clicks (referral_code)
            VALUES ($1)
            RETURNING id, referral_code, created_at
            "#,
        )
        .bind(new_click.referral_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Click {
            id,
            referral_code,
            created_at,
        })
    }

    async fn count_by_code(&self, code: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM referral_clicks WHERE referral_code = $1")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}

pub struct PgRegistrationRepository {
    pool: Arc<PgPool>,
}

impl PgRegistrationRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn record_registration(
        &self,
        new_registration: NewWebinarRegistration,
    ) -> Result<WebinarRegistration, AppError> {
        let registration = sqlx::query_as::<_, WebinarRegistration>(&format!(
            r#"
            INSERT INTO webinar_registrations
                (name, email, mobile, country, webinar_id, referrer_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(new_registration.name)
        .bind(new_registration.email)
        .bind(new_registration.mobile)
        .bind(new_registration.country)
        .bind(new_registration.webinar_id)
        .bind(new_registration.referrer_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(registration)
    }

    async fn count_by_referrer_code(&self, code: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM webinar_registrations WHERE referrer_code = $1",
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn list(&self, filter: RegistrationFilter) -> Result<Vec<WebinarRegistration>, AppError> {
        let rows = sqlx::query_as::<_, WebinarRegistration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
            FROM webinar_registrations
            WHERE ($1::text IS NULL OR webinar_id = $1)
              AND ($2::text IS NULL OR referrer_code = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.webinar_id)
        .bind(filter.referrer_code)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn count(&self, filter: RegistrationFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM webinar_registrations
            WHERE ($1::text IS NULL OR webinar_id = $1)
              AND ($2::text IS NULL OR referrer_code = $2)
            "#,
        )
        .bind(filter.webinar_id)
        .bind(filter.referrer_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
