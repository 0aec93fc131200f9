//! In-process store implementing every repository trait.
//!
//! Backs `STORE_BACKEND=memory` and the HTTP integration tests. All tables
//! live behind one mutex, so multi-row operations such as attribution are
//! atomic in the same way a database transaction is.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{
    Account, Click, NewAccount, NewClick, NewWebinarRegistration, Referral, ReferralStatus,
    RegistrationFilter, Role, WebinarRegistration,
};
use crate::domain::repositories::{
    AccountRepository, ClickRepository, REFERRAL_CODE_CONSTRAINT, ReferralRepository,
    RegistrationRepository,
};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    referrals: Vec<Referral>,
    clicks: Vec<Click>,
    registrations: Vec<WebinarRegistration>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables.lock().map_err(|_| {
            tracing::error!("Memory store lock poisoned");
            AppError::store_unavailable("Store unavailable", json!({}))
        })
    }
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

fn matches_filter(registration: &WebinarRegistration, filter: &RegistrationFilter) -> bool {
    filter
        .webinar_id
        .as_ref()
        .is_none_or(|w| &registration.webinar_id == w)
        && filter
            .referrer_code
            .as_ref()
            .is_none_or(|c| registration.referrer_code.as_ref() == Some(c))
}

fn account_not_found(id: Uuid) -> AppError {
    AppError::not_found("Account not found", json!({ "account_id": id }))
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let mut tables = self.lock()?;

        if tables.accounts.iter().any(|a| a.id == new_account.id) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "profiles_pkey" }),
            ));
        }
        if tables
            .accounts
            .iter()
            .any(|a| a.referral_code == new_account.referral_code)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": REFERRAL_CODE_CONSTRAINT }),
            ));
        }

        let account = Account {
            id: new_account.id,
            referral_code: new_account.referral_code,
            referrer_id: None,
            redirect_url: None,
            role: new_account.role,
            full_name: new_account.full_name,
            email: new_account.email,
            created_at: Utc::now(),
        };
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.lock()?.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .lock()?
            .accounts
            .iter()
            .find(|a| a.referral_code == code)
            .cloned())
    }

    async fn update_redirect_url(
        &self,
        id: Uuid,
        redirect_url: Option<String>,
    ) -> Result<Account, AppError> {
        let mut tables = self.lock()?;
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| account_not_found(id))?;

        account.redirect_url = redirect_url;
        Ok(account.clone())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, AppError> {
        let mut tables = self.lock()?;
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| account_not_found(id))?;

        account.role = role;
        Ok(account.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}

#[async_trait]
impl ReferralRepository for MemoryStore {
    async fn attribute(
        &self,
        referrer_id: Uuid,
        referred_account_id: Uuid,
    ) -> Result<Option<Referral>, AppError> {
        if referrer_id == referred_account_id {
            return Ok(None);
        }

        let mut tables = self.lock()?;
        let Some(subject) = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == referred_account_id && a.referrer_id.is_none())
        else {
            return Ok(None);
        };
        subject.referrer_id = Some(referrer_id);

        let referral = Referral {
            id: next_id(tables.referrals.len()),
            referrer_id,
            referred_account_id,
            status: ReferralStatus::Pending,
            commission_amount: Decimal::ZERO,
            created_at: Utc::now(),
        };
        tables.referrals.push(referral.clone());
        Ok(Some(referral))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Referral>, AppError> {
        Ok(self.lock()?.referrals.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_referrer(
        &self,
        referrer_id: Uuid,
        status: Option<ReferralStatus>,
    ) -> Result<Vec<Referral>, AppError> {
        let tables = self.lock()?;
        let mut referrals: Vec<Referral> = tables
            .referrals
            .iter()
            .filter(|r| r.referrer_id == referrer_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();

        referrals.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(referrals)
    }

    async fn update_status(
        &self,
        id: i64,
        from: ReferralStatus,
        to: ReferralStatus,
    ) -> Result<Option<Referral>, AppError> {
        let mut tables = self.lock()?;
        Ok(tables
            .referrals
            .iter_mut()
            .find(|r| r.id == id && r.status == from)
            .map(|r| {
                r.status = to;
                r.clone()
            }))
    }

    async fn set_commission(
        &self,
        id: i64,
        amount: Decimal,
    ) -> Result<Option<Referral>, AppError> {
        let mut tables = self.lock()?;
        Ok(tables.referrals.iter_mut().find(|r| r.id == id).map(|r| {
            r.commission_amount = amount;
            r.clone()
        }))
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut tables = self.lock()?;
        let click = Click {
            id: next_id(tables.clicks.len()),
            referral_code: new_click.referral_code,
            created_at: Utc::now(),
        };
        tables.clicks.push(click.clone());
        Ok(click)
    }

    async fn count_by_code(&self, code: &str) -> Result<i64, AppError> {
        Ok(self
            .lock()?
            .clicks
            .iter()
            .filter(|c| c.referral_code == code)
            .count() as i64)
    }
}

#[async_trait]
impl RegistrationRepository for MemoryStore {
    async fn record_registration(
        &self,
        new_registration: NewWebinarRegistration,
    ) -> Result<WebinarRegistration, AppError> {
        let mut tables = self.lock()?;
        let registration = WebinarRegistration {
            id: next_id(tables.registrations.len()),
            name: new_registration.name,
            email: new_registration.email,
            mobile: new_registration.mobile,
            country: new_registration.country,
            webinar_id: new_registration.webinar_id,
            referrer_code: new_registration.referrer_code,
            created_at: Utc::now(),
        };
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn count_by_referrer_code(&self, code: &str) -> Result<i64, AppError> {
        Ok(self
            .lock()?
            .registrations
            .iter()
            .filter(|r| r.referrer_code.as_deref() == Some(code))
            .count() as i64)
    }

    async fn list(&self, filter: RegistrationFilter) -> Result<Vec<WebinarRegistration>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .registrations
            .iter()
            .rev()
            .filter(|r| matches_filter(r, &filter))
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: RegistrationFilter) -> Result<i64, AppError> {
        Ok(self
            .lock()?
            .registrations
            .iter()
            .filter(|r| matches_filter(r, &filter))
            .count() as i64)
    }
}
