//! Shared application state injected into every handler.

use std::sync::Arc;

use chrono::FixedOffset;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{
    AccountService, AttributionService, EventService, LedgerService, StatsService,
};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{
    AccountRepository, ClickRepository, ReferralRepository, RegistrationRepository,
};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{
    PgAccountRepository, PgClickRepository, PgReferralRepository, PgRegistrationRepository,
};

pub type DynAccountService = AccountService<dyn AccountRepository>;
pub type DynAttributionService = AttributionService<dyn AccountRepository, dyn ReferralRepository>;
pub type DynEventService = EventService<dyn RegistrationRepository>;
pub type DynLedgerService = LedgerService<dyn ReferralRepository>;
pub type DynStatsService = StatsService<
    dyn AccountRepository,
    dyn ReferralRepository,
    dyn ClickRepository,
    dyn RegistrationRepository,
>;

/// The four repositories behind one backend.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub referrals: Arc<dyn ReferralRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            referrals: Arc::new(PgReferralRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool.clone())),
            registrations: Arc::new(PgRegistrationRepository::new(pool)),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            accounts: store.clone(),
            referrals: store.clone(),
            clicks: store.clone(),
            registrations: store,
        }
    }
}

/// Settings the services need beyond their repositories.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub referral_code_prefix: String,
    pub code_generation_attempts: u32,
    pub reporting_offset: FixedOffset,
    pub signup_url: String,
    pub public_base_url: String,
}

impl From<&crate::config::Config> for ServiceSettings {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            referral_code_prefix: config.referral_code_prefix.clone(),
            code_generation_attempts: config.code_generation_attempts,
            reporting_offset: config.reporting_offset,
            signup_url: config.signup_url.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<DynAccountService>,
    pub attribution_service: Arc<DynAttributionService>,
    pub event_service: Arc<DynEventService>,
    pub ledger_service: Arc<DynLedgerService>,
    pub stats_service: Arc<DynStatsService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub signup_url: Arc<str>,
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        settings: &ServiceSettings,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        let account_service = Arc::new(AccountService::new(
            repositories.accounts,
            settings.referral_code_prefix.clone(),
            settings.code_generation_attempts,
        ));

        let attribution_service = Arc::new(AttributionService::new(
            account_service.clone(),
            repositories.referrals.clone(),
        ));

        let event_service = Arc::new(EventService::new(repositories.registrations.clone()));

        let ledger_service = Arc::new(LedgerService::new(repositories.referrals.clone()));

        let stats_service = Arc::new(StatsService::new(
            account_service.clone(),
            repositories.referrals,
            repositories.clicks,
            repositories.registrations,
            settings.reporting_offset,
        ));

        Self {
            account_service,
            attribution_service,
            event_service,
            ledger_service,
            stats_service,
            click_sender,
            signup_url: Arc::from(settings.signup_url.as_str()),
            public_base_url: Arc::from(settings.public_base_url.as_str()),
        }
    }
}
