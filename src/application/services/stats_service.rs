//! Referrer statistics and lazy referrer name resolution.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::application::services::AccountService;
use crate::domain::entities::{
    Account, ReferrerAttribution, ResolvedRegistration, WebinarRegistration,
};
use crate::domain::repositories::{
    AccountRepository, ClickRepository, ReferralRepository, RegistrationRepository,
};
use crate::domain::stats::{MonthWindow, ReferralStats};
use crate::error::AppError;

/// Aggregation engine.
///
/// Every call recomputes from the ledger and event logs. Counts over clicks
/// and registrations compare the stored code with the account's code
/// exactly, so `qr1a2b3c` does not count for `QR1A2B3C`.
pub struct StatsService<A, R, C, W>
where
    A: AccountRepository + ?Sized,
    R: ReferralRepository + ?Sized,
    C: ClickRepository + ?Sized,
    W: RegistrationRepository + ?Sized,
{
    accounts: Arc<AccountService<A>>,
    referrals: Arc<R>,
    clicks: Arc<C>,
    registrations: Arc<W>,
    reporting_offset: FixedOffset,
}

impl<A, R, C, W> StatsService<A, R, C, W>
where
    A: AccountRepository + ?Sized,
    R: ReferralRepository + ?Sized,
    C: ClickRepository + ?Sized,
    W: RegistrationRepository + ?Sized,
{
    pub fn new(
        accounts: Arc<AccountService<A>>,
        referrals: Arc<R>,
        clicks: Arc<C>,
        registrations: Arc<W>,
        reporting_offset: FixedOffset,
    ) -> Self {
        Self {
            accounts,
            referrals,
            clicks,
            registrations,
            reporting_offset,
        }
    }

    /// Statistics for `account` as of `now`.
    ///
    /// `this_month_earnings` covers the calendar month containing `now` in
    /// the configured reporting offset.
    pub async fn stats(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<ReferralStats, AppError> {
        let referrals = self.referrals.list_by_referrer(account.id, None).await?;
        let click_count = self.clicks.count_by_code(&account.referral_code).await?;
        let registration_count = self
            .registrations
            .count_by_referrer_code(&account.referral_code)
            .await?;

        let month = MonthWindow::containing(now, self.reporting_offset);

        Ok(ReferralStats::compute(
            &referrals,
            click_count,
            registration_count,
            month,
        ))
    }

    /// Pairs each registration with its referrer, looked up once per
    /// distinct code.
    ///
    /// Stored codes are matched exactly, so a registration resolves to an
    /// account only when it also counts towards that account's statistics.
    pub async fn resolve_referrer_names(
        &self,
        registrations: Vec<WebinarRegistration>,
    ) -> Result<Vec<ResolvedRegistration>, AppError> {
        let mut owners: HashMap<String, Option<Account>> = HashMap::new();

        for code in registrations.iter().filter_map(|r| r.referrer_code.as_ref()) {
            if !owners.contains_key(code) {
                let owner = self.accounts.find_by_stored_code(code).await?;
                owners.insert(code.clone(), owner);
            }
        }

        Ok(registrations
            .into_iter()
            .map(|registration| {
                let referrer = match &registration.referrer_code {
                    None => ReferrerAttribution::Unattributed,
                    Some(code) => match owners.get(code).and_then(Option::as_ref) {
                        Some(owner) => ReferrerAttribution::Resolved {
                            code: code.clone(),
                            account_id: owner.id,
                            display_name: owner.display_name(),
                        },
                        None => ReferrerAttribution::Unresolved { code: code.clone() },
                    },
                };

                ResolvedRegistration {
                    registration,
                    referrer,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Referral, ReferralStatus, Role};
    use crate::domain::repositories::{
        MockAccountRepository, MockClickRepository, MockReferralRepository,
        MockRegistrationRepository,
    };
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    type TestStatsService = StatsService<
        MockAccountRepository,
        MockReferralRepository,
        MockClickRepository,
        MockRegistrationRepository,
    >;

    fn account(code: &str, full_name: Option<&str>) -> Account {
        Account {
            id: Uuid::new_v4(),
            referral_code: code.to_string(),
            referrer_id: None,
            redirect_url: None,
            role: Role::Standard,
            full_name: full_name.map(str::to_string),
            email: None,
            created_at: Utc::now(),
        }
    }

    fn registration(id: i64, referrer_code: Option<&str>) -> WebinarRegistration {
        WebinarRegistration {
            id,
            name: "Attendee".to_string(),
            email: "a@example.com".to_string(),
            mobile: "+15550100".to_string(),
            country: "US".to_string(),
            webinar_id: "w-1".to_string(),
            referrer_code: referrer_code.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn service(
        accounts: MockAccountRepository,
        referrals: MockReferralRepository,
        clicks: MockClickRepository,
        registrations: MockRegistrationRepository,
    ) -> TestStatsService {
        StatsService::new(
            Arc::new(AccountService::new(Arc::new(accounts), "QR", 5)),
            Arc::new(referrals),
            Arc::new(clicks),
            Arc::new(registrations),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_stats_combines_ledger_and_event_counts() {
        let owner = account("QR1A2B3C", None);
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let owner_id = owner.id;

        let mut referrals = MockReferralRepository::new();
        referrals
            .expect_list_by_referrer()
            .withf(move |id, status| *id == owner_id && status.is_none())
            .returning(move |referrer_id, _| {
                let rows = [
                    (5, ReferralStatus::Pending),
                    (10, ReferralStatus::Completed),
                    (0, ReferralStatus::Paid),
                ];
                Ok(rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, (amount, status))| Referral {
                        id: i as i64,
                        referrer_id,
                        referred_account_id: Uuid::new_v4(),
                        status,
                        commission_amount: Decimal::from(amount),
                        created_at: now,
                    })
                    .collect())
            });

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_count_by_code()
            .withf(|code| code == "QR1A2B3C")
            .returning(|_| Ok(4));

        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_count_by_referrer_code()
            .withf(|code| code == "QR1A2B3C")
            .returning(|_| Ok(2));

        let stats = service(MockAccountRepository::new(), referrals, clicks, registrations)
            .stats(&owner, now)
            .await
            .unwrap();

        assert_eq!(stats.total_referrals, 3);
        assert_eq!(stats.completed_referrals, 2);
        assert_eq!(stats.total_earnings, Decimal::from(15));
        assert_eq!(stats.pending_earnings, Decimal::from(5));
        assert_eq!(stats.this_month_earnings, Decimal::from(15));
        assert_eq!(stats.click_count, 4);
        assert_eq!(stats.webinar_registration_count, 2);
    }

    #[tokio::test]
    async fn test_stats_for_account_without_activity_is_zero() {
        let mut referrals = MockReferralRepository::new();
        referrals
            .expect_list_by_referrer()
            .returning(|_, _| Ok(vec![]));
        let mut clicks = MockClickRepository::new();
        clicks.expect_count_by_code().returning(|_| Ok(0));
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_count_by_referrer_code()
            .returning(|_| Ok(0));

        let stats = service(MockAccountRepository::new(), referrals, clicks, registrations)
            .stats(&account("QR000000", None), Utc::now())
            .await
            .unwrap();

        assert_eq!(stats.total_referrals, 0);
        assert_eq!(stats.total_earnings, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_resolve_names_does_not_normalize_stored_codes() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_code()
            .withf(|code| code == "qr1a2b3c")
            .times(1)
            .returning(|_| Ok(None));

        let resolved = service(
            accounts,
            MockReferralRepository::new(),
            MockClickRepository::new(),
            MockRegistrationRepository::new(),
        )
        .resolve_referrer_names(vec![registration(1, Some("qr1a2b3c"))])
        .await
        .unwrap();

        assert_eq!(
            resolved[0].referrer,
            ReferrerAttribution::Unresolved {
                code: "qr1a2b3c".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_names_looks_up_each_code_once() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_code()
            .withf(|code| code == "QR1A2B3C")
            .times(1)
            .returning(|code| Ok(Some(account(code, Some("Ada")))));
        accounts
            .expect_find_by_code()
            .withf(|code| code == "QRGHOST0")
            .times(1)
            .returning(|_| Ok(None));

        let resolved = service(
            accounts,
            MockReferralRepository::new(),
            MockClickRepository::new(),
            MockRegistrationRepository::new(),
        )
        .resolve_referrer_names(vec![
            registration(1, Some("QR1A2B3C")),
            registration(2, Some("QR1A2B3C")),
            registration(3, Some("QRGHOST0")),
            registration(4, None),
        ])
        .await
        .unwrap();

        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved[0].referrer.display_name(), Some("Ada"));
        assert_eq!(resolved[1].referrer.display_name(), Some("Ada"));
        assert_eq!(
            resolved[2].referrer,
            ReferrerAttribution::Unresolved {
                code: "QRGHOST0".to_string()
            }
        );
        assert_eq!(resolved[3].referrer, ReferrerAttribution::Unattributed);
    }
}
