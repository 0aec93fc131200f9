//! Referrer performance snapshot.
//!
//! Statistics are a pure fold over the referrer's ledger rows plus two event
//! counts. Nothing is cached; every call recomputes from current store state.

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::{Referral, ReferralStatus};

/// Half-open `[start, end)` interval covering one local calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Month containing `now` in the given local offset.
    ///
    /// Boundaries fall on local midnight of the 1st.
    pub fn containing(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local_date = now.with_timezone(&offset).date_naive();
        let first = local_date.with_day(1).unwrap_or(local_date);
        let next_first = first.checked_add_months(Months::new(1)).unwrap_or(first);

        let to_utc = |date: chrono::NaiveDate| {
            date.and_time(NaiveTime::MIN)
                .and_local_timezone(offset)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(now)
        };

        Self {
            start: to_utc(first),
            end: to_utc(next_first),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Aggregated statistics shown to a referrer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferralStats {
    pub total_referrals: i64,
    pub completed_referrals: i64,
    pub total_earnings: Decimal,
    pub pending_earnings: Decimal,
    pub this_month_earnings: Decimal,
    pub click_count: i64,
    pub webinar_registration_count: i64,
}

impl ReferralStats {
    /// Folds a referrer's referrals and event counts into a snapshot.
    pub fn compute(
        referrals: &[Referral],
        click_count: i64,
        webinar_registration_count: i64,
        month: MonthWindow,
    ) -> Self {
        let mut stats = Self {
            total_referrals: 0,
            completed_referrals: 0,
            total_earnings: Decimal::ZERO,
            pending_earnings: Decimal::ZERO,
            this_month_earnings: Decimal::ZERO,
            click_count,
            webinar_registration_count,
        };

        for referral in referrals {
            stats.total_referrals += 1;
            stats.total_earnings += referral.commission_amount;

            if referral.status.is_converted() {
                stats.completed_referrals += 1;
            }
            if referral.status == ReferralStatus::Pending {
                stats.pending_earnings += referral.commission_amount;
            }
            if month.contains(referral.created_at) {
                stats.this_month_earnings += referral.commission_amount;
            }
        }

        stats
    }
}
