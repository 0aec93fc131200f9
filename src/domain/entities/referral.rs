//! Referral entity and its commission status state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Commission lifecycle status.
///
/// Statuses are totally ordered `Pending < Completed < Paid` and only move
/// forward one step at a time. Skipping `Completed` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    /// Created at attribution time; commission not yet earned.
    Pending,
    /// Commission earned and payable.
    Completed,
    /// Settled by the external payout process.
    Paid,
}

impl ReferralStatus {
    pub const ALL: [ReferralStatus; 3] = [
        ReferralStatus::Pending,
        ReferralStatus::Completed,
        ReferralStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Completed => "completed",
            ReferralStatus::Paid => "paid",
        }
    }

    /// The only status this one may move to, if any.
    pub fn next(&self) -> Option<ReferralStatus> {
        match self {
            ReferralStatus::Pending => Some(ReferralStatus::Completed),
            ReferralStatus::Completed => Some(ReferralStatus::Paid),
            ReferralStatus::Paid => None,
        }
    }

    pub fn can_transition_to(&self, target: &ReferralStatus) -> bool {
        use ReferralStatus::*;
        matches!((self, target), (Pending, Completed) | (Completed, Paid))
    }

    /// True for statuses counted as a converted referral.
    pub fn is_converted(&self) -> bool {
        matches!(self, ReferralStatus::Completed | ReferralStatus::Paid)
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferralStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReferralStatus::Pending),
            "completed" => Ok(ReferralStatus::Completed),
            "paid" => Ok(ReferralStatus::Paid),
            other => Err(format!("unknown referral status '{other}'")),
        }
    }
}

/// One commission-bearing relationship between a referrer and a referred account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Referral {
    pub id: i64,
    pub referrer_id: Uuid,
    pub referred_account_id: Uuid,
    pub status: ReferralStatus,
    pub commission_amount: Decimal,
    pub created_at: DateTime<Utc>,
}
