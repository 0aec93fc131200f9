//! DTOs for referrer statistics.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::stats::ReferralStats;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub account_id: Uuid,
    pub referral_code: String,
    #[serde(flatten)]
    pub stats: ReferralStats,
}
