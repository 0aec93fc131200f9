//! DTOs for the commission ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Referral;

#[derive(Debug, Deserialize)]
pub struct ReferralListQuery {
    /// `pending`, `completed` or `paid`, case-insensitive.
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReferralListResponse {
    pub total: usize,
    pub items: Vec<Referral>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: String,
}

/// Accepts the amount as a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
pub struct CommissionRequest {
    pub amount: Decimal,
}
