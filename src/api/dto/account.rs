//! DTOs for signup and the current account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::AttributionOutcome;
use crate::domain::entities::{Account, Role};
use crate::error::ErrorInfo;
use crate::utils::url_normalizer::referral_link;

/// Signup request sent once the identity provider has created the account id.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    pub account_id: Uuid,

    #[validate(length(max = 200))]
    pub full_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    /// Code the new account arrived with, as typed or taken from `?ref=`.
    #[validate(length(max = 64))]
    pub referral_code: Option<String>,
}

/// Result of a signup.
///
/// The account is always created. `attribution` is absent only when
/// crediting the referrer failed, in which case `attribution_error` says why.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub account: AccountResponse,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<AttributionOutcome>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution_error: Option<ErrorInfo>,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub referral_code: String,
    /// Shareable `{base}/r/{code}` link; visits are counted as clicks and
    /// forwarded to the signup page.
    pub referral_link: Option<String>,
    pub referrer_id: Option<Uuid>,
    pub redirect_url: Option<String>,
    pub role: Role,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AccountResponse {
    pub fn new(account: Account, public_base_url: &str) -> Self {
        Self {
            referral_link: referral_link(public_base_url, &account.referral_code).ok(),
            id: account.id,
            referral_code: account.referral_code,
            referrer_id: account.referrer_id,
            redirect_url: account.redirect_url,
            role: account.role,
            full_name: account.full_name,
            email: account.email,
            created_at: account.created_at,
        }
    }
}

/// `PATCH /api/me/redirect-url` body. `null` or blank clears the URL.
#[derive(Debug, Deserialize)]
pub struct UpdateRedirectUrlRequest {
    pub redirect_url: Option<String>,
}
