//! Webinar registration entity with a lazily resolved referrer code.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A webinar registration.
///
/// `referrer_code` is the raw string the registrant arrived with. It is not a
/// foreign key: the registration is written without consulting accounts, and
/// the code is only resolved when the row is read (see [`ReferrerAttribution`]).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct WebinarRegistration {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub country: String,
    pub webinar_id: String,
    pub referrer_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWebinarRegistration {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub country: String,
    pub webinar_id: String,
    pub referrer_code: Option<String>,
}

/// Read-time view of a registration's referrer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReferrerAttribution {
    /// Registered without a referral code.
    Unattributed,
    /// A code was given but no account currently owns it.
    Unresolved { code: String },
    /// The code belongs to an existing account.
    Resolved {
        code: String,
        account_id: Uuid,
        display_name: String,
    },
}

impl ReferrerAttribution {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            ReferrerAttribution::Resolved { display_name, .. } => Some(display_name),
            _ => None,
        }
    }
}

/// A registration paired with its resolved referrer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRegistration {
    pub registration: WebinarRegistration,
    pub referrer: ReferrerAttribution,
}

/// Filter for listing registrations.
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub webinar_id: Option<String>,
    pub referrer_code: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl RegistrationFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            webinar_id: None,
            referrer_code: None,
            offset,
            limit,
        }
    }

    pub fn with_webinar(mut self, webinar_id: Option<String>) -> Self {
        self.webinar_id = webinar_id;
        self
    }

    pub fn with_referrer_code(mut self, referrer_code: Option<String>) -> Self {
        self.referrer_code = referrer_code;
        self
    }
}
