//! Account entity: an identity owning a unique referral code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Standard,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Role::Standard),
            "administrator" => Ok(Role::Administrator),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// A referral program participant.
///
/// `referral_code` is assigned once at creation and never changes.
/// `referrer_id` is written at most once, by attribution, and never points
/// at the account itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub referral_code: String,
    pub referrer_id: Option<Uuid>,
    pub redirect_url: Option<String>,
    pub role: Role,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Name shown to other users when this account is credited as a referrer.
    ///
    /// Falls back to the referral code when no name was provided at signup.
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.referral_code.clone(),
        }
    }
}

/// Input data for creating a new account.
///
/// The id comes from the identity provider; the referral code is minted by
/// [`crate::application::services::AccountService`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub referral_code: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub email: Option<String>,
}
