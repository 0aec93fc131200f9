//! Click entity representing a single referral link visit.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A recorded visit of a referral link.
///
/// `referral_code` is stored exactly as received and is not required to
/// belong to any account; clicks are a volume metric only.
#[derive(Debug, Clone, Serialize)]
pub struct Click {
    pub id: i64,
    pub referral_code: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a new click.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub referral_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_click_keeps_code_verbatim() {
        let new_click = NewClick {
            referral_code: "qr1a2b3c ".to_string(),
        };

        assert_eq!(new_click.referral_code, "qr1a2b3c ");
    }
}
