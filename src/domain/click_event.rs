//! Click event model for asynchronous click recording.

/// An in-memory click waiting to be persisted.
///
/// Sent from the referral link handler to the background worker through a
/// bounded channel, so redirects never wait on the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub referral_code: String,
}

impl ClickEvent {
    /// Creates a click event for a raw referral code, kept exactly as received.
    pub fn new(referral_code: impl Into<String>) -> Self {
        Self {
            referral_code: referral_code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_keeps_code_verbatim() {
        let event = ClickEvent::new("qr1A2b3C");
        assert_eq!(event.referral_code, "qr1A2b3C");
    }
}
