//! Referral code generation and normalization.
//!
//! A referral code is a two-letter uppercase prefix followed by six characters
//! drawn uniformly from `[A-Z0-9]`, e.g. `QR1A2B3C`.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Number of random characters after the prefix.
pub const CODE_BODY_LENGTH: usize = 6;

/// Prefix used when none is configured.
pub const DEFAULT_CODE_PREFIX: &str = "QR";

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{6}$").unwrap());

static PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// Generates a new referral code with the given prefix.
///
/// Uniqueness is not checked here; the store's unique constraint is the
/// source of truth and callers retry on collision.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code("QR");
/// assert!(is_well_formed(&code));
/// ```
pub fn generate_code(prefix: &str) -> String {
    let mut rng = rand::rng();
    let body: String = (0..CODE_BODY_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{prefix}{body}")
}

/// Canonical lookup form of a user-supplied code: trimmed and uppercased.
///
/// Returns `None` for empty input, which callers treat as "no referrer".
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_uppercase())
    }
}

/// Returns true if `code` has the exact shape of a referral code.
pub fn is_well_formed(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns true if `prefix` is a valid code prefix (two uppercase letters).
pub fn is_valid_prefix(prefix: &str) -> bool {
    PREFIX_REGEX.is_match(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = generate_code(DEFAULT_CODE_PREFIX);
            assert_eq!(code.len(), 8);
            assert!(code.starts_with("QR"));
            assert!(is_well_formed(&code), "malformed code {code}");
        }
    }

    #[test]
    fn test_generate_code_uses_configured_prefix() {
        let code = generate_code("AB");
        assert!(code.starts_with("AB"));
        assert!(is_well_formed(&code));
    }

    #[test]
    fn test_generate_code_body_is_uppercase_alphanumeric() {
        let code = generate_code(DEFAULT_CODE_PREFIX);
        assert!(
            code[2..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_generate_code_varies() {
        let codes: HashSet<String> = (0..200).map(|_| generate_code("QR")).collect();
        assert_eq!(codes.len(), 200);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  qr1a2b3c "), Some("QR1A2B3C".to_string()));
        assert_eq!(normalize_code("QR1A2B3C"), Some("QR1A2B3C".to_string()));
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_code("   "), None);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("QR1A2B3C"));
        assert!(is_well_formed("ZZ000000"));
        assert!(!is_well_formed("qr1a2b3c"));
        assert!(!is_well_formed("QR1A2B3"));
        assert!(!is_well_formed("QR1A2B3C4"));
        assert!(!is_well_formed("Q11A2B3C"));
        assert!(!is_well_formed("QR-A2B3C"));
        assert!(!is_well_formed(""));
    }

    #[test]
    fn test_is_valid_prefix() {
        assert!(is_valid_prefix("QR"));
        assert!(!is_valid_prefix("Q"));
        assert!(!is_valid_prefix("qr"));
        assert!(!is_valid_prefix("Q1"));
        assert!(!is_valid_prefix("QRS"));
    }
}
