use crate::domain::repositories::REFERRAL_CODE_CONSTRAINT;
use crate::error::AppError;

/// Returns true if the error is a unique violation on the referral code column.
pub fn is_unique_violation_on_code(e: &AppError) -> bool {
    let AppError::Conflict { details, .. } = e else {
        return false;
    };

    details.get("constraint").and_then(|c| c.as_str()) == Some(REFERRAL_CODE_CONSTRAINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_conflict_detected() {
        let err = AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": "profiles_referral_code_key" }),
        );
        assert!(is_unique_violation_on_code(&err));
    }

    #[test]
    fn test_other_conflicts_ignored() {
        let err = AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": "profiles_pkey" }),
        );
        assert!(!is_unique_violation_on_code(&err));
        assert!(!is_unique_violation_on_code(&AppError::internal("x", json!({}))));
    }
}
