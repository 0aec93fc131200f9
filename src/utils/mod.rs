//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Referral code generation and normalization
//! - [`db_error`] - Store error classification
//! - [`url_normalizer`] - Redirect URL validation and referral link building

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
