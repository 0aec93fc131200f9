//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries. Rows are decoded into private `*Row` structs and converted with
//! `TryFrom`, so unexpected enum strings surface as errors.
//!
//! # Repositories
//!
//! - [`PgAccountRepository`] - Accounts and referral codes
//! - [`PgReferralRepository`] - Commission ledger with atomic attribution
//! - [`PgClickRepository`] - Referral link visits
//! - [`PgRegistrationRepository`] - Webinar registrations

pub mod pg_account_repository;
pub mod pg_event_repository;
pub mod pg_referral_repository;

pub use pg_account_repository::PgAccountRepository;
pub use pg_event_repository::{PgClickRepository, PgRegistrationRepository};
pub use pg_referral_repository::PgReferralRepository;
