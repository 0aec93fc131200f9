//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence` (PostgreSQL) and
//! `crate::infrastructure::memory` (in-process). Mock implementations are
//! generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`AccountRepository`] - Accounts and referral code lookup
//! - [`ReferralRepository`] - Commission ledger and attribution
//! - [`ClickRepository`] - Referral link visits
//! - [`RegistrationRepository`] - Webinar registrations

pub mod account_repository;
pub mod event_repository;
pub mod referral_repository;

pub use account_repository::{AccountRepository, REFERRAL_CODE_CONSTRAINT};
pub use event_repository::{ClickRepository, RegistrationRepository};
pub use referral_repository::ReferralRepository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use event_repository::{MockClickRepository, MockRegistrationRepository};
#[cfg(test)]
pub use referral_repository::MockReferralRepository;
