//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and are
//! generic over them, so handlers can hold trait objects and tests can hold
//! mocks.
//!
//! # Available Services
//!
//! - [`services::AccountService`] - Account registration and referral code registry
//! - [`services::AttributionService`] - Crediting new accounts to their referrer
//! - [`services::EventService`] - Webinar registration log
//! - [`services::LedgerService`] - Referral status transitions and commissions
//! - [`services::StatsService`] - Referrer statistics and name resolution

pub mod services;
