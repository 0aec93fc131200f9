//! Business logic services for the application layer.

pub mod account_service;
pub mod attribution_service;
pub mod event_service;
pub mod ledger_service;
pub mod stats_service;

pub use account_service::AccountService;
pub use attribution_service::{AttributionOutcome, AttributionService};
pub use event_service::EventService;
pub use ledger_service::LedgerService;
pub use stats_service::StatsService;
