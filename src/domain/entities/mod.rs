//! Core domain entities representing the referral program data model.
//!
//! # Entity Types
//!
//! - [`Account`] - A participant owning a unique referral code
//! - [`Referral`] - A commission-bearing referrer/referred pair
//! - [`Click`] - A referral link visit
//! - [`WebinarRegistration`] - A webinar signup with an optional raw referrer code
//!
//! Creation inputs use separate `New*` structs; persisted rows carry ids and
//! timestamps assigned by the store.

pub mod account;
pub mod click;
pub mod referral;
pub mod webinar_registration;

pub use account::{Account, NewAccount, Role};
pub use click::{Click, NewClick};
pub use referral::{Referral, ReferralStatus};
pub use webinar_registration::{
    NewWebinarRegistration, ReferrerAttribution, RegistrationFilter, ResolvedRegistration,
    WebinarRegistration,
};
