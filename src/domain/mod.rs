//! Domain layer containing business entities and logic.
//!
//! Independent of infrastructure and presentation concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures and the referral status machine
//! - [`repositories`] - Data access trait definitions
//! - [`stats`] - Pure aggregation of referrer statistics
//! - [`click_event`] - Queued click model
//! - [`click_worker`] - Asynchronous click persistence worker
//!
//! # Click Processing Flow
//!
//! 1. The referral link handler receives a visit
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`click_worker::run_click_worker`] persists it with retry
//! 4. The click lands in the log behind [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod stats;
