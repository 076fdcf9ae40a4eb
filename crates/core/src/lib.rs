//! Core reporting logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It turns append-only AR/AP ledger detail into point-in-time invoice balances,
//! ages them, and classifies customer profitability.
//!
//! # Modules
//!
//! - `ledger` - Ledger entries and invoice netting
//! - `aging` - Bucket tables, classification and roll-ups
//! - `profitability` - Customer margin health and pricing recommendations
//! - `reports` - Aging report assembly from query parameters
//! - `clock` - Source of "today" for default as-of dates

pub mod aging;
pub mod clock;
pub mod ledger;
pub mod profitability;
pub mod reports;

pub use clock::{Clock, FixedClock, SystemClock};
