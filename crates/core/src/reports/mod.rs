//! Report assembly.
//!
//! Turns ledger rows and query parameters into aging reports. The
//! profitability report lives in [`crate::profitability`]; both share
//! [`ReportError`].

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::AgingService;
pub use types::*;
