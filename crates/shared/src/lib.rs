//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed business keys for invoices and parties
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
