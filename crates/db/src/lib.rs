//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ERP ledger and sales facts
//! - The ledger and sales fact readers used by the reports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    LedgerFilter, LedgerRead, LedgerReadError, LedgerRepository, SalesFactError,
    SalesFactRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tally_shared::config::DatabaseConfig;

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
