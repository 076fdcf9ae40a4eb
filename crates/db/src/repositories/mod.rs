//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod ledger;
pub mod sales_fact;

pub use ledger::{LedgerFilter, LedgerRead, LedgerReadError, LedgerRepository};
pub use sales_fact::{CustomerTotalsRow, SalesFactError, SalesFactRepository};
