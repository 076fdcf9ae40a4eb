//! Ledger entries and invoice netting.
//!
//! Ledger rows are immutable and owned by the upstream ERP. This module only
//! reads them: it decides which rows are active and nets them per invoice.

pub mod aggregator;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregator::{Aggregation, InvoiceAggregator, OPEN_BALANCE_EPSILON};
pub use types::{DataWarning, EntryType, InvoiceBalance, LedgerEntry, LedgerType};
