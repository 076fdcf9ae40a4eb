//! Entity re-exports.

pub use super::ledger_entries::Entity as LedgerEntries;
pub use super::sales_facts::Entity as SalesFacts;
