//! Ledger data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tally_shared::types::{InvoiceNo, PartyNo};

/// Which sub-ledger a report reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    /// Accounts receivable (customers owe the dealership).
    Ar,
    /// Accounts payable (the dealership owes vendors).
    Ap,
}

impl LedgerType {
    /// Returns the short lowercase code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::Ap => "ap",
        }
    }
}

impl std::fmt::Display for LedgerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LedgerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "receivable" | "receivables" => Ok(Self::Ar),
            "ap" | "payable" | "payables" => Ok(Self::Ap),
            _ => Err(format!("Unknown ledger type: {s}")),
        }
    }
}

/// Kind of ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Amount billed (positive).
    Charge,
    /// Cash received or paid (negative).
    Payment,
    /// Credit memo (negative).
    Credit,
    /// Manual correction (either sign).
    Adjustment,
}

impl std::str::FromStr for EntryType {
    type Err = String;

    /// Accepts both the spelled-out names and the ERP's three-letter codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "charge" | "chg" | "inv" => Ok(Self::Charge),
            "payment" | "pmt" | "pay" => Ok(Self::Payment),
            "credit" | "crd" | "cm" => Ok(Self::Credit),
            "adjustment" | "adj" => Ok(Self::Adjustment),
            _ => Err(format!("Unknown entry type: {s}")),
        }
    }
}

/// A single immutable ledger detail row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Row identifier in the ERP.
    pub entry_id: i64,
    /// Invoice the entry applies to. Missing on some unapplied cash rows.
    pub invoice_no: Option<InvoiceNo>,
    /// Customer (AR) or vendor (AP) number.
    pub party_no: PartyNo,
    /// Transaction kind.
    pub entry_type: EntryType,
    /// Signed amount: positive charges, negative payments and credits.
    pub amount: Decimal,
    /// Due date carried on the entry, if any.
    pub due_date: Option<NaiveDate>,
    /// Date the entry was booked.
    pub entry_date: NaiveDate,
    /// Set when the ERP has moved the row to history.
    pub is_historical: Option<bool>,
    /// Soft-delete timestamp.
    pub is_deleted: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Returns true if the row participates in balances.
    ///
    /// A row is active when it is not historical (false or null) and not deleted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_historical.unwrap_or(false) && self.is_deleted.is_none()
    }
}

/// Net position of one invoice, derived from its active entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceBalance {
    /// Invoice number.
    pub invoice_no: InvoiceNo,
    /// Customer or vendor number.
    pub party_no: PartyNo,
    /// Earliest due date among the invoice's entries.
    pub due_date: Option<NaiveDate>,
    /// Sum of active entry amounts.
    pub net_balance: Decimal,
    /// Number of active entries netted into the balance.
    pub entry_count: usize,
}

/// Non-fatal problem with an individual ledger row.
///
/// The row is skipped and the report continues; the warning travels with the
/// report so the caller can show it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// The entry has no invoice number and cannot be netted.
    #[error("entry {entry_id} for party {party_no} has no invoice number")]
    MissingInvoiceNo {
        /// Offending row.
        entry_id: i64,
        /// Party on the row.
        party_no: PartyNo,
    },
    /// The row could not be mapped into a ledger entry.
    #[error("{} is unreadable: {reason}", row_label(*entry_id))]
    UnreadableRow {
        /// Offending row, when its key could be read.
        entry_id: Option<i64>,
        /// What was wrong.
        reason: String,
    },
}

fn row_label(entry_id: Option<i64>) -> String {
    entry_id.map_or_else(|| "ledger row".to_string(), |id| format!("entry {id}"))
}
