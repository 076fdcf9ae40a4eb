//! Aging report types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::PartyNo;

use super::error::ReportError;
use crate::aging::{AgedInvoice, BucketTotal, PartyAging};
use crate::ledger::{DataWarning, LedgerType};

/// Order of the invoice list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceSort {
    /// Oldest first; undated invoices last.
    #[default]
    DaysOld,
    /// Largest balance first.
    Balance,
    /// Earliest due date first; undated invoices last.
    DueDate,
    /// Invoice number ascending.
    InvoiceNo,
}

impl InvoiceSort {
    /// Returns the query-string name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DaysOld => "days_old",
            Self::Balance => "balance",
            Self::DueDate => "due_date",
            Self::InvoiceNo => "invoice_no",
        }
    }
}

impl fmt::Display for InvoiceSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceSort {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days_old" | "age" => Ok(Self::DaysOld),
            "balance" | "amount" => Ok(Self::Balance),
            "due_date" => Ok(Self::DueDate),
            "invoice_no" | "invoice" => Ok(Self::InvoiceNo),
            _ => Err(ReportError::InvalidSort(s.to_string())),
        }
    }
}

/// Parameters of an aging report.
///
/// Everything the dashboard used to keep as filter state is an explicit field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingQuery {
    /// Receivables or payables.
    pub ledger_type: LedgerType,
    /// Reference date; today when absent.
    pub as_of_date: Option<NaiveDate>,
    /// Restrict to one customer or vendor.
    pub party_no: Option<PartyNo>,
    /// Restrict the invoice list to these bucket labels.
    pub buckets: Option<Vec<String>>,
    /// Invoice list order.
    #[serde(default)]
    pub sort: InvoiceSort,
}

impl AgingQuery {
    /// Query for the whole ledger as of today.
    #[must_use]
    pub const fn new(ledger_type: LedgerType) -> Self {
        Self {
            ledger_type,
            as_of_date: None,
            party_no: None,
            buckets: None,
            sort: InvoiceSort::DaysOld,
        }
    }

    /// Sets the reference date.
    #[must_use]
    pub const fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of_date = Some(date);
        self
    }

    /// Restricts to one party.
    #[must_use]
    pub fn for_party(mut self, party_no: PartyNo) -> Self {
        self.party_no = Some(party_no);
        self
    }

    /// Restricts the invoice list to the given buckets.
    #[must_use]
    pub fn in_buckets<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the invoice order.
    #[must_use]
    pub const fn sorted_by(mut self, sort: InvoiceSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Aging report for one ledger at one reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingReport {
    /// Report type identifier.
    pub report_type: String,
    /// Receivables or payables.
    pub ledger_type: LedgerType,
    /// Reference date used for aging.
    pub as_of_date: NaiveDate,
    /// True when an explicit past date was requested; balances then
    /// reflect entry dates, not a true bitemporal reconstruction.
    pub as_of_is_approximate: bool,
    /// Every bucket in table order, "No Due Date" last.
    pub buckets: Vec<BucketTotal>,
    /// Sum of all bucket totals.
    pub grand_total: Decimal,
    /// Number of open invoices.
    pub total_count: usize,
    /// Open invoices after the bucket filter, in the requested order.
    pub invoices: Vec<AgedInvoice>,
    /// Per-party subtotals, largest first.
    pub party_totals: Vec<PartyAging>,
    /// Invoices netted to zero or less.
    pub settled_count: usize,
    /// Rows skipped while building the report.
    pub warnings: Vec<DataWarning>,
}
