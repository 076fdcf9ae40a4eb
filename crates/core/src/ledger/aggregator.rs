//! Invoice netting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{InvoiceNo, PartyNo};
use tracing::warn;

use super::types::{DataWarning, InvoiceBalance, LedgerEntry};

/// Balances at or below this amount are treated as settled.
pub const OPEN_BALANCE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Result of netting a set of ledger entries.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Open invoices ordered by party then invoice number.
    pub invoices: Vec<InvoiceBalance>,
    /// Rows that could not be netted.
    pub warnings: Vec<DataWarning>,
    /// Invoices dropped because they are settled.
    pub settled_count: usize,
}

#[derive(Debug, Default)]
struct Accumulator {
    net_balance: Decimal,
    due_date: Option<NaiveDate>,
    entry_count: usize,
}

impl Accumulator {
    fn add(&mut self, entry: &LedgerEntry) {
        self.net_balance += entry.amount;
        self.entry_count += 1;
        self.due_date = match (self.due_date, entry.due_date) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
    }
}

/// Nets ledger entries into per-invoice balances.
pub struct InvoiceAggregator;

impl InvoiceAggregator {
    /// Groups active entries by `(party, invoice)` and keeps the open ones.
    ///
    /// Inactive rows are ignored. Rows without an invoice number are skipped
    /// and reported as warnings.
    #[must_use]
    pub fn aggregate<'a, I>(entries: I) -> Aggregation
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut groups: BTreeMap<(PartyNo, InvoiceNo), Accumulator> = BTreeMap::new();
        let mut warnings = Vec::new();

        for entry in entries.into_iter().filter(|e| e.is_active()) {
            let Some(invoice_no) = entry.invoice_no.clone() else {
                warn!(
                    entry_id = entry.entry_id,
                    party_no = %entry.party_no,
                    "Skipping ledger entry without invoice number"
                );
                warnings.push(DataWarning::MissingInvoiceNo {
                    entry_id: entry.entry_id,
                    party_no: entry.party_no.clone(),
                });
                continue;
            };

            groups
                .entry((entry.party_no.clone(), invoice_no))
                .or_default()
                .add(entry);
        }

        let mut settled_count = 0;
        let mut invoices = Vec::with_capacity(groups.len());

        for ((party_no, invoice_no), acc) in groups {
            if !Self::is_open(acc.net_balance) {
                settled_count += 1;
                continue;
            }

            invoices.push(InvoiceBalance {
                invoice_no,
                party_no,
                due_date: acc.due_date,
                net_balance: acc.net_balance,
                entry_count: acc.entry_count,
            });
        }

        Aggregation {
            invoices,
            warnings,
            settled_count,
        }
    }

    /// Returns true if a net balance is still owed.
    #[must_use]
    pub fn is_open(net_balance: Decimal) -> bool {
        net_balance > OPEN_BALANCE_EPSILON
    }
}
