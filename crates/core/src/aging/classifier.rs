//! Aging classification.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::table::{BucketTable, NO_DUE_DATE};
use crate::ledger::InvoiceBalance;

/// An open invoice together with its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgedInvoice {
    /// The netted invoice.
    #[serde(flatten)]
    pub invoice: InvoiceBalance,
    /// Bucket label.
    pub bucket: String,
    /// Days past due at the reference date; negative when not yet due.
    pub days_old: Option<i64>,
}

/// Assigns invoices to aging buckets.
///
/// Classification is a pure function of `(invoice, reference_date, table)`,
/// so historical reports are reproducible.
pub struct AgingClassifier;

impl AgingClassifier {
    /// Signed whole days between the due date and the reference date.
    #[must_use]
    pub fn days_old(due_date: NaiveDate, reference_date: NaiveDate) -> i64 {
        (reference_date - due_date).num_days()
    }

    /// Returns the bucket label for an invoice.
    #[must_use]
    pub fn classify<'t>(
        invoice: &InvoiceBalance,
        reference_date: NaiveDate,
        table: &'t BucketTable,
    ) -> &'t str {
        match invoice.due_date {
            None => NO_DUE_DATE,
            Some(due) => Self::bucket_for_days(Self::days_old(due, reference_date), table),
        }
    }

    /// Returns the first bucket containing `days_old`.
    #[must_use]
    pub fn bucket_for_days(days_old: i64, table: &BucketTable) -> &str {
        let buckets = table.buckets();
        buckets
            .iter()
            .find(|b| b.contains(days_old))
            // Validated tables have no gaps; the open-ended last bucket is the fallback.
            .or_else(|| buckets.last())
            .map_or(NO_DUE_DATE, |b| b.label.as_str())
    }

    /// Classifies one invoice.
    #[must_use]
    pub fn age(invoice: InvoiceBalance, reference_date: NaiveDate, table: &BucketTable) -> AgedInvoice {
        let bucket = Self::classify(&invoice, reference_date, table).to_string();
        let days_old = invoice
            .due_date
            .map(|due| Self::days_old(due, reference_date));

        AgedInvoice {
            invoice,
            bucket,
            days_old,
        }
    }

    /// Classifies a batch of invoices in parallel, preserving input order.
    #[must_use]
    pub fn age_all(
        invoices: Vec<InvoiceBalance>,
        reference_date: NaiveDate,
        table: &BucketTable,
    ) -> Vec<AgedInvoice> {
        invoices
            .into_par_iter()
            .map(|invoice| Self::age(invoice, reference_date, table))
            .collect()
    }
}
