//! Aging report assembly.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use super::error::ReportError;
use super::types::{AgingQuery, AgingReport, InvoiceSort};
use crate::aging::{AgedInvoice, AgingClassifier, BucketSummarizer, BucketTable};
use crate::ledger::{DataWarning, InvoiceAggregator, LedgerEntry, LedgerType};

/// Service for aging reports.
pub struct AgingService;

impl AgingService {
    /// Builds an aging report with the ledger's standard bucket table.
    ///
    /// `entries` are the rows read for the query. `upstream_warnings` are
    /// rows the reader could not decode; they are carried into the report.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBucket` if the bucket filter names a label the
    /// ledger's table does not have.
    pub fn build(
        query: &AgingQuery,
        entries: &[LedgerEntry],
        today: NaiveDate,
        upstream_warnings: Vec<DataWarning>,
    ) -> Result<AgingReport, ReportError> {
        let table = BucketTable::for_ledger(query.ledger_type);
        Self::build_with_table(query, &table, entries, today, upstream_warnings)
    }

    /// Builds an aging report with a caller-supplied bucket table.
    pub fn build_with_table(
        query: &AgingQuery,
        table: &BucketTable,
        entries: &[LedgerEntry],
        today: NaiveDate,
        upstream_warnings: Vec<DataWarning>,
    ) -> Result<AgingReport, ReportError> {
        Self::validate(query, table)?;

        let as_of_date = query.as_of_date.unwrap_or(today);
        let as_of_is_approximate = query.as_of_date.is_some_and(|date| date < today);

        // Reapplied here so the report does not depend on how the rows were read.
        let cutoff = query.as_of_date;
        let selected = entries.iter().filter(|e| {
            cutoff.is_none_or(|as_of| e.entry_date <= as_of)
                && query.party_no.as_ref().is_none_or(|p| &e.party_no == p)
        });

        let aggregation = InvoiceAggregator::aggregate(selected);
        let aged = AgingClassifier::age_all(aggregation.invoices, as_of_date, table);
        let summary = BucketSummarizer::summarize(&aged, table);
        let party_totals = BucketSummarizer::by_party(&aged, table);

        let mut invoices: Vec<AgedInvoice> = match &query.buckets {
            Some(labels) => aged
                .into_iter()
                .filter(|a| labels.iter().any(|l| l == &a.bucket))
                .collect(),
            None => aged,
        };
        Self::sort_invoices(&mut invoices, query.sort);

        let mut warnings = upstream_warnings;
        warnings.extend(aggregation.warnings);

        debug!(
            ledger_type = %query.ledger_type,
            as_of_date = %as_of_date,
            entries = entries.len(),
            open_invoices = summary.total_count,
            listed_invoices = invoices.len(),
            warnings = warnings.len(),
            "Built aging report"
        );

        Ok(AgingReport {
            report_type: Self::report_type(query.ledger_type).to_string(),
            ledger_type: query.ledger_type,
            as_of_date,
            as_of_is_approximate,
            buckets: summary.buckets,
            grand_total: summary.grand_total,
            total_count: summary.total_count,
            invoices,
            party_totals,
            settled_count: aggregation.settled_count,
            warnings,
        })
    }

    /// Orders invoices in place. Ties fall back to party then invoice number.
    pub fn sort_invoices(invoices: &mut [AgedInvoice], sort: InvoiceSort) {
        invoices.sort_by(|a, b| {
            let primary = match sort {
                InvoiceSort::DaysOld => descending_none_last(a.days_old, b.days_old),
                InvoiceSort::Balance => b.invoice.net_balance.cmp(&a.invoice.net_balance),
                InvoiceSort::DueDate => ascending_none_last(a.invoice.due_date, b.invoice.due_date),
                InvoiceSort::InvoiceNo => a.invoice.invoice_no.cmp(&b.invoice.invoice_no),
            };
            primary
                .then_with(|| a.invoice.party_no.cmp(&b.invoice.party_no))
                .then_with(|| a.invoice.invoice_no.cmp(&b.invoice.invoice_no))
        });
    }

    /// Checks the query against a bucket table before any rows are read.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBucket` for a filter label the table does not have.
    pub fn validate(query: &AgingQuery, table: &BucketTable) -> Result<(), ReportError> {
        let Some(labels) = &query.buckets else {
            return Ok(());
        };
        match labels.iter().find(|label| !table.has_label(label)) {
            Some(unknown) => Err(ReportError::UnknownBucket(unknown.clone())),
            None => Ok(()),
        }
    }

    const fn report_type(ledger_type: LedgerType) -> &'static str {
        match ledger_type {
            LedgerType::Ar => "ar_aging",
            LedgerType::Ap => "ap_aging",
        }
    }
}

fn descending_none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn ascending_none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
