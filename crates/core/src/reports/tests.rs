//! Tests for aging report assembly.

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::{InvoiceNo, PartyNo};

use super::error::ReportError;
use super::service::AgingService;
use super::types::{AgingQuery, InvoiceSort};
use crate::aging::{BucketDef, BucketTable, BucketTableError, NO_DUE_DATE};
use crate::ledger::{DataWarning, EntryType, LedgerEntry, LedgerType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 30)
}

fn row(
    id: i64,
    invoice: Option<&str>,
    party: &str,
    amount: Decimal,
    due: Option<NaiveDate>,
    booked: NaiveDate,
) -> LedgerEntry {
    LedgerEntry {
        entry_id: id,
        invoice_no: invoice.map(InvoiceNo::from),
        party_no: PartyNo::from(party),
        entry_type: if amount.is_sign_negative() {
            EntryType::Payment
        } else {
            EntryType::Charge
        },
        amount,
        due_date: due,
        entry_date: booked,
        is_historical: None,
        is_deleted: None,
    }
}

/// A small dealer receivables ledger.
fn receivables() -> Vec<LedgerEntry> {
    vec![
        // Open 200, due New Year.
        row(1, Some("INV-100"), "C001", dec!(200), Some(date(2024, 1, 1)), date(2023, 12, 1)),
        // Paid in full in May.
        row(2, Some("INV-101"), "C001", dec!(500), Some(date(2024, 2, 15)), date(2024, 1, 15)),
        row(3, Some("INV-101"), "C001", dec!(-500), None, date(2024, 5, 10)),
        // Partially paid, still open 75.
        row(4, Some("INV-102"), "C002", dec!(300), Some(date(2024, 6, 1)), date(2024, 5, 1)),
        row(5, Some("INV-102"), "C002", dec!(-225), None, date(2024, 6, 10)),
        // No due date.
        row(6, Some("INV-103"), "C003", dec!(40), None, date(2024, 6, 20)),
        // Unapplied cash.
        row(7, None, "C002", dec!(-60), None, date(2024, 6, 12)),
    ]
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_current_report_totals() {
    let query = AgingQuery::new(LedgerType::Ar);

    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();

    assert_eq!(report.report_type, "ar_aging");
    assert_eq!(report.as_of_date, today());
    assert!(!report.as_of_is_approximate);
    assert_eq!(report.total_count, 3);
    assert_eq!(report.grand_total, dec!(315));
    assert_eq!(report.settled_count, 1);

    let labels: Vec<&str> = report.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Current", "1-30", "31-60", "61-90", "91-120", "120+", NO_DUE_DATE]
    );
    let bucket_sum: Decimal = report.buckets.iter().map(|b| b.total).sum();
    assert_eq!(bucket_sum, report.grand_total);
}

#[test]
fn test_missing_invoice_surfaces_as_warning() {
    let upstream = vec![DataWarning::UnreadableRow {
        entry_id: Some(99),
        reason: "unknown entry type".into(),
    }];

    let report =
        AgingService::build(&AgingQuery::new(LedgerType::Ar), &receivables(), today(), upstream)
            .unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert!(matches!(
        report.warnings[0],
        DataWarning::UnreadableRow { entry_id: Some(99), .. }
    ));
    assert!(matches!(
        report.warnings[1],
        DataWarning::MissingInvoiceNo { entry_id: 7, .. }
    ));
}

#[test]
fn test_as_of_april_first_ages_new_year_invoice_91_days() {
    let query = AgingQuery::new(LedgerType::Ar).as_of(date(2024, 4, 1));

    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();

    assert!(report.as_of_is_approximate);
    let inv = report
        .invoices
        .iter()
        .find(|a| a.invoice.invoice_no.as_str() == "INV-100")
        .unwrap();
    assert_eq!(inv.days_old, Some(91));
    assert_eq!(inv.bucket, "91-120");
    assert_eq!(inv.invoice.net_balance, dec!(200));
}

#[test]
fn test_as_of_excludes_later_entries() {
    // Before the May payment INV-101 was still open; INV-102 and INV-103 did not exist.
    let query = AgingQuery::new(LedgerType::Ar).as_of(date(2024, 4, 1));

    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();

    let numbers: Vec<&str> = report
        .invoices
        .iter()
        .map(|a| a.invoice.invoice_no.as_str())
        .collect();
    assert_eq!(numbers, vec!["INV-100", "INV-101"]);
    assert_eq!(report.grand_total, dec!(700));
    assert!(report.warnings.is_empty());
}

#[test]
fn test_as_of_today_is_not_approximate() {
    let query = AgingQuery::new(LedgerType::Ar).as_of(today());
    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();
    assert!(!report.as_of_is_approximate);
}

#[test]
fn test_bucket_filter_limits_invoices_not_totals() {
    let query = AgingQuery::new(LedgerType::Ar).in_buckets([NO_DUE_DATE]);

    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();

    assert_eq!(report.invoices.len(), 1);
    assert_eq!(report.invoices[0].invoice.invoice_no.as_str(), "INV-103");
    assert_eq!(report.total_count, 3);
    assert_eq!(report.grand_total, dec!(315));
}

#[test]
fn test_unknown_bucket_rejected() {
    let query = AgingQuery::new(LedgerType::Ap).in_buckets(["120+"]);

    let err = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap_err();

    assert!(matches!(err, ReportError::UnknownBucket(label) if label == "120+"));
}

#[test]
fn test_party_filter() {
    let query = AgingQuery::new(LedgerType::Ar).for_party(PartyNo::from("C002"));

    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();

    assert_eq!(report.total_count, 1);
    assert_eq!(report.grand_total, dec!(75));
    assert_eq!(report.party_totals.len(), 1);
    assert_eq!(report.party_totals[0].party_no.as_str(), "C002");
}

#[test]
fn test_payables_use_payables_table() {
    let query = AgingQuery::new(LedgerType::Ap);
    let report = AgingService::build(&query, &receivables(), today(), Vec::new()).unwrap();

    assert_eq!(report.report_type, "ap_aging");
    assert_eq!(report.buckets[0].label, "Not Due");
    assert_eq!(report.buckets.len(), 6);
}

#[test]
fn test_empty_ledger() {
    let report =
        AgingService::build(&AgingQuery::new(LedgerType::Ar), &[], today(), Vec::new()).unwrap();
    assert_eq!(report.grand_total, Decimal::ZERO);
    assert!(report.invoices.is_empty());
    assert!(report.party_totals.is_empty());
    assert!(report.buckets.iter().all(|b| b.count == 0));
}

#[test]
fn test_custom_table_error_converts() {
    fn custom() -> Result<BucketTable, ReportError> {
        Ok(BucketTable::new(vec![BucketDef::new("Late", Some(1), None)])?)
    }

    let err = custom().unwrap_err();
    assert!(matches!(
        err,
        ReportError::InvalidBucketTable(BucketTableError::BoundedFirstBucket(_))
    ));
}

#[test]
fn test_custom_table() {
    let table = BucketTable::new(vec![
        BucketDef::new("Fresh", None, Some(60)),
        BucketDef::new("Stale", Some(61), None),
    ])
    .unwrap();
    let query = AgingQuery::new(LedgerType::Ar).as_of(date(2024, 4, 1));

    let report =
        AgingService::build_with_table(&query, &table, &receivables(), today(), Vec::new())
            .unwrap();

    assert_eq!(report.buckets[0].label, "Fresh");
    assert_eq!(report.buckets[0].total, dec!(500));
    assert_eq!(report.buckets[1].total, dec!(200));
}

// ============================================================================
// Sorting
// ============================================================================

fn sorted_numbers(sort: InvoiceSort) -> Vec<String> {
    let query = AgingQuery::new(LedgerType::Ar).sorted_by(sort);
    AgingService::build(&query, &receivables(), today(), Vec::new())
        .unwrap()
        .invoices
        .into_iter()
        .map(|a| a.invoice.invoice_no.into_inner())
        .collect()
}

#[rstest]
#[case(InvoiceSort::DaysOld, &["INV-100", "INV-102", "INV-103"])]
#[case(InvoiceSort::Balance, &["INV-100", "INV-102", "INV-103"])]
#[case(InvoiceSort::DueDate, &["INV-100", "INV-102", "INV-103"])]
#[case(InvoiceSort::InvoiceNo, &["INV-100", "INV-102", "INV-103"])]
fn test_sort_orders(#[case] sort: InvoiceSort, #[case] expected: &[&str]) {
    assert_eq!(sorted_numbers(sort), expected);
}

#[test]
fn test_balance_sort_puts_largest_first() {
    let entries = vec![
        row(1, Some("A"), "C1", dec!(10), Some(date(2024, 1, 1)), date(2023, 12, 1)),
        row(2, Some("B"), "C1", dec!(900), Some(date(2024, 6, 1)), date(2024, 5, 1)),
        row(3, Some("C"), "C1", dec!(50), None, date(2024, 5, 1)),
    ];
    let query = AgingQuery::new(LedgerType::Ar).sorted_by(InvoiceSort::Balance);

    let report = AgingService::build(&query, &entries, today(), Vec::new()).unwrap();

    let numbers: Vec<&str> = report.invoices.iter().map(|a| a.invoice.invoice_no.as_str()).collect();
    assert_eq!(numbers, vec!["B", "C", "A"]);
}

#[test]
fn test_days_old_sort_puts_undated_last() {
    let entries = vec![
        row(1, Some("A"), "C1", dec!(10), None, date(2023, 12, 1)),
        row(2, Some("B"), "C1", dec!(900), Some(date(2024, 6, 1)), date(2024, 5, 1)),
        row(3, Some("C"), "C1", dec!(50), Some(date(2024, 2, 1)), date(2024, 1, 1)),
    ];

    let report =
        AgingService::build(&AgingQuery::new(LedgerType::Ar), &entries, today(), Vec::new())
            .unwrap();

    let numbers: Vec<&str> = report.invoices.iter().map(|a| a.invoice.invoice_no.as_str()).collect();
    assert_eq!(numbers, vec!["C", "B", "A"]);
}

#[rstest]
#[case("days_old", InvoiceSort::DaysOld)]
#[case("BALANCE", InvoiceSort::Balance)]
#[case("due_date", InvoiceSort::DueDate)]
#[case(" invoice_no ", InvoiceSort::InvoiceNo)]
fn test_parse_sort(#[case] input: &str, #[case] expected: InvoiceSort) {
    assert_eq!(input.parse::<InvoiceSort>().unwrap(), expected);
}

#[test]
fn test_parse_unknown_sort() {
    assert!(matches!(
        "oldest".parse::<InvoiceSort>(),
        Err(ReportError::InvalidSort(_))
    ));
}
