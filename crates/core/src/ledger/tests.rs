//! Tests for invoice netting.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::{InvoiceNo, PartyNo};

use super::aggregator::{InvoiceAggregator, OPEN_BALANCE_EPSILON};
use super::types::{DataWarning, EntryType, LedgerEntry, LedgerType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(id: i64, invoice: &str, party: &str, amount: Decimal, due: Option<NaiveDate>) -> LedgerEntry {
    LedgerEntry {
        entry_id: id,
        invoice_no: Some(InvoiceNo::from(invoice)),
        party_no: PartyNo::from(party),
        entry_type: if amount.is_sign_negative() {
            EntryType::Payment
        } else {
            EntryType::Charge
        },
        amount,
        due_date: due,
        entry_date: date(2024, 1, 1),
        is_historical: None,
        is_deleted: None,
    }
}

// ============================================================================
// Active predicate
// ============================================================================

#[test]
fn test_active_when_flags_null() {
    let e = entry(1, "X", "C1", dec!(10), None);
    assert!(e.is_active());
}

#[test]
fn test_active_when_historical_false() {
    let mut e = entry(1, "X", "C1", dec!(10), None);
    e.is_historical = Some(false);
    assert!(e.is_active());
}

#[test]
fn test_inactive_when_historical() {
    let mut e = entry(1, "X", "C1", dec!(10), None);
    e.is_historical = Some(true);
    assert!(!e.is_active());
}

#[test]
fn test_inactive_when_deleted() {
    let mut e = entry(1, "X", "C1", dec!(10), None);
    e.is_deleted = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    assert!(!e.is_active());
}

// ============================================================================
// Netting
// ============================================================================

#[test]
fn test_charge_and_full_payment_excluded() {
    let due = Some(date(2024, 1, 1));
    let entries = vec![
        entry(1, "X", "C1", dec!(500), due),
        entry(2, "X", "C1", dec!(-500), due),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert!(result.invoices.is_empty());
    assert_eq!(result.settled_count, 1);
}

#[test]
fn test_balance_of_exactly_one_cent_is_settled() {
    let entries = vec![
        entry(1, "X", "C1", dec!(100.01), None),
        entry(2, "X", "C1", dec!(-100.00), None),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert!(result.invoices.is_empty());
    assert_eq!(OPEN_BALANCE_EPSILON, dec!(0.01));
}

#[test]
fn test_balance_just_above_epsilon_is_open() {
    let entries = vec![entry(1, "X", "C1", dec!(0.011), None)];
    let result = InvoiceAggregator::aggregate(&entries);
    assert_eq!(result.invoices.len(), 1);
}

#[test]
fn test_overpaid_invoice_never_reported_negative() {
    let entries = vec![
        entry(1, "X", "C1", dec!(100), None),
        entry(2, "X", "C1", dec!(-150), None),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert!(result.invoices.is_empty());
}

#[test]
fn test_partial_payment_nets_exactly() {
    let entries = vec![
        entry(1, "X", "C1", dec!(1000.10), Some(date(2024, 3, 1))),
        entry(2, "X", "C1", dec!(-0.30), None),
        entry(3, "X", "C1", dec!(-200.20), None),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert_eq!(result.invoices.len(), 1);
    let invoice = &result.invoices[0];
    assert_eq!(invoice.net_balance, dec!(799.60));
    assert_eq!(invoice.entry_count, 3);
}

#[test]
fn test_due_date_is_earliest_non_null() {
    let entries = vec![
        entry(1, "X", "C1", dec!(100), Some(date(2024, 3, 1))),
        entry(2, "X", "C1", dec!(50), None),
        entry(3, "X", "C1", dec!(25), Some(date(2024, 2, 15))),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert_eq!(result.invoices[0].due_date, Some(date(2024, 2, 15)));
}

#[test]
fn test_due_date_null_when_no_entry_has_one() {
    let entries = vec![
        entry(1, "X", "C1", dec!(100), None),
        entry(2, "X", "C1", dec!(50), None),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert_eq!(result.invoices[0].due_date, None);
}

#[test]
fn test_same_invoice_number_different_parties_kept_apart() {
    let entries = vec![
        entry(1, "1001", "C1", dec!(100), None),
        entry(2, "1001", "C2", dec!(200), None),
    ];

    let result = InvoiceAggregator::aggregate(&entries);

    assert_eq!(result.invoices.len(), 2);
    assert_eq!(result.invoices[0].party_no.as_str(), "C1");
    assert_eq!(result.invoices[1].party_no.as_str(), "C2");
}

#[test]
fn test_inactive_entries_do_not_net() {
    let mut reversed = entry(2, "X", "C1", dec!(-100), None);
    reversed.is_deleted = Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    let mut archived_due = entry(3, "X", "C1", dec!(0), Some(date(2020, 1, 1)));
    archived_due.is_historical = Some(true);
    let entries = vec![entry(1, "X", "C1", dec!(100), None), reversed, archived_due];

    let result = InvoiceAggregator::aggregate(&entries);

    assert_eq!(result.invoices[0].net_balance, dec!(100));
    assert_eq!(result.invoices[0].due_date, None);
    assert_eq!(result.invoices[0].entry_count, 1);
}

#[test]
fn test_missing_invoice_no_is_warned_not_fatal() {
    let mut unapplied = entry(7, "ignored", "C9", dec!(-40), None);
    unapplied.invoice_no = None;
    let entries = vec![unapplied, entry(8, "Y", "C9", dec!(40), None)];

    let result = InvoiceAggregator::aggregate(&entries);

    assert_eq!(result.invoices.len(), 1);
    assert_eq!(result.invoices[0].net_balance, dec!(40));
    assert_eq!(
        result.warnings,
        vec![DataWarning::MissingInvoiceNo {
            entry_id: 7,
            party_no: PartyNo::from("C9"),
        }]
    );
}

#[test]
fn test_output_ordered_by_party_then_invoice() {
    let entries = vec![
        entry(1, "B", "C2", dec!(1), None),
        entry(2, "A", "C2", dec!(1), None),
        entry(3, "Z", "C1", dec!(1), None),
    ];

    let result = InvoiceAggregator::aggregate(&entries);
    let keys: Vec<(&str, &str)> = result
        .invoices
        .iter()
        .map(|i| (i.party_no.as_str(), i.invoice_no.as_str()))
        .collect();

    assert_eq!(keys, vec![("C1", "Z"), ("C2", "A"), ("C2", "B")]);
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_entry_type_parses_erp_codes() {
    assert_eq!("CHG".parse::<EntryType>().unwrap(), EntryType::Charge);
    assert_eq!("pmt".parse::<EntryType>().unwrap(), EntryType::Payment);
    assert_eq!("Credit".parse::<EntryType>().unwrap(), EntryType::Credit);
    assert_eq!(" ADJ ".parse::<EntryType>().unwrap(), EntryType::Adjustment);
    assert!("VOID".parse::<EntryType>().is_err());
}

#[test]
fn test_ledger_type_parse_and_display() {
    assert_eq!("AR".parse::<LedgerType>().unwrap(), LedgerType::Ar);
    assert_eq!("payables".parse::<LedgerType>().unwrap(), LedgerType::Ap);
    assert!("gl".parse::<LedgerType>().is_err());
    assert_eq!(LedgerType::Ap.to_string(), "ap");
}

#[test]
fn test_warning_display() {
    let warning = DataWarning::UnreadableRow {
        entry_id: Some(12),
        reason: "Unknown entry type: VOID".to_string(),
    };
    assert_eq!(warning.to_string(), "entry 12 is unreadable: Unknown entry type: VOID");

    let keyless = DataWarning::UnreadableRow {
        entry_id: None,
        reason: "missing id".to_string(),
    };
    assert_eq!(keyless.to_string(), "ledger row is unreadable: missing id");

    let missing = DataWarning::MissingInvoiceNo {
        entry_id: 4,
        party_no: PartyNo::from("C7"),
    };
    assert_eq!(missing.to_string(), "entry 4 for party C7 has no invoice number");

    let as_error: &dyn std::error::Error = &missing;
    assert!(as_error.source().is_none());
}

// ============================================================================
// Properties
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every reported invoice is open and equals the exact sum of its entries.
    #[test]
    fn prop_reported_balances_are_exact_and_open(
        rows in prop::collection::vec((0usize..6, 0usize..3, amount_strategy()), 1..60),
    ) {
        let entries: Vec<LedgerEntry> = rows
            .iter()
            .enumerate()
            .map(|(i, (inv, party, amount))| {
                entry(i as i64, &format!("INV{inv}"), &format!("P{party}"), *amount, None)
            })
            .collect();

        let result = InvoiceAggregator::aggregate(&entries);

        for invoice in &result.invoices {
            prop_assert!(invoice.net_balance > OPEN_BALANCE_EPSILON);
            let expected: Decimal = entries
                .iter()
                .filter(|e| e.party_no == invoice.party_no)
                .filter(|e| e.invoice_no.as_ref() == Some(&invoice.invoice_no))
                .map(|e| e.amount)
                .sum();
            prop_assert_eq!(invoice.net_balance, expected);
        }
    }

    /// Reordering the input never changes the output.
    #[test]
    fn prop_aggregation_is_order_independent(
        rows in prop::collection::vec((0usize..4, 0usize..2, amount_strategy()), 1..40),
    ) {
        let entries: Vec<LedgerEntry> = rows
            .iter()
            .enumerate()
            .map(|(i, (inv, party, amount))| {
                entry(i as i64, &format!("INV{inv}"), &format!("P{party}"), *amount, None)
            })
            .collect();
        let mut reversed = entries.clone();
        reversed.reverse();

        let forward = InvoiceAggregator::aggregate(&entries);
        let backward = InvoiceAggregator::aggregate(&reversed);

        prop_assert_eq!(forward.invoices, backward.invoices);
    }
}
