//! Bucket roll-ups.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::PartyNo;
use tracing::warn;

use super::classifier::AgedInvoice;
use super::table::BucketTable;

/// Count and sum of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotal {
    /// Bucket label.
    pub label: String,
    /// Number of invoices.
    pub count: usize,
    /// Sum of net balances.
    pub total: Decimal,
}

/// Totals across all buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingSummary {
    /// One entry per bucket in table order, "No Due Date" last.
    pub buckets: Vec<BucketTotal>,
    /// Sum of every bucket total.
    pub grand_total: Decimal,
    /// Number of invoices across all buckets.
    pub total_count: usize,
}

/// Aged balances of a single customer or vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyAging {
    /// Customer or vendor number.
    pub party_no: PartyNo,
    /// Per-bucket totals for this party, same layout as the report buckets.
    pub buckets: Vec<BucketTotal>,
    /// Party total.
    pub total: Decimal,
    /// Number of open invoices.
    pub invoice_count: usize,
}

/// Rolls classified invoices up into bucket totals.
pub struct BucketSummarizer;

impl BucketSummarizer {
    /// Sums invoices per bucket.
    ///
    /// Every bucket of the table is present, including empty ones. The grand
    /// total is accumulated alongside the bucket totals, so it equals their sum exactly.
    ///
    /// Invoices must be classified with the same table. A foreign label trips a
    /// debug assertion; release builds log and skip the invoice.
    #[must_use]
    pub fn summarize<'a, I>(invoices: I, table: &BucketTable) -> AgingSummary
    where
        I: IntoIterator<Item = &'a AgedInvoice>,
    {
        let mut buckets = Self::empty_buckets(table);
        let index = Self::label_index(table);
        let mut grand_total = Decimal::ZERO;
        let mut total_count = 0;

        for aged in invoices {
            let slot = index.get(aged.bucket.as_str()).copied();
            debug_assert!(
                slot.is_some(),
                "bucket {} is not in the table",
                aged.bucket
            );
            let Some(slot) = slot else {
                warn!(
                    bucket = %aged.bucket,
                    invoice_no = %aged.invoice.invoice_no,
                    "Invoice classified into a bucket outside the table"
                );
                continue;
            };

            buckets[slot].count += 1;
            buckets[slot].total += aged.invoice.net_balance;
            grand_total += aged.invoice.net_balance;
            total_count += 1;
        }

        AgingSummary {
            buckets,
            grand_total,
            total_count,
        }
    }

    /// Groups invoices by party and summarizes each group.
    ///
    /// Parties are ordered by total descending, then party number.
    #[must_use]
    pub fn by_party(invoices: &[AgedInvoice], table: &BucketTable) -> Vec<PartyAging> {
        let mut groups: BTreeMap<&PartyNo, Vec<&AgedInvoice>> = BTreeMap::new();
        for aged in invoices {
            groups.entry(&aged.invoice.party_no).or_default().push(aged);
        }

        let mut parties: Vec<PartyAging> = groups
            .into_iter()
            .map(|(party_no, party_invoices)| {
                let summary = Self::summarize(party_invoices, table);
                PartyAging {
                    party_no: party_no.clone(),
                    buckets: summary.buckets,
                    total: summary.grand_total,
                    invoice_count: summary.total_count,
                }
            })
            .collect();

        parties.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.party_no.cmp(&b.party_no))
        });
        parties
    }

    fn empty_buckets(table: &BucketTable) -> Vec<BucketTotal> {
        table
            .labels()
            .map(|label| BucketTotal {
                label: label.to_string(),
                count: 0,
                total: Decimal::ZERO,
            })
            .collect()
    }

    fn label_index(table: &BucketTable) -> HashMap<&str, usize> {
        table
            .labels()
            .enumerate()
            .map(|(idx, label)| (label, idx))
            .collect()
    }
}
