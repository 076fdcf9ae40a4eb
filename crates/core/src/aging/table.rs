//! Aging bucket tables.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::LedgerType;

/// Label of the bucket that holds invoices without a due date.
pub const NO_DUE_DATE: &str = "No Due Date";

/// Errors raised when a bucket table is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BucketTableError {
    /// The table has no buckets.
    #[error("Bucket table is empty")]
    Empty,

    /// Two buckets share a label.
    #[error("Duplicate bucket label: {0}")]
    DuplicateLabel(String),

    /// A bucket uses the label reserved for undated invoices.
    #[error("Bucket label is reserved: {0}")]
    ReservedLabel(String),

    /// A bucket's lower bound exceeds its upper bound.
    #[error("Bucket {label} has min_days {min} greater than max_days {max}")]
    InvertedRange {
        /// Bucket label.
        label: String,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// Only the first bucket may be unbounded below.
    #[error("Bucket {0} must declare min_days")]
    MissingLowerBound(String),

    /// Only the last bucket may be unbounded above.
    #[error("Bucket {0} must declare max_days")]
    MissingUpperBound(String),

    /// The first bucket must catch every not-yet-due invoice.
    #[error("First bucket {0} must be unbounded below")]
    BoundedFirstBucket(String),

    /// The last bucket must be open-ended.
    #[error("Last bucket {0} must be unbounded above")]
    BoundedLastBucket(String),

    /// Some day count would fall between two buckets.
    #[error("Gap between buckets {previous} and {next}")]
    Gap {
        /// Bucket before the gap.
        previous: String,
        /// Bucket after the gap.
        next: String,
    },
}

/// A named, inclusive range of days past due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDef {
    /// Display label.
    pub label: String,
    /// Inclusive lower bound; `None` means unbounded below.
    pub min_days: Option<i64>,
    /// Inclusive upper bound; `None` means unbounded above.
    pub max_days: Option<i64>,
}

impl BucketDef {
    /// Creates a bucket definition.
    #[must_use]
    pub fn new(label: impl Into<String>, min_days: Option<i64>, max_days: Option<i64>) -> Self {
        Self {
            label: label.into(),
            min_days,
            max_days,
        }
    }

    /// Returns true if `days_old` falls inside the bucket.
    #[must_use]
    pub fn contains(&self, days_old: i64) -> bool {
        self.min_days.is_none_or(|min| days_old >= min)
            && self.max_days.is_none_or(|max| days_old <= max)
    }
}

/// Ordered bucket boundaries.
///
/// Buckets are matched first-to-last, so where ranges overlap the earlier
/// bucket wins. A validated table covers every day count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTable {
    buckets: Vec<BucketDef>,
}

impl BucketTable {
    /// Builds a table after checking it covers every day count exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty, has duplicate or reserved
    /// labels, inverted ranges, or gaps.
    pub fn new(buckets: Vec<BucketDef>) -> Result<Self, BucketTableError> {
        let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
            return Err(BucketTableError::Empty);
        };

        if first.min_days.is_some() {
            return Err(BucketTableError::BoundedFirstBucket(first.label.clone()));
        }
        if last.max_days.is_some() {
            return Err(BucketTableError::BoundedLastBucket(last.label.clone()));
        }

        let mut seen = HashSet::new();
        for (idx, bucket) in buckets.iter().enumerate() {
            if bucket.label == NO_DUE_DATE {
                return Err(BucketTableError::ReservedLabel(bucket.label.clone()));
            }
            if !seen.insert(bucket.label.as_str()) {
                return Err(BucketTableError::DuplicateLabel(bucket.label.clone()));
            }
            if idx > 0 && bucket.min_days.is_none() {
                return Err(BucketTableError::MissingLowerBound(bucket.label.clone()));
            }
            if idx + 1 < buckets.len() && bucket.max_days.is_none() {
                return Err(BucketTableError::MissingUpperBound(bucket.label.clone()));
            }
            if let (Some(min), Some(max)) = (bucket.min_days, bucket.max_days)
                && min > max
            {
                return Err(BucketTableError::InvertedRange {
                    label: bucket.label.clone(),
                    min,
                    max,
                });
            }
        }

        for pair in buckets.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if let (Some(prev_max), Some(next_min)) = (previous.max_days, next.min_days)
                && next_min > prev_max.saturating_add(1)
            {
                return Err(BucketTableError::Gap {
                    previous: previous.label.clone(),
                    next: next.label.clone(),
                });
            }
        }

        Ok(Self { buckets })
    }

    /// Receivables cut points: Current, 1-30, 31-60, 61-90, 91-120, 120+.
    #[must_use]
    pub fn accounts_receivable() -> Self {
        Self {
            buckets: vec![
                BucketDef::new("Current", None, Some(0)),
                BucketDef::new("1-30", Some(1), Some(30)),
                BucketDef::new("31-60", Some(31), Some(60)),
                BucketDef::new("61-90", Some(61), Some(90)),
                BucketDef::new("91-120", Some(91), Some(120)),
                BucketDef::new("120+", Some(121), None),
            ],
        }
    }

    /// Payables cut points: Not Due, 0-30, 31-60, 61-90, Over 90.
    ///
    /// "Not Due" and "0-30" share day zero; the earlier bucket takes it.
    #[must_use]
    pub fn accounts_payable() -> Self {
        Self {
            buckets: vec![
                BucketDef::new("Not Due", None, Some(0)),
                BucketDef::new("0-30", Some(0), Some(30)),
                BucketDef::new("31-60", Some(31), Some(60)),
                BucketDef::new("61-90", Some(61), Some(90)),
                BucketDef::new("Over 90", Some(91), None),
            ],
        }
    }

    /// Returns the fixed table for a ledger.
    #[must_use]
    pub fn for_ledger(ledger_type: LedgerType) -> Self {
        match ledger_type {
            LedgerType::Ar => Self::accounts_receivable(),
            LedgerType::Ap => Self::accounts_payable(),
        }
    }

    /// Returns the dated buckets in match order.
    #[must_use]
    pub fn buckets(&self) -> &[BucketDef] {
        &self.buckets
    }

    /// Returns every label a report can contain, "No Due Date" last.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets
            .iter()
            .map(|b| b.label.as_str())
            .chain(std::iter::once(NO_DUE_DATE))
    }

    /// Returns true if `label` names one of the table's buckets.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }
}
