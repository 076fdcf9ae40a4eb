//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::aging::BucketTableError;

/// Errors that reject a report request.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Period parameters are missing, conflicting or out of range.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// A bucket filter names a bucket the ledger's table does not have.
    #[error("Unknown aging bucket: {0}")]
    UnknownBucket(String),

    /// Unrecognized invoice sort order.
    #[error("Invalid sort order: {0}")]
    InvalidSort(String),

    /// Bucket table failed validation.
    #[error("Invalid bucket table: {0}")]
    InvalidBucketTable(#[from] BucketTableError),
}

impl From<ReportError> for tally_shared::AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
