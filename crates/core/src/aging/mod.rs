//! Invoice aging.
//!
//! - `table` - Bucket boundary tables (AR and AP cut points)
//! - `classifier` - Assigns an open invoice to exactly one bucket
//! - `summary` - Per-bucket and per-party roll-ups

pub mod classifier;
pub mod summary;
pub mod table;


pub use classifier::{AgedInvoice, AgingClassifier};
pub use summary::{AgingSummary, BucketSummarizer, BucketTotal, PartyAging};
pub use table::{BucketDef, BucketTable, BucketTableError, NO_DUE_DATE};
