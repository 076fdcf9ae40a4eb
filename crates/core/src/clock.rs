//! Source of the current business date.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Provides the date reports treat as "today".
pub trait Clock: Send + Sync {
    /// Returns the current business date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock evaluated in the dealership's time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a clock for the given time zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Clock pinned to a single date. Used for reproducible reports and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
