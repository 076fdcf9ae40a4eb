//! Reporting periods.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::reports::ReportError;

/// Longest trailing window accepted, in months.
pub const MAX_TRAILING_MONTHS: u32 = 120;

/// Requested profitability period.
///
/// A trailing window and an explicit range are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfitabilityPeriod {
    /// The last `months` months up to and including today.
    Trailing {
        /// Window length.
        months: u32,
    },
    /// Inclusive date range.
    Range {
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
    },
}

impl ProfitabilityPeriod {
    /// The default dashboard window.
    #[must_use]
    pub const fn trailing_twelve() -> Self {
        Self::Trailing { months: 12 }
    }

    /// Builds a period from optional request parameters.
    ///
    /// `months` and `from`/`to` are mutually exclusive, and `from` and `to`
    /// must be given together. With neither, the trailing default applies.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` when the parameters conflict or are incomplete.
    pub fn from_params(
        months: Option<u32>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        default_months: u32,
    ) -> Result<Self, ReportError> {
        match (months, from, to) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ReportError::InvalidPeriod(
                "months cannot be combined with from/to".to_string(),
            )),
            (Some(months), None, None) => Ok(Self::Trailing { months }),
            (None, Some(start), Some(end)) => Ok(Self::Range { start, end }),
            (None, Some(_), None) | (None, None, Some(_)) => Err(ReportError::InvalidPeriod(
                "from and to must be given together".to_string(),
            )),
            (None, None, None) => Ok(Self::Trailing {
                months: default_months,
            }),
        }
    }

    /// Resolves the period into concrete dates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for an out-of-range trailing window and
    /// `InvalidDateRange` when `start` is after `end`.
    pub fn resolve(self, today: NaiveDate) -> Result<ResolvedPeriod, ReportError> {
        match self {
            Self::Trailing { months } => {
                if months == 0 || months > MAX_TRAILING_MONTHS {
                    return Err(ReportError::InvalidPeriod(format!(
                        "trailing months must be between 1 and {MAX_TRAILING_MONTHS}, got {months}"
                    )));
                }
                // The window starts the day after the same date N months back,
                // so no calendar day is counted twice.
                let start = today
                    .checked_sub_months(Months::new(months))
                    .and_then(|d| d.checked_add_days(Days::new(1)))
                    .ok_or_else(|| {
                        ReportError::InvalidPeriod(format!(
                            "{months} months before {today} is out of range"
                        ))
                    })?;
                Ok(ResolvedPeriod { start, end: today })
            }
            Self::Range { start, end } => {
                if start > end {
                    return Err(ReportError::InvalidDateRange { start, end });
                }
                Ok(ResolvedPeriod { start, end })
            }
        }
    }
}

/// Concrete inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPeriod {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl ResolvedPeriod {
    /// Number of days covered, both ends included.
    #[must_use]
    pub fn days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// The period of equal length ending the day before this one starts.
    ///
    /// Returns `None` if it would fall before the earliest representable date.
    #[must_use]
    pub fn prior(&self) -> Option<Self> {
        let end = self.start.checked_sub_days(Days::new(1))?;
        let start = self.start.checked_sub_days(Days::new(self.days()))?;
        Some(Self { start, end })
    }
}
