//! Period keys and date ranges.
//!
//! Hours are aggregated per period. A period is a calendar week identified
//! by its Monday, or, for legacy data without dates, a free-text week label.
//!
//! # Precedence
//! When an assignment carries both a date and a label, the date wins.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The unit of time aggregation for overtime and utilization.
///
/// Dated keys sort before label keys; both sort naturally within their kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodKey {
    /// Week starting on the given Monday.
    Week(NaiveDate),
    /// Legacy free-text week label. The empty label is the unscheduled bucket.
    Label(String),
}

impl PeriodKey {
    /// Week key for any date in that week.
    pub fn week_of(date: NaiveDate) -> Self {
        PeriodKey::Week(week_start(date))
    }

    /// Whether this key came from a real date.
    #[inline]
    pub fn is_dated(&self) -> bool {
        matches!(self, PeriodKey::Week(_))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Week(monday) => write!(f, "{}", monday.format("%Y-%m-%d")),
            PeriodKey::Label(label) => f.write_str(label),
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Caller-supplied reporting window.
///
/// Scopes the utilization denominator to a fixed number of weeks instead of
/// the periods inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar weeks touched by the range, counted inclusively.
    ///
    /// Always at least 1; an inverted range counts as a single week.
    pub fn week_span(&self) -> usize {
        let first = week_start(self.start);
        let last = week_start(self.end);
        let days = (last - first).num_days();
        if days < 0 {
            return 1;
        }
        (days / 7) as usize + 1
    }
}
