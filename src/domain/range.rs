//! Calendar-month date ranges
//!
//! A [`DateRange`] always lies inside a single calendar month; in practice it
//! is a full month built with [`DateRange::month`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Earliest statement year accepted by the statement server
pub const MIN_YEAR: i32 = 2000;

/// Latest statement year accepted by the statement server
pub const MAX_YEAR: i32 = 2100;

/// Inclusive date range within one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from explicit bounds
    ///
    /// # Errors
    ///
    /// Returns an error if `start > end` or the bounds fall in different months.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err(format!("Range start {start} is after end {end}"));
        }
        if start.year() != end.year() || start.month() != end.month() {
            return Err(format!(
                "Range {start}..{end} spans more than one calendar month"
            ));
        }
        Ok(Self { start, end })
    }

    /// The full calendar month `year-month`
    ///
    /// # Examples
    ///
    /// ```
    /// use vaultflow::domain::DateRange;
    ///
    /// let march = DateRange::month(2025, 3).unwrap();
    /// assert_eq!(march.days(), 31);
    /// assert_eq!(march.end().to_string(), "2025-03-31");
    /// ```
    pub fn month(year: i32, month: u32) -> Result<Self, String> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(format!(
                "Year {year} out of range ({MIN_YEAR}..={MAX_YEAR})"
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(format!("Month {month} out of range (1..=12)"));
        }

        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| format!("Invalid month {year}-{month:02}"))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| format!("Invalid month {year}-{month:02}"))?;

        Ok(Self { start, end })
    }

    /// The month containing `today`
    pub fn current_month(today: NaiveDate) -> Result<Self, String> {
        Self::month(today.year(), today.month())
    }

    /// First day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// 1-based month
    pub fn month_number(&self) -> u32 {
        self.start.month()
    }

    /// Number of days covered, inclusive
    pub fn days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// True if `date` lies inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Zero-based position of `date` in the range, if it is inside it
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.start).num_days() as usize)
        } else {
            None
        }
    }

    /// `YYYY-MM` label used in file names and statements
    pub fn period_label(&self) -> String {
        format!("{}-{:02}", self.year(), self.month_number())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
