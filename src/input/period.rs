//! Calendar periods and the reporting-period descriptor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when a period string is not `YYYY-MM`
#[derive(Debug, Clone, Error)]
#[error("invalid period '{0}': expected YYYY-MM")]
pub struct ParsePeriodError(String);

/// A calendar year-month, the unit the whole pipeline is keyed by
///
/// Ordered chronologically; round-trips through its `YYYY-MM` string form
/// for serialization, matching the upstream feed format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u8,
}

impl Period {
    /// Create a period, validating the month number
    pub fn new(year: i32, month: u8) -> Result<Self, ParsePeriodError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(ParsePeriodError(format!("{:04}-{:02}", year, month)))
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePeriodError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        Self::new(year, month).map_err(|_| err())
    }
}

impl TryFrom<String> for Period {
    type Error = ParsePeriodError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Flat monthly budget figures per budgeted category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BudgetAssumptions {
    /// Budgeted premium-equivalent income per month
    #[serde(default)]
    pub monthly_premium: f64,

    /// Budgeted total claims and expenses per month
    #[serde(default)]
    pub monthly_expenses: f64,
}

/// The contiguous month range a summary table covers, with its budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// First month covered (inclusive)
    pub start: Period,

    /// Last month covered (inclusive)
    pub end: Period,

    /// Budget figures used for the variance rows
    #[serde(default)]
    pub budget: BudgetAssumptions,
}

impl ReportingPeriod {
    pub fn new(start: Period, end: Period, budget: BudgetAssumptions) -> Self {
        Self { start, end, budget }
    }

    /// Number of months covered; 0 when the range is inverted
    pub fn month_count(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        let span = (self.end.year - self.start.year) * 12
            + (self.end.month as i32 - self.start.month as i32);
        (span + 1) as usize
    }

    /// All covered months in chronological order
    pub fn months(&self) -> Vec<Period> {
        let mut months = Vec::with_capacity(self.month_count());
        let mut current = self.start;
        while current <= self.end {
            months.push(current);
            current = current.succ();
        }
        months
    }

    /// Whether a month falls inside the period
    pub fn contains(&self, period: Period) -> bool {
        self.start <= period && period <= self.end
    }

    /// Zero-based column index of a month within the period
    pub fn index_of(&self, period: Period) -> Option<usize> {
        if !self.contains(period) {
            return None;
        }
        let span = (period.year - self.start.year) * 12
            + (period.month as i32 - self.start.month as i32);
        Some(span as usize)
    }
}
