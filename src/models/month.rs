//! Year-month period identifier
//!
//! Every financial record is bucketed by a `Month`. It is stored and
//! displayed as "YYYY-MM" but ordered by (year, month), so comparisons never
//! depend on the textual form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, e.g. 2024-01
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(MonthParseError::InvalidMonth(month));
        }
        if !(1..=9999).contains(&year) {
            return Err(MonthParseError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Get the next month, `None` after 9999-12
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1).ok()
        } else {
            Self::new(self.year, self.month + 1).ok()
        }
    }

    /// Get the previous month, `None` before 0001-01
    pub fn prev(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12).ok()
        } else {
            Self::new(self.year, self.month - 1).ok()
        }
    }

    /// Parse a month string in "YYYY-MM" form
    ///
    /// A single-digit month ("2024-1") is accepted; anything else, including
    /// full dates, is rejected.
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthParseError::InvalidFormat(s.to_string()))?;

        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(MonthParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = MonthParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    InvalidYear(i32),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthParseError::InvalidFormat(s) => {
                write!(f, "Invalid month format: {} (expected YYYY-MM)", s)
            }
            MonthParseError::InvalidMonth(m) => write!(f, "Invalid month number: {}", m),
            MonthParseError::InvalidYear(y) => write!(f, "Invalid year: {}", y),
        }
    }
}

impl std::error::Error for MonthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let jan = m("2024-01");
        assert_eq!(jan.year(), 2024);
        assert_eq!(jan.month(), 1);
        assert_eq!(jan.to_string(), "2024-01");
        assert_eq!(m("2024-3").to_string(), "2024-03");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Month::parse("2024").is_err());
        assert!(Month::parse("2024-13").is_err());
        assert!(Month::parse("2024-00").is_err());
        assert!(Month::parse("24-01").is_err());
        assert!(Month::parse("2024-01-15").is_err());
        assert!(Month::parse("January").is_err());
    }

    #[test]
    fn test_navigation() {
        assert_eq!(m("2024-12").next(), Some(m("2025-01")));
        assert_eq!(m("2025-01").prev(), Some(m("2024-12")));
        assert_eq!(m("2024-05").next().and_then(|n| n.prev()), Some(m("2024-05")));
    }

    #[test]
    fn test_navigation_stops_at_range_ends() {
        assert_eq!(m("0001-01").prev(), None);
        assert_eq!(m("9999-12").next(), None);
        assert_eq!(m("0001-02").prev(), Some(m("0001-01")));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(m("2023-12") < m("2024-01"));
        assert!(m("2024-02") < m("2024-10"));
        // Unpadded input would sort wrong as text ("2024-9" > "2024-10")
        assert!(m("2024-9") < m("2024-10"));
    }

    #[test]
    fn test_serialization() {
        let month = m("2024-07");
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2024-07\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
        assert!(serde_json::from_str::<Month>("\"2024-99\"").is_err());
    }
}
