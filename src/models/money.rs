//! Money type for representing currency amounts
//!
//! Amounts keep full floating-point precision through every computation.
//! Rounding to cents only happens when an amount is displayed or exported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Round a value to 2 decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Represents a monetary amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create a Money amount from a raw value
    ///
    /// # Examples
    /// ```
    /// use rentshare::models::Money;
    /// let amount = Money::new(10.5);
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get the full-precision value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Get the value rounded to cents
    pub fn rounded(&self) -> f64 {
        round2(self.0)
    }

    /// Check if the amount is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,250.00", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, rest) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        let value: f64 = cleaned
            .parse()
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        if !value.is_finite() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.rounded();
        if rounded < 0.0 {
            format!("-{}{:.2}", symbol, rounded.abs())
        } else {
            // rounded may be -0.0 for tiny negatives
            format!("{}{:.2}", symbol, rounded.abs())
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.format_with_symbol("$");
        f.pad(&s)
    }
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<f64> for Money {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(4399.996), 4400.0);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(-1.2351), -1.24);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(10.5).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::new(-10.5).to_string(), "-$10.50");
        assert_eq!(Money::new(0.05).to_string(), "$0.05");
        assert_eq!(Money::new(-0.001).to_string(), "$0.00");
        assert_eq!(format!("{:>8}", Money::new(1.0)), "   $1.00");
    }

    #[test]
    fn test_full_precision_kept() {
        let third = Money::new(100.0) * (1.0 / 3.0);
        assert!((third.value() - 33.333_333).abs() < 1e-5);
        assert_eq!(third.rounded(), 33.33);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(10.0);
        let b = Money::new(5.0);

        assert_eq!((a + b).value(), 15.0);
        assert_eq!((a - b).value(), 5.0);
        assert_eq!((-a).value(), -10.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().value(), 10.5);
        assert_eq!(Money::parse("$10.50").unwrap().value(), 10.5);
        assert_eq!(Money::parse("-10.50").unwrap().value(), -10.5);
        assert_eq!(Money::parse("1,250").unwrap().value(), 1250.0);
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("NaN").is_err());
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![Money::new(1.0), Money::new(2.0), Money::new(3.5)]
            .into_iter()
            .sum();
        assert_eq!(total.value(), 6.5);
    }

    #[test]
    fn test_serialization() {
        let m = Money::new(10.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "10.5");

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
