//! Forecast and variance snapshot models
//!
//! Both snapshots hold exactly one row per owner per month and are replaced
//! wholesale whenever the month is regenerated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::OwnerId;
use super::month::Month;

/// How owner-specific expenses are treated when computing the shared pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseTreatment {
    /// All expenses, owner-specific included, reduce the pool; owner-specific
    /// expenses are then charged again to their owner.
    ///
    /// This double deduction matches the historical figures and stays the
    /// default so regenerated months agree with ledgers already issued.
    #[default]
    PoolInclusive,
    /// Only shared expenses reduce the pool; owner-specific expenses are
    /// charged once, to their owner.
    PoolExclusive,
}

impl ExpenseTreatment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pool_inclusive" | "inclusive" => Some(Self::PoolInclusive),
            "pool_exclusive" | "exclusive" => Some(Self::PoolExclusive),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExpenseTreatment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PoolInclusive => write!(f, "pool_inclusive"),
            Self::PoolExclusive => write!(f, "pool_exclusive"),
        }
    }
}

/// Whether an allocation had anything to apportion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// Shares were normalized and income apportioned
    Computed,
    /// No owners exist, nothing was apportioned
    NoOwners,
    /// Owners exist but every share is zero; all gross shares are zero
    ZeroShares,
}

/// Stored forecast for one owner and month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedDistributionRecord {
    pub month: Month,
    pub owner_id: OwnerId,
    /// Gross share of the expected distributable pool
    pub expected_rent: f64,
    /// Owner-specific deduction
    pub expected_expenses: f64,
    pub expected_net: f64,
    pub generated_on: DateTime<Utc>,
}

/// Stored forecast-vs-actual comparison for one owner and month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceRecord {
    pub month: Month,
    pub owner_id: OwnerId,
    pub expected_net: f64,
    pub actual_net: f64,
    /// actual_net - expected_net
    pub variance: f64,
    pub generated_on: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_treatment_parse() {
        assert_eq!(
            ExpenseTreatment::parse("pool-exclusive"),
            Some(ExpenseTreatment::PoolExclusive)
        );
        assert_eq!(
            ExpenseTreatment::parse("Inclusive"),
            Some(ExpenseTreatment::PoolInclusive)
        );
        assert_eq!(ExpenseTreatment::parse("both"), None);
        assert_eq!(ExpenseTreatment::default(), ExpenseTreatment::PoolInclusive);
    }

    #[test]
    fn test_expense_treatment_serde() {
        let json = serde_json::to_string(&ExpenseTreatment::PoolExclusive).unwrap();
        assert_eq!(json, "\"pool_exclusive\"");
    }
}
