//! Wallet entry model
//!
//! Wallet entries form an append-only log per owner. Amounts are always
//! stored as positive magnitudes; the sign lives in `direction`. Balances are
//! never stored, only derived by replaying entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{OwnerId, RunId, WalletEntryId};
use super::month::Month;

/// Direction of a wallet movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }

    /// Apply this direction to a magnitude
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            Self::In => amount,
            Self::Out => -amount,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of a wallet entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    ForecastDistribution,
    ForecastExpense,
    ForecastAllowance,
    ActualDistribution,
    ActualExpense,
    ActualAllowance,
}

impl EntryType {
    /// Tag stored in the `entryType` column
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ForecastDistribution => "distribution_forecast",
            Self::ForecastExpense => "owner_expense_forecast",
            Self::ForecastAllowance => "allowance_forecast",
            Self::ActualDistribution => "distribution_actual",
            Self::ActualExpense => "owner_expense_actual",
            Self::ActualAllowance => "allowance_actual",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "distribution_forecast" => Some(Self::ForecastDistribution),
            "owner_expense_forecast" => Some(Self::ForecastExpense),
            "allowance_forecast" => Some(Self::ForecastAllowance),
            "distribution_actual" => Some(Self::ActualDistribution),
            "owner_expense_actual" => Some(Self::ActualExpense),
            "allowance_actual" => Some(Self::ActualAllowance),
            _ => None,
        }
    }

    /// Default human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::ForecastDistribution => "Expected distribution",
            Self::ForecastExpense => "Owner-specific expense (forecast)",
            Self::ForecastAllowance => "Allowance (forecast)",
            Self::ActualDistribution => "Actual distribution",
            Self::ActualExpense => "Owner-specific expense (actual)",
            Self::ActualAllowance => "Allowance (actual)",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::ForecastExpense | Self::ActualExpense => Direction::Out,
            _ => Direction::In,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A wallet entry not yet written to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWalletEntry {
    pub owner_id: OwnerId,
    pub month: Month,
    pub entry_type: EntryType,
    pub description: String,
    pub amount: f64,
    pub direction: Direction,
    pub created_on: DateTime<Utc>,
    pub run_id: Option<RunId>,
}

impl NewWalletEntry {
    /// Build an entry for a signed engine figure
    ///
    /// Returns `None` for a zero amount. The stored amount is the absolute
    /// value. The entry type gives the natural direction, which flips when
    /// the figure is negative (a pool that went below zero still moves the
    /// balance the right way).
    pub fn from_figure(
        owner_id: OwnerId,
        month: Month,
        entry_type: EntryType,
        amount: f64,
        run_id: RunId,
    ) -> Option<Self> {
        if amount == 0.0 {
            return None;
        }
        let natural = entry_type.direction();
        let direction = if amount < 0.0 { natural.reversed() } else { natural };
        Some(Self {
            owner_id,
            month,
            entry_type,
            description: entry_type.description().to_string(),
            amount: amount.abs(),
            direction,
            created_on: Utc::now(),
            run_id: Some(run_id),
        })
    }
}

/// A stored wallet entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletEntry {
    pub id: WalletEntryId,
    pub owner_id: OwnerId,
    pub month: Month,
    pub entry_type: EntryType,
    pub description: String,
    pub amount: f64,
    pub direction: Direction,
    pub created_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
}

impl WalletEntry {
    /// Signed effect of this entry on the balance
    pub fn signed_amount(&self) -> f64 {
        self.direction.signed(self.amount)
    }
}
