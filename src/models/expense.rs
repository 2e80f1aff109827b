//! Expense and allowance models
//!
//! Shared expenses come out of the common pool. Owner-specific expenses are
//! charged to a single owner. Allowances are credits added back to an owner.

use serde::{Deserialize, Serialize};

use super::ids::OwnerId;
use super::month::Month;

/// A building expense for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub month: Month,
    pub description: String,
    pub amount: f64,
    pub owner_specific: bool,
    /// Owner charged when `owner_specific` is set
    pub charged_owner: Option<OwnerId>,
}

impl Expense {
    /// Create a shared expense
    pub fn shared(month: Month, description: impl Into<String>, amount: f64) -> Self {
        Self {
            month,
            description: description.into(),
            amount,
            owner_specific: false,
            charged_owner: None,
        }
    }

    /// Create an expense charged to one owner
    pub fn for_owner(
        month: Month,
        description: impl Into<String>,
        amount: f64,
        owner: OwnerId,
    ) -> Self {
        Self {
            month,
            description: description.into(),
            amount,
            owner_specific: true,
            charged_owner: Some(owner),
        }
    }

    /// Whether this expense is charged to the given owner
    pub fn is_charged_to(&self, owner: OwnerId) -> bool {
        self.owner_specific && self.charged_owner == Some(owner)
    }
}

/// A credit added back to an owner's net distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerAllowance {
    pub month: Month,
    pub owner_id: OwnerId,
    pub allowance_value: f64,
}

impl OwnerAllowance {
    pub fn new(month: Month, owner_id: OwnerId, allowance_value: f64) -> Self {
        Self {
            month,
            owner_id,
            allowance_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_charged_to() {
        let month = Month::parse("2024-01").unwrap();
        let a = OwnerId::new(1);
        let b = OwnerId::new(2);

        let specific = Expense::for_owner(month, "Plumbing", 500.0, a);
        assert!(specific.is_charged_to(a));
        assert!(!specific.is_charged_to(b));

        let shared = Expense::shared(month, "Elevator", 2000.0);
        assert!(!shared.is_charged_to(a));
    }
}
