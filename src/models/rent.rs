//! Rent record model
//!
//! One unit's contracted rent and collected payment for a month.

use serde::{Deserialize, Serialize};

use super::month::Month;

/// A unit's rent for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRecord {
    pub month: Month,
    pub unit_id: String,
    pub tenant_name: String,
    /// Contracted amount
    pub effective_rent: f64,
    /// Amount actually collected
    pub paid_amount: f64,
}

impl RentRecord {
    /// Create a new rent record
    pub fn new(
        month: Month,
        unit_id: impl Into<String>,
        tenant_name: impl Into<String>,
        effective_rent: f64,
        paid_amount: f64,
    ) -> Self {
        Self {
            month,
            unit_id: unit_id.into(),
            tenant_name: tenant_name.into(),
            effective_rent,
            paid_amount,
        }
    }

    /// Contracted rent not (yet) collected
    pub fn outstanding(&self) -> f64 {
        self.effective_rent - self.paid_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outstanding() {
        let month = Month::parse("2024-01").unwrap();
        let rent = RentRecord::new(month, "A1", "Tenant", 1000.0, 750.0);
        assert_eq!(rent.outstanding(), 250.0);
    }
}
