//! Aggregation service
//!
//! Pure reads over one month of ledger data. Every figure is 0.0 when no
//! rows match; missing data is never an error.

use rusqlite::Connection;
use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::{ExpenseTreatment, Month, OwnerId};
use crate::storage::{AllowanceRepository, ExpenseRepository, RentRepository, Storage};

/// Service for monthly aggregates
///
/// Borrows a bare connection so the engines can aggregate inside their own
/// transaction.
pub struct AggregationService<'c> {
    conn: &'c Connection,
}

/// Headline figures for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: Month,
    pub expected_revenue: f64,
    pub total_paid: f64,
    pub total_expenses: f64,
    /// Expenses not charged to a particular owner
    pub shared_expenses: f64,
    /// Expenses charged to a named owner
    pub owner_specific_expenses: f64,
    pub units: usize,
}

impl MonthSummary {
    /// Contracted rent not collected
    pub fn outstanding(&self) -> f64 {
        self.expected_revenue - self.total_paid
    }

    /// Pool available for apportioning out of `income`
    pub fn distributable(&self, income: f64, treatment: ExpenseTreatment) -> f64 {
        income - pool_expenses(self.total_expenses, self.owner_specific_expenses, treatment)
    }
}

/// Expenses that reduce the shared pool under a given treatment
pub fn pool_expenses(total: f64, owner_specific: f64, treatment: ExpenseTreatment) -> f64 {
    match treatment {
        ExpenseTreatment::PoolInclusive => total,
        ExpenseTreatment::PoolExclusive => total - owner_specific,
    }
}

impl<'c> AggregationService<'c> {
    pub fn new(storage: &'c Storage) -> Self {
        Self::with_connection(storage.connection())
    }

    pub fn with_connection(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Sum of contracted rent for the month
    pub fn expected_revenue(&self, month: &Month) -> LedgerResult<f64> {
        RentRepository::new(self.conn).sum_effective_rent(month)
    }

    /// Sum of rent actually collected for the month
    pub fn total_paid(&self, month: &Month) -> LedgerResult<f64> {
        RentRepository::new(self.conn).sum_paid(month)
    }

    /// Sum of every expense, shared and owner-specific
    pub fn total_expenses(&self, month: &Month) -> LedgerResult<f64> {
        ExpenseRepository::new(self.conn).sum_all(month)
    }

    /// Owner-specific expenses charged to one owner
    pub fn owner_specific_expenses(&self, month: &Month, owner: OwnerId) -> LedgerResult<f64> {
        ExpenseRepository::new(self.conn).sum_charged_to(month, owner)
    }

    /// Allowances credited to one owner
    pub fn owner_allowance(&self, month: &Month, owner: OwnerId) -> LedgerResult<f64> {
        AllowanceRepository::new(self.conn).sum_for_owner(month, owner)
    }

    pub fn month_summary(&self, month: &Month) -> LedgerResult<MonthSummary> {
        let rents = RentRepository::new(self.conn);
        let expenses = ExpenseRepository::new(self.conn);

        let total_expenses = expenses.sum_all(month)?;
        let owner_specific_expenses = expenses.sum_owner_specific(month)?;

        Ok(MonthSummary {
            month: *month,
            expected_revenue: rents.sum_effective_rent(month)?,
            total_paid: rents.sum_paid(month)?,
            total_expenses,
            shared_expenses: total_expenses - owner_specific_expenses,
            owner_specific_expenses,
            units: rents.find_by_month(month)?.len(),
        })
    }

    /// Most recent month that has rent data
    pub fn latest_rent_month(&self) -> LedgerResult<Option<Month>> {
        RentRepository::new(self.conn).latest_month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, OwnerAllowance, RentRecord};

    fn month(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        let storage = Storage::open_in_memory().unwrap();
        let agg = AggregationService::new(&storage);
        let m = month("2030-07");

        assert_eq!(agg.expected_revenue(&m).unwrap(), 0.0);
        assert_eq!(agg.total_paid(&m).unwrap(), 0.0);
        assert_eq!(agg.total_expenses(&m).unwrap(), 0.0);
        assert_eq!(agg.owner_specific_expenses(&m, OwnerId::new(1)).unwrap(), 0.0);
        assert_eq!(agg.owner_allowance(&m, OwnerId::new(1)).unwrap(), 0.0);
        assert_eq!(agg.latest_rent_month().unwrap(), None);
    }

    #[test]
    fn test_month_summary() {
        let storage = Storage::open_in_memory().unwrap();
        let jan = month("2024-01");
        let a = OwnerId::new(1);

        storage.rents().insert(&RentRecord::new(jan, "A1", "Hana", 6000.0, 5000.0)).unwrap();
        storage.rents().insert(&RentRecord::new(jan, "A2", "Omar", 4000.0, 4000.0)).unwrap();
        storage.expenses().insert(&Expense::shared(jan, "Elevator", 1500.0)).unwrap();
        storage.expenses().insert(&Expense::for_owner(jan, "Plumbing", 500.0, a)).unwrap();
        storage.allowances().insert(&OwnerAllowance::new(jan, a, 100.0)).unwrap();

        let agg = AggregationService::new(&storage);
        let summary = agg.month_summary(&jan).unwrap();

        assert_eq!(summary.expected_revenue, 10000.0);
        assert_eq!(summary.total_paid, 9000.0);
        assert_eq!(summary.outstanding(), 1000.0);
        assert_eq!(summary.total_expenses, 2000.0);
        assert_eq!(summary.shared_expenses, 1500.0);
        assert_eq!(summary.units, 2);
        assert_eq!(
            summary.distributable(summary.expected_revenue, ExpenseTreatment::PoolInclusive),
            8000.0
        );
        assert_eq!(
            summary.distributable(summary.expected_revenue, ExpenseTreatment::PoolExclusive),
            8500.0
        );
        assert_eq!(agg.owner_allowance(&jan, a).unwrap(), 100.0);
        assert_eq!(agg.latest_rent_month().unwrap(), Some(jan));
    }
}
