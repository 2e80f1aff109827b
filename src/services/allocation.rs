//! Share apportionment shared by the distribution and variance engines
//!
//! Given a month's income figure, derive the distributable pool and split
//! it across owners by normalized share, then apply each owner's specific
//! expenses and allowances.

use serde::Serialize;

use super::aggregation::{pool_expenses, AggregationService};
use crate::error::LedgerResult;
use crate::models::{AllocationStatus, ExpenseTreatment, Month, Owner};

/// One owner's slice of an allocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerAllocation {
    pub owner: Owner,
    /// share_held / total_shares
    pub fraction: f64,
    /// Share of the distributable pool
    pub gross: f64,
    pub owner_expense: f64,
    pub allowance: f64,
    /// gross - owner_expense + allowance
    pub net: f64,
}

/// Result of apportioning one income figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub status: AllocationStatus,
    pub treatment: ExpenseTreatment,
    pub income: f64,
    pub total_expenses: f64,
    /// Expenses taken out before the split
    pub pool_expenses: f64,
    pub distributable: f64,
    /// Sum of shares, or 1.0 when every share is zero
    pub total_shares: f64,
    pub owners: Vec<OwnerAllocation>,
}

impl Allocation {
    pub fn total_gross(&self) -> f64 {
        self.owners.iter().map(|o| o.gross).sum()
    }

    pub fn total_net(&self) -> f64 {
        self.owners.iter().map(|o| o.net).sum()
    }
}

/// Split `income` for `month` across `owners`
pub fn allocate(
    agg: &AggregationService<'_>,
    owners: &[Owner],
    month: &Month,
    income: f64,
    treatment: ExpenseTreatment,
) -> LedgerResult<Allocation> {
    let total_expenses = agg.total_expenses(month)?;

    let mut deductions = Vec::with_capacity(owners.len());
    for owner in owners {
        let owner_expense = agg.owner_specific_expenses(month, owner.id)?;
        let allowance = agg.owner_allowance(month, owner.id)?;
        deductions.push((owner_expense, allowance));
    }

    // Only expenses charged to a listed owner leave the pool
    let charged: f64 = deductions.iter().map(|(e, _)| e).sum();
    let pool_expenses = pool_expenses(total_expenses, charged, treatment);
    let distributable = income - pool_expenses;

    let share_sum: f64 = owners.iter().map(|o| o.share_held).sum();
    let (status, total_shares) = if owners.is_empty() {
        (AllocationStatus::NoOwners, 1.0)
    } else if share_sum == 0.0 {
        (AllocationStatus::ZeroShares, 1.0)
    } else {
        (AllocationStatus::Computed, share_sum)
    };

    let owners = owners
        .iter()
        .zip(deductions)
        .map(|(owner, (owner_expense, allowance))| {
            let fraction = owner.share_held / total_shares;
            let gross = distributable * fraction;
            OwnerAllocation {
                owner: owner.clone(),
                fraction,
                gross,
                owner_expense,
                allowance,
                net: gross - owner_expense + allowance,
            }
        })
        .collect();

    Ok(Allocation {
        status,
        treatment,
        income,
        total_expenses,
        pool_expenses,
        distributable,
        total_shares,
        owners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, OwnerAllowance, OwnerId};
    use crate::storage::Storage;

    fn owners() -> Vec<Owner> {
        vec![
            Owner::new(OwnerId::new(1), "A", 60.0),
            Owner::new(OwnerId::new(2), "B", 40.0),
        ]
    }

    #[test]
    fn test_plain_split() {
        let storage = Storage::open_in_memory().unwrap();
        let agg = AggregationService::new(&storage);
        let jan = Month::parse("2024-01").unwrap();

        let alloc = allocate(&agg, &owners(), &jan, 8000.0, ExpenseTreatment::default()).unwrap();
        assert_eq!(alloc.status, AllocationStatus::Computed);
        assert_eq!(alloc.owners[0].gross, 4800.0);
        assert_eq!(alloc.owners[1].gross, 3200.0);
        assert_eq!(alloc.total_gross(), alloc.distributable);
    }

    #[test]
    fn test_treatments_differ_in_pool() {
        let storage = Storage::open_in_memory().unwrap();
        let jan = Month::parse("2024-01").unwrap();
        let a = OwnerId::new(1);
        storage.expenses().insert(&Expense::shared(jan, "Elevator", 1500.0)).unwrap();
        storage.expenses().insert(&Expense::for_owner(jan, "Plumbing", 500.0, a)).unwrap();
        storage.allowances().insert(&OwnerAllowance::new(jan, a, 100.0)).unwrap();
        let agg = AggregationService::new(&storage);

        let incl = allocate(&agg, &owners(), &jan, 10000.0, ExpenseTreatment::PoolInclusive).unwrap();
        assert_eq!(incl.distributable, 8000.0);
        assert_eq!(incl.owners[0].net, 4800.0 - 500.0 + 100.0);

        let excl = allocate(&agg, &owners(), &jan, 10000.0, ExpenseTreatment::PoolExclusive).unwrap();
        assert_eq!(excl.distributable, 8500.0);
        assert_eq!(excl.owners[0].net, 5100.0 - 500.0 + 100.0);
        // Exclusive treatment deducts each expense exactly once
        assert!((excl.total_net() - (10000.0 - 2000.0 + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_shares_and_no_owners() {
        let storage = Storage::open_in_memory().unwrap();
        let agg = AggregationService::new(&storage);
        let jan = Month::parse("2024-01").unwrap();

        let zero = vec![Owner::new(OwnerId::new(1), "A", 0.0)];
        let alloc = allocate(&agg, &zero, &jan, 1000.0, ExpenseTreatment::default()).unwrap();
        assert_eq!(alloc.status, AllocationStatus::ZeroShares);
        assert_eq!(alloc.total_shares, 1.0);
        assert_eq!(alloc.owners[0].gross, 0.0);

        let none = allocate(&agg, &[], &jan, 1000.0, ExpenseTreatment::default()).unwrap();
        assert_eq!(none.status, AllocationStatus::NoOwners);
        assert!(none.owners.is_empty());
        assert_eq!(none.distributable, 1000.0);
    }
}
