//! Expense repository
//!
//! Reads and writes the `expenses` table.

use rusqlite::{params, Connection};

use crate::error::LedgerResult;
use crate::models::{Expense, Month, OwnerId};

/// Repository for expense persistence
pub struct ExpenseRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ExpenseRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, expense: &Expense) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO expenses (month, description, amount, ownerSpecific, chargedOwner)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.month,
                expense.description,
                expense.amount,
                expense.owner_specific,
                expense.charged_owner
            ],
        )?;
        Ok(())
    }

    pub fn find_by_month(&self, month: &Month) -> LedgerResult<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, description, amount, ownerSpecific, chargedOwner
             FROM expenses WHERE month = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![month], |row| {
                Ok(Expense {
                    month: row.get(0)?,
                    description: row.get(1)?,
                    amount: row.get(2)?,
                    owner_specific: row.get(3)?,
                    charged_owner: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn delete_month(&self, month: &Month) -> LedgerResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM expenses WHERE month = ?1", params![month])?)
    }

    /// Sum of every expense in a month
    pub fn sum_all(&self, month: &Month) -> LedgerResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE month = ?1",
            params![month],
            |row| row.get(0),
        )?)
    }

    /// Sum of owner-specific expenses in a month that name an owner
    pub fn sum_owner_specific(&self, month: &Month) -> LedgerResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses
             WHERE month = ?1 AND ownerSpecific = 1 AND chargedOwner IS NOT NULL",
            params![month],
            |row| row.get(0),
        )?)
    }

    /// Sum of owner-specific expenses charged to one owner
    pub fn sum_charged_to(&self, month: &Month, owner: OwnerId) -> LedgerResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses
             WHERE month = ?1 AND ownerSpecific = 1 AND chargedOwner = ?2",
            params![month, owner],
            |row| row.get(0),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    #[test]
    fn test_sums() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = storage.expenses();
        let jan = Month::parse("2024-01").unwrap();
        let a = OwnerId::new(1);
        let b = OwnerId::new(2);

        repo.insert(&Expense::shared(jan, "Elevator", 2000.0)).unwrap();
        repo.insert(&Expense::for_owner(jan, "Plumbing", 500.0, a)).unwrap();
        // Flagged but nobody charged: stays a shared expense
        repo.insert(&Expense {
            month: jan,
            description: "Orphan".into(),
            amount: 50.0,
            owner_specific: true,
            charged_owner: None,
        })
        .unwrap();

        assert_eq!(repo.sum_all(&jan).unwrap(), 2550.0);
        assert_eq!(repo.sum_owner_specific(&jan).unwrap(), 500.0);
        assert_eq!(repo.sum_charged_to(&jan, a).unwrap(), 500.0);
        assert_eq!(repo.sum_charged_to(&jan, b).unwrap(), 0.0);

        let rows = repo.find_by_month(&jan).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].charged_owner, Some(a));
        assert_eq!(rows[2].charged_owner, None);
    }
}
