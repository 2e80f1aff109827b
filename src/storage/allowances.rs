//! Allowance repository
//!
//! Reads and writes the `owner_allowances` table.

use rusqlite::{params, Connection};

use crate::error::LedgerResult;
use crate::models::{Month, OwnerAllowance, OwnerId};

/// Repository for allowance persistence
pub struct AllowanceRepository<'c> {
    conn: &'c Connection,
}

impl<'c> AllowanceRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, allowance: &OwnerAllowance) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO owner_allowances (month, ownerId, allowanceValue) VALUES (?1, ?2, ?3)",
            params![allowance.month, allowance.owner_id, allowance.allowance_value],
        )?;
        Ok(())
    }

    pub fn find_by_month(&self, month: &Month) -> LedgerResult<Vec<OwnerAllowance>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, ownerId, allowanceValue FROM owner_allowances
             WHERE month = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![month], |row| {
                Ok(OwnerAllowance {
                    month: row.get(0)?,
                    owner_id: row.get(1)?,
                    allowance_value: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn delete_month(&self, month: &Month) -> LedgerResult<usize> {
        Ok(self.conn.execute(
            "DELETE FROM owner_allowances WHERE month = ?1",
            params![month],
        )?)
    }

    /// Sum of an owner's allowances for a month
    pub fn sum_for_owner(&self, month: &Month, owner: OwnerId) -> LedgerResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(allowanceValue), 0) FROM owner_allowances
             WHERE month = ?1 AND ownerId = ?2",
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
    fn test_sum_for_owner() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = storage.allowances();
        let jan = Month::parse("2024-01").unwrap();
        let a = OwnerId::new(1);

        repo.insert(&OwnerAllowance::new(jan, a, 100.0)).unwrap();
        repo.insert(&OwnerAllowance::new(jan, a, 50.0)).unwrap();

        assert_eq!(repo.sum_for_owner(&jan, a).unwrap(), 150.0);
        assert_eq!(repo.sum_for_owner(&jan, OwnerId::new(2)).unwrap(), 0.0);
        assert_eq!(repo.find_by_month(&jan).unwrap().len(), 2);
        assert_eq!(repo.delete_month(&jan).unwrap(), 2);
    }
}
