//! Rent repository
//!
//! Reads and writes the `rents` table. A month's rent roll is replaced as a
//! whole on re-import.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::LedgerResult;
use crate::models::{Month, RentRecord};

/// Repository for rent persistence
pub struct RentRepository<'c> {
    conn: &'c Connection,
}

impl<'c> RentRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, rent: &RentRecord) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO rents (month, unitId, tenantName, effectiveRent, paidAmount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                rent.month,
                rent.unit_id,
                rent.tenant_name,
                rent.effective_rent,
                rent.paid_amount
            ],
        )?;
        Ok(())
    }

    /// Rent roll for a month in insertion order
    pub fn find_by_month(&self, month: &Month) -> LedgerResult<Vec<RentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, unitId, tenantName, effectiveRent, paidAmount
             FROM rents WHERE month = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![month], |row| {
                Ok(RentRecord {
                    month: row.get(0)?,
                    unit_id: row.get(1)?,
                    tenant_name: row.get(2)?,
                    effective_rent: row.get(3)?,
                    paid_amount: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn delete_month(&self, month: &Month) -> LedgerResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM rents WHERE month = ?1", params![month])?)
    }

    /// Sum of contracted rent for a month, 0 when there are no rows
    pub fn sum_effective_rent(&self, month: &Month) -> LedgerResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(effectiveRent), 0) FROM rents WHERE month = ?1",
            params![month],
            |row| row.get(0),
        )?)
    }

    /// Sum of collected rent for a month, 0 when there are no rows
    pub fn sum_paid(&self, month: &Month) -> LedgerResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(paidAmount), 0) FROM rents WHERE month = ?1",
            params![month],
            |row| row.get(0),
        )?)
    }

    /// Every month that has rent rows, oldest first
    pub fn months(&self) -> LedgerResult<Vec<Month>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT month FROM rents")?;
        let mut months = stmt
            .query_map([], |row| row.get::<_, Month>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        months.sort();
        Ok(months)
    }

    /// Most recent month with rent rows
    pub fn latest_month(&self) -> LedgerResult<Option<Month>> {
        Ok(self.months()?.pop())
    }

    pub fn has_month(&self, month: &Month) -> LedgerResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM rents WHERE month = ?1 LIMIT 1",
                params![month],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn month(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    #[test]
    fn test_sums_default_to_zero() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = storage.rents();
        assert_eq!(repo.sum_effective_rent(&month("2024-01")).unwrap(), 0.0);
        assert_eq!(repo.sum_paid(&month("2024-01")).unwrap(), 0.0);
        assert!(repo.latest_month().unwrap().is_none());
    }

    #[test]
    fn test_sums_and_latest_month() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = storage.rents();
        let jan = month("2024-01");
        let feb = month("2024-02");

        repo.insert(&RentRecord::new(jan, "A1", "Hana", 6000.0, 6000.0)).unwrap();
        repo.insert(&RentRecord::new(jan, "A2", "Omar", 4000.0, 3000.0)).unwrap();
        repo.insert(&RentRecord::new(feb, "A1", "Hana", 6000.0, 0.0)).unwrap();

        assert_eq!(repo.sum_effective_rent(&jan).unwrap(), 10000.0);
        assert_eq!(repo.sum_paid(&jan).unwrap(), 9000.0);
        assert_eq!(repo.find_by_month(&jan).unwrap().len(), 2);
        assert_eq!(repo.latest_month().unwrap(), Some(feb));
        assert!(repo.has_month(&feb).unwrap());

        assert_eq!(repo.delete_month(&jan).unwrap(), 2);
        assert!(!repo.has_month(&jan).unwrap());
    }
}
