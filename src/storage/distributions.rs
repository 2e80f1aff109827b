//! Expected distribution repository
//!
//! Holds the forecast snapshot, one row per owner per month.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::LedgerResult;
use crate::models::{ExpectedDistributionRecord, Month, OwnerId};

use super::{timestamp_from_sql, timestamp_to_sql};

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ExpectedDistributionRecord> {
    let generated_on: String = row.get(5)?;
    Ok(ExpectedDistributionRecord {
        month: row.get(0)?,
        owner_id: row.get(1)?,
        expected_rent: row.get(2)?,
        expected_expenses: row.get(3)?,
        expected_net: row.get(4)?,
        generated_on: timestamp_from_sql(5, &generated_on)?,
    })
}

/// Repository for forecast snapshots
pub struct DistributionRepository<'c> {
    conn: &'c Connection,
}

impl<'c> DistributionRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &ExpectedDistributionRecord) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO expected_distribution
                (month, ownerId, expectedRent, expectedExpenses, expectedNet, generatedOn)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.month,
                record.owner_id,
                record.expected_rent,
                record.expected_expenses,
                record.expected_net,
                timestamp_to_sql(&record.generated_on),
            ],
        )?;
        Ok(())
    }

    pub fn delete_month(&self, month: &Month) -> LedgerResult<usize> {
        Ok(self.conn.execute(
            "DELETE FROM expected_distribution WHERE month = ?1",
            params![month],
        )?)
    }

    /// Forecast rows for a month ordered by owner id
    pub fn find_by_month(&self, month: &Month) -> LedgerResult<Vec<ExpectedDistributionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, ownerId, expectedRent, expectedExpenses, expectedNet, generatedOn
             FROM expected_distribution WHERE month = ?1 ORDER BY ownerId",
        )?;
        let rows = stmt
            .query_map(params![month], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get(
        &self,
        month: &Month,
        owner: OwnerId,
    ) -> LedgerResult<Option<ExpectedDistributionRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT month, ownerId, expectedRent, expectedExpenses, expectedNet, generatedOn
                 FROM expected_distribution WHERE month = ?1 AND ownerId = ?2",
                params![month, owner],
                record_from_row,
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use chrono::Utc;

    #[test]
    fn test_insert_find_delete() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = storage.distributions();
        let jan = Month::parse("2024-01").unwrap();

        for (owner, net) in [(2, 3200.0), (1, 4800.0)] {
            repo.insert(&ExpectedDistributionRecord {
                month: jan,
                owner_id: OwnerId::new(owner),
                expected_rent: net,
                expected_expenses: 0.0,
                expected_net: net,
                generated_on: Utc::now(),
            })
            .unwrap();
        }

        let rows = repo.find_by_month(&jan).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].owner_id, OwnerId::new(1));
        assert_eq!(
            repo.get(&jan, OwnerId::new(2)).unwrap().unwrap().expected_net,
            3200.0
        );
        assert_eq!(repo.delete_month(&jan).unwrap(), 2);
        assert!(repo.get(&jan, OwnerId::new(2)).unwrap().is_none());
    }
}
