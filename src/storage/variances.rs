//! Variance repository
//!
//! Holds the forecast-vs-actual snapshot, one row per owner per month.

use rusqlite::{params, Connection};

use crate::error::LedgerResult;
use crate::models::{Month, VarianceRecord};

use super::{timestamp_from_sql, timestamp_to_sql};

/// Repository for variance snapshots
pub struct VarianceRepository<'c> {
    conn: &'c Connection,
}

impl<'c> VarianceRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &VarianceRecord) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO variance_report
                (month, ownerId, expectedNet, actualNet, variance, generatedOn)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.month,
                record.owner_id,
                record.expected_net,
                record.actual_net,
                record.variance,
                timestamp_to_sql(&record.generated_on),
            ],
        )?;
        Ok(())
    }

    pub fn delete_month(&self, month: &Month) -> LedgerResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM variance_report WHERE month = ?1", params![month])?)
    }

    pub fn find_by_month(&self, month: &Month) -> LedgerResult<Vec<VarianceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, ownerId, expectedNet, actualNet, variance, generatedOn
             FROM variance_report WHERE month = ?1 ORDER BY ownerId",
        )?;
        let rows = stmt
            .query_map(params![month], |row| {
                let generated_on: String = row.get(5)?;
                Ok(VarianceRecord {
                    month: row.get(0)?,
                    owner_id: row.get(1)?,
                    expected_net: row.get(2)?,
                    actual_net: row.get(3)?,
                    variance: row.get(4)?,
                    generated_on: timestamp_from_sql(5, &generated_on)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnerId;
    use crate::storage::Storage;
    use chrono::Utc;

    #[test]
    fn test_insert_and_replace() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = storage.variances();
        let jan = Month::parse("2024-01").unwrap();
        let record = VarianceRecord {
            month: jan,
            owner_id: OwnerId::new(1),
            expected_net: 4800.0,
            actual_net: 4200.0,
            variance: -600.0,
            generated_on: Utc::now(),
        };

        repo.insert(&record).unwrap();
        assert!(repo.insert(&record).is_err(), "one row per owner and month");

        assert_eq!(repo.delete_month(&jan).unwrap(), 1);
        repo.insert(&record).unwrap();
        assert_eq!(repo.find_by_month(&jan).unwrap()[0].variance, -600.0);
    }
}
