//! Wallet repository
//!
//! The `owner_wallets` table is an append-only log. Entries are only ever
//! removed by regenerating a month's forecast.

use rusqlite::{params, Connection, Row};

use crate::error::LedgerResult;
use crate::models::{
    Direction, EntryType, Month, NewWalletEntry, OwnerId, RunId, WalletEntry, WalletEntryId,
};

use super::{timestamp_from_sql, timestamp_to_sql};

const COLUMNS: &str =
    "id, ownerId, month, entryType, description, amount, direction, createdOn, runId";

fn invalid_text(idx: usize, what: &str, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unknown {} '{}'", what, raw).into(),
    )
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<WalletEntry> {
    let entry_type: String = row.get(3)?;
    let direction: String = row.get(6)?;
    let created_on: String = row.get(7)?;
    let run_id: Option<String> = row.get(8)?;

    Ok(WalletEntry {
        id: WalletEntryId::new(row.get(0)?),
        owner_id: row.get(1)?,
        month: row.get(2)?,
        entry_type: EntryType::from_tag(&entry_type)
            .ok_or_else(|| invalid_text(3, "entry type", &entry_type))?,
        description: row.get(4)?,
        amount: row.get(5)?,
        direction: Direction::parse(&direction)
            .ok_or_else(|| invalid_text(6, "direction", &direction))?,
        created_on: timestamp_from_sql(7, &created_on)?,
        // Rows written by older tools carry no run id
        run_id: run_id.and_then(|s| RunId::parse(&s).ok()),
    })
}

/// Repository for wallet entry persistence
pub struct WalletRepository<'c> {
    conn: &'c Connection,
}

impl<'c> WalletRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Append an entry and return its id
    pub fn insert(&self, entry: &NewWalletEntry) -> LedgerResult<WalletEntryId> {
        self.conn.execute(
            "INSERT INTO owner_wallets
                (ownerId, month, entryType, description, amount, direction, createdOn, runId)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.owner_id,
                entry.month,
                entry.entry_type.tag(),
                entry.description,
                entry.amount,
                entry.direction.as_str(),
                timestamp_to_sql(&entry.created_on),
                entry.run_id.map(|r| r.to_string()),
            ],
        )?;
        Ok(WalletEntryId::new(self.conn.last_insert_rowid()))
    }

    /// Remove every owner's entries for a month
    pub fn delete_month(&self, month: &Month) -> LedgerResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM owner_wallets WHERE month = ?1", params![month])?)
    }

    /// An owner's entries for one month, in ledger order
    pub fn find_for_owner_month(
        &self,
        owner: OwnerId,
        month: &Month,
    ) -> LedgerResult<Vec<WalletEntry>> {
        let sql = format!(
            "SELECT {} FROM owner_wallets WHERE ownerId = ?1 AND month = ?2
             ORDER BY createdOn ASC, id ASC",
            COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![owner, month], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every entry for a month across owners, in ledger order
    pub fn find_by_month(&self, month: &Month) -> LedgerResult<Vec<WalletEntry>> {
        let sql = format!(
            "SELECT {} FROM owner_wallets WHERE month = ?1
             ORDER BY ownerId ASC, createdOn ASC, id ASC",
            COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![month], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Signed sum of an owner's entries in months strictly before `month`
    ///
    /// Months are compared as parsed values, not as stored text.
    pub fn signed_total_before(&self, owner: OwnerId, month: &Month) -> LedgerResult<f64> {
        let mut stmt = self.conn.prepare(
            "SELECT month, SUM(CASE WHEN direction = 'in' THEN amount ELSE -amount END)
             FROM owner_wallets WHERE ownerId = ?1 GROUP BY month",
        )?;
        let per_month = stmt
            .query_map(params![owner], |row| {
                Ok((row.get::<_, Month>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(per_month
            .into_iter()
            .filter(|(m, _)| m < month)
            .map(|(_, total)| total)
            .sum())
    }

    /// Months in which an owner has wallet activity, oldest first
    pub fn months_for_owner(&self, owner: OwnerId) -> LedgerResult<Vec<Month>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT month FROM owner_wallets WHERE ownerId = ?1")?;
        let mut months = stmt
            .query_map(params![owner], |row| row.get::<_, Month>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        months.sort();
        Ok(months)
    }

    pub fn count_for_month(&self, month: &Month) -> LedgerResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM owner_wallets WHERE month = ?1",
            params![month],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}
