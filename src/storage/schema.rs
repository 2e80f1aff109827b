//! Embedded ledger schema
//!
//! Every statement is idempotent so the schema can be applied on each open.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::LedgerResult;

/// Tables the ledger cannot work without
pub const EXPECTED_TABLES: [&str; 7] = [
    "owners",
    "rents",
    "expenses",
    "owner_allowances",
    "owner_wallets",
    "expected_distribution",
    "variance_report",
];

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS owners (
    ownerId     INTEGER PRIMARY KEY,
    name        TEXT    NOT NULL,
    shareHeld   REAL    NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS rents (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    month         TEXT    NOT NULL,
    unitId        TEXT    NOT NULL,
    tenantName    TEXT    NOT NULL DEFAULT '',
    effectiveRent REAL    NOT NULL DEFAULT 0,
    paidAmount    REAL    NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_rents_month ON rents(month);

CREATE TABLE IF NOT EXISTS expenses (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    month         TEXT    NOT NULL,
    description   TEXT    NOT NULL DEFAULT '',
    amount        REAL    NOT NULL DEFAULT 0,
    ownerSpecific INTEGER NOT NULL DEFAULT 0,
    chargedOwner  INTEGER
);
CREATE INDEX IF NOT EXISTS idx_expenses_month ON expenses(month);

CREATE TABLE IF NOT EXISTS owner_allowances (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    month          TEXT    NOT NULL,
    ownerId        INTEGER NOT NULL,
    allowanceValue REAL    NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_allowances_month_owner ON owner_allowances(month, ownerId);

CREATE TABLE IF NOT EXISTS owner_wallets (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    ownerId     INTEGER NOT NULL,
    month       TEXT    NOT NULL,
    entryType   TEXT    NOT NULL,
    description TEXT    NOT NULL DEFAULT '',
    amount      REAL    NOT NULL,
    direction   TEXT    NOT NULL CHECK (direction IN ('in', 'out')),
    createdOn   TEXT    NOT NULL,
    runId       TEXT
);
CREATE INDEX IF NOT EXISTS idx_wallets_owner_month ON owner_wallets(ownerId, month);

CREATE TABLE IF NOT EXISTS expected_distribution (
    month            TEXT    NOT NULL,
    ownerId          INTEGER NOT NULL,
    expectedRent     REAL    NOT NULL,
    expectedExpenses REAL    NOT NULL,
    expectedNet      REAL    NOT NULL,
    generatedOn      TEXT    NOT NULL,
    PRIMARY KEY (month, ownerId)
);

CREATE TABLE IF NOT EXISTS variance_report (
    month       TEXT    NOT NULL,
    ownerId     INTEGER NOT NULL,
    expectedNet REAL    NOT NULL,
    actualNet   REAL    NOT NULL,
    variance    REAL    NOT NULL,
    generatedOn TEXT    NOT NULL,
    PRIMARY KEY (month, ownerId)
);
"#;

/// Apply the schema to a connection
pub fn apply(conn: &Connection) -> LedgerResult<()> {
    debug!("applying ledger schema");
    conn.execute_batch(SCHEMA)?;
    info!(tables = EXPECTED_TABLES.len(), "ledger schema ready");
    Ok(())
}

/// Expected tables that are absent from the database
pub fn missing_tables(conn: &Connection) -> LedgerResult<Vec<&'static str>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EXPECTED_TABLES
        .iter()
        .copied()
        .filter(|t| !present.iter().any(|p| p == t))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(missing_tables(&conn).unwrap().len(), EXPECTED_TABLES.len());

        apply(&conn).unwrap();
        apply(&conn).unwrap();
        assert!(missing_tables(&conn).unwrap().is_empty());
    }
}
