//! Storage layer for rentshare
//!
//! Provides the SQLite-backed ledger store. Repositories borrow a plain
//! `&Connection`, so the same code runs against the store directly or inside
//! a transaction opened with [`Storage::in_transaction`].

pub mod allowances;
pub mod distributions;
pub mod expenses;
pub mod owners;
pub mod rents;
pub mod schema;
pub mod variances;
pub mod wallets;

pub use allowances::AllowanceRepository;
pub use distributions::DistributionRepository;
pub use expenses::ExpenseRepository;
pub use owners::OwnerRepository;
pub use rents::RentRepository;
pub use variances::VarianceRepository;
pub use wallets::WalletRepository;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, Transaction};
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Month, OwnerId};

/// Main storage coordinator owning the database connection
pub struct Storage {
    conn: Connection,
    path: Option<PathBuf>,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open (or create) the ledger database under the configured data dir
    pub fn new(paths: &LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;
        let mut storage = Self::open(paths.database_file())?;
        storage.audit = Some(AuditLogger::new(paths.audit_log()));
        Ok(storage)
    }

    /// Open (or create) a ledger database file
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "opened ledger database");

        let storage = Self {
            conn,
            path: Some(path.to_path_buf()),
            audit: None,
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Open a throwaway in-memory ledger
    pub fn open_in_memory() -> LedgerResult<Self> {
        let storage = Self {
            conn: Connection::open_in_memory()?,
            path: None,
            audit: None,
        };
        storage.initialize()?;
        Ok(storage)
    }

    fn initialize(&self) -> LedgerResult<()> {
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::apply(&self.conn)
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Borrow the raw connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn owners(&self) -> OwnerRepository<'_> {
        OwnerRepository::new(&self.conn)
    }

    pub fn rents(&self) -> RentRepository<'_> {
        RentRepository::new(&self.conn)
    }

    pub fn expenses(&self) -> ExpenseRepository<'_> {
        ExpenseRepository::new(&self.conn)
    }

    pub fn allowances(&self) -> AllowanceRepository<'_> {
        AllowanceRepository::new(&self.conn)
    }

    pub fn wallets(&self) -> WalletRepository<'_> {
        WalletRepository::new(&self.conn)
    }

    pub fn distributions(&self) -> DistributionRepository<'_> {
        DistributionRepository::new(&self.conn)
    }

    pub fn variances(&self) -> VarianceRepository<'_> {
        VarianceRepository::new(&self.conn)
    }

    /// Run `f` inside a single transaction
    ///
    /// Commits when `f` returns `Ok`; any error rolls every write back.
    pub fn in_transaction<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> LedgerResult<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "rolling back transaction");
                tx.rollback()?;
                Err(err)
            }
        }
    }

    /// Attach an audit log (stores opened without paths have none)
    pub fn with_audit_log(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Append an entry to the audit log, if one is attached
    pub fn log_audit(&self, entry: &AuditEntry) -> LedgerResult<()> {
        match &self.audit {
            Some(logger) => logger.log(entry),
            None => Ok(()),
        }
    }

    /// Append an audit entry for a change that has already been committed
    ///
    /// A failed write is logged and dropped; the committed change stands.
    pub fn log_committed(&self, entry: &AuditEntry) {
        if let Err(e) = self.log_audit(entry) {
            warn!(
                error = %e,
                operation = %entry.operation,
                entity_id = %entry.entity_id,
                "failed to write audit entry"
            );
        }
    }

    pub fn log_create<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.log_audit(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        self.log_audit(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Expected tables missing from the database
    pub fn missing_tables(&self) -> LedgerResult<Vec<&'static str>> {
        schema::missing_tables(&self.conn)
    }
}

impl ToSql for Month {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Month {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Month::parse(text).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for OwnerId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.get()))
    }
}

impl FromSql for OwnerId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(OwnerId::new)
    }
}

/// Format a timestamp for storage
///
/// Fixed-width RFC 3339 with microseconds so that text order is time order.
pub(crate) fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp inside a row mapper
pub(crate) fn timestamp_from_sql(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
