//! JSON Export functionality
//!
//! Exports everything stored for one month to JSON with schema versioning.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    ExpectedDistributionRecord, Expense, Month, Owner, OwnerAllowance, RentRecord, VarianceRecord,
    WalletEntry,
};
use crate::services::AggregationService;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Snapshot of one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub month: Month,

    /// Owner register at export time
    pub owners: Vec<Owner>,

    pub rents: Vec<RentRecord>,
    pub expenses: Vec<Expense>,
    pub allowances: Vec<OwnerAllowance>,
    pub expected_distribution: Vec<ExpectedDistributionRecord>,
    pub variance: Vec<VarianceRecord>,

    /// Wallet entries for the month, all owners
    pub wallet_entries: Vec<WalletEntry>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub owner_count: usize,
    pub unit_count: usize,
    pub expense_count: usize,
    pub wallet_entry_count: usize,
    /// Sum of contracted rent
    pub expected_revenue: f64,
    /// Sum of collected rent
    pub total_paid: f64,
    pub total_expenses: f64,
}

impl MonthExport {
    /// Collect the month's data from storage
    pub fn from_storage(storage: &Storage, month: &Month) -> LedgerResult<Self> {
        let owners = storage.owners().get_all()?;
        let rents = storage.rents().find_by_month(month)?;
        let expenses = storage.expenses().find_by_month(month)?;
        let allowances = storage.allowances().find_by_month(month)?;
        let expected_distribution = storage.distributions().find_by_month(month)?;
        let variance = storage.variances().find_by_month(month)?;
        let wallet_entries = storage.wallets().find_by_month(month)?;

        let summary = AggregationService::new(storage).month_summary(month)?;

        let metadata = ExportMetadata {
            owner_count: owners.len(),
            unit_count: rents.len(),
            expense_count: expenses.len(),
            wallet_entry_count: wallet_entries.len(),
            expected_revenue: summary.expected_revenue,
            total_paid: summary.total_paid,
            total_expenses: summary.total_expenses,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            month: *month,
            owners,
            rents,
            expenses,
            allowances,
            expected_distribution,
            variance,
            wallet_entries,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        // Every monthly row must belong to the exported month
        let months = self
            .rents
            .iter()
            .map(|r| r.month)
            .chain(self.expenses.iter().map(|e| e.month))
            .chain(self.allowances.iter().map(|a| a.month))
            .chain(self.expected_distribution.iter().map(|d| d.month))
            .chain(self.variance.iter().map(|v| v.month))
            .chain(self.wallet_entries.iter().map(|w| w.month));
        for m in months {
            if m != self.month {
                return Err(format!(
                    "Row for month {} found in export of {}",
                    m, self.month
                ));
            }
        }

        let owner_ids: HashSet<_> = self.owners.iter().map(|o| o.id).collect();

        for record in &self.expected_distribution {
            if !owner_ids.contains(&record.owner_id) {
                return Err(format!(
                    "Expected distribution references unknown owner {}",
                    record.owner_id
                ));
            }
        }

        for record in &self.variance {
            if !owner_ids.contains(&record.owner_id) {
                return Err(format!(
                    "Variance row references unknown owner {}",
                    record.owner_id
                ));
            }
        }

        for entry in &self.wallet_entries {
            if !owner_ids.contains(&entry.owner_id) {
                return Err(format!(
                    "Wallet entry {} references unknown owner {}",
                    entry.id, entry.owner_id
                ));
            }
        }

        Ok(())
    }
}

/// Export one month to JSON
pub fn export_month_json<W: Write + ?Sized>(
    storage: &Storage,
    month: &Month,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = MonthExport::from_storage(storage, month)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a JSON export (for verification)
pub fn import_from_json(json_str: &str) -> LedgerResult<MonthExport> {
    let export: MonthExport = serde_json::from_str(json_str)?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}
