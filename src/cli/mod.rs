//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod import;
pub mod ledger;
pub mod owner;
pub mod report;
pub mod wallet;

pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportArgs};
pub use ledger::{
    handle_distribute_command, handle_summary_command, handle_variance_command, RunArgs,
};
pub use owner::{handle_owner_command, OwnerCommands};
pub use report::{handle_report_command, ReportArgs};
pub use wallet::{handle_wallet_command, WalletArgs};

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseTreatment, Month};
use crate::services::AggregationService;
use crate::storage::Storage;

/// Parse a `YYYY-MM` argument
pub(crate) fn parse_month(s: &str) -> LedgerResult<Month> {
    Month::parse(s).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// The requested month, or the latest month with rent data
pub(crate) fn resolve_month(storage: &Storage, month: Option<&str>) -> LedgerResult<Month> {
    match month {
        Some(m) => parse_month(m),
        None => AggregationService::new(storage)
            .latest_rent_month()?
            .ok_or_else(|| {
                LedgerError::Validation(
                    "No rent data imported yet; pass a month (YYYY-MM)".to_string(),
                )
            }),
    }
}

/// Per-call treatment override, falling back to the configured one
pub(crate) fn resolve_treatment(
    settings: &Settings,
    treatment: Option<&str>,
) -> LedgerResult<ExpenseTreatment> {
    match treatment {
        Some(t) => ExpenseTreatment::parse(t).ok_or_else(|| {
            LedgerError::Validation(format!(
                "Invalid expense treatment: '{}'. Valid values: pool_inclusive, pool_exclusive",
                t
            ))
        }),
        None => Ok(settings.expense_treatment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RentRecord;

    #[test]
    fn test_resolve_month_defaults_to_latest_rent() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(resolve_month(&storage, None).unwrap_err().is_validation());

        for m in ["2024-01", "2024-03"] {
            storage
                .rents()
                .insert(&RentRecord::new(Month::parse(m).unwrap(), "A1", "T", 1.0, 1.0))
                .unwrap();
        }
        assert_eq!(resolve_month(&storage, None).unwrap().to_string(), "2024-03");
        assert_eq!(
            resolve_month(&storage, Some("2023-12")).unwrap().to_string(),
            "2023-12"
        );
        assert!(resolve_month(&storage, Some("2023-13")).is_err());
    }

    #[test]
    fn test_resolve_treatment() {
        let settings = Settings::default();
        assert_eq!(
            resolve_treatment(&settings, None).unwrap(),
            ExpenseTreatment::PoolInclusive
        );
        assert_eq!(
            resolve_treatment(&settings, Some("exclusive")).unwrap(),
            ExpenseTreatment::PoolExclusive
        );
        assert!(resolve_treatment(&settings, Some("half")).is_err());
    }
}
