//! Export module for rentshare
//!
//! Provides month data export in multiple formats:
//! - CSV: owner register and wallet entries (spreadsheet-compatible)
//! - JSON: machine-readable month snapshot
//! - YAML: human-readable month snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_owners_csv, export_wallet_entries_csv};
pub use json::{export_month_json, import_from_json, MonthExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_month_yaml, import_from_yaml};
