//! Reports module for rentshare
//!
//! Read-only reports over the stored snapshots: the month report (forecast
//! joined with variance) and per-owner wallet ledgers.

pub mod month_report;
pub mod wallet_ledger;

pub use month_report::{MonthReport, MonthReportRow};
pub use wallet_ledger::WalletLedgerReport;
