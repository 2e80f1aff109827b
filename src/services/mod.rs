//! Service layer for rentshare
//!
//! Services sit on top of the storage layer and hold the business rules:
//! monthly aggregates, the distribution and variance engines, wallet
//! statements, owner management and sheet import.

pub mod aggregation;
pub mod allocation;
pub mod distribution;
pub mod import;
pub mod owner;
pub mod variance;
pub mod wallet;

pub use aggregation::{AggregationService, MonthSummary};
pub use allocation::{allocate, Allocation, OwnerAllocation};
pub use distribution::{DistributionReport, DistributionRow, DistributionService};
pub use import::{ImportService, ImportSummary, SheetKind};
pub use owner::{OwnerService, OwnerShare};
pub use variance::{VarianceReport, VarianceRow, VarianceService};
pub use wallet::{WalletLine, WalletService, WalletStatement};
