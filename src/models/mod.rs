//! Core data models for rentshare
//!
//! This module contains the data structures that represent the co-ownership
//! domain: owners, monthly rents, expenses, allowances, forecast and variance
//! snapshots, and wallet entries.

pub mod distribution;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;
pub mod owner;
pub mod rent;
pub mod wallet;

pub use distribution::{
    AllocationStatus, ExpectedDistributionRecord, ExpenseTreatment, VarianceRecord,
};
pub use expense::{Expense, OwnerAllowance};
pub use ids::{OwnerId, RunId, WalletEntryId};
pub use money::{round2, Money};
pub use month::{Month, MonthParseError};
pub use owner::{Owner, OwnerValidationError};
pub use rent::RentRecord;
pub use wallet::{Direction, EntryType, NewWalletEntry, WalletEntry};
