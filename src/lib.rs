//! rentshare - rent distribution ledger for co-owned buildings
//!
//! This library computes how a building's monthly rent income is split among
//! its co-owners. It forecasts each owner's net distribution from contracted
//! rent, compares it against rent actually collected, and keeps an
//! append-only wallet ledger per owner whose balances carry across months.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and settings
//! - `error`: Custom error types
//! - `models`: Core data models (owners, rents, expenses, wallet entries)
//! - `storage`: SQLite storage layer with per-table repositories
//! - `services`: Aggregation, distribution, variance, wallet and import logic
//! - `audit`: Append-only audit log
//! - `reports`: Month report and wallet ledger statements
//! - `export`: JSON, YAML and CSV export
//! - `display`: Terminal table formatting
//! - `cli`: Command handlers for the `rentshare` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use rentshare::config::{paths::LedgerPaths, settings::Settings};
//! use rentshare::models::Month;
//! use rentshare::services::DistributionService;
//! use rentshare::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(&paths)?;
//!
//! let month = Month::parse("2024-01")?;
//! let report = DistributionService::new(&storage, &settings)
//!     .generate_expected_distribution(&month)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
