//! Configuration module for rentshare
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence with environment overrides

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{AdminSettings, Settings};
