//! Audit logging for rentshare
//!
//! Owner edits, sheet imports and month regenerations are recorded in an
//! append-only JSON-lines log next to the database.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
