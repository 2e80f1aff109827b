//! Custom error types for rentshare
//!
//! This module defines the error hierarchy for the ledger using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// A single problem found while validating an import sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// 1-based data row, or `None` for header-level problems
    pub row: Option<usize>,
    /// Canonical field the problem relates to
    pub field: String,
    /// What went wrong
    pub message: String,
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {}: {}: {}", row, self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// The main error type for rentshare operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Store-level failures (connectivity, constraint violation)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Sheet import rejected during validation
    #[error("Import error in sheet '{sheet}': {}", format_issues(.issues))]
    Import {
        sheet: String,
        issues: Vec<ImportIssue>,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

fn format_issues(issues: &[ImportIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LedgerError {
    /// Create a "not found" error for owners
    pub fn owner_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Owner",
            identifier: identifier.into(),
        }
    }

    /// Create an import error with a single header-level issue
    pub fn import_header(sheet: impl Into<String>, field: &str, message: impl Into<String>) -> Self {
        Self::Import {
            sheet: sheet.into(),
            issues: vec![ImportIssue {
                row: None,
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Io(format!("CSV: {}", err))
    }
}

/// Result type alias for rentshare operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::owner_not_found("7");
        assert_eq!(err.to_string(), "Owner not found: 7");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_import_error_lists_issues() {
        let err = LedgerError::Import {
            sheet: "expenses".into(),
            issues: vec![
                ImportIssue {
                    row: None,
                    field: "amount".into(),
                    message: "missing required column".into(),
                },
                ImportIssue {
                    row: Some(3),
                    field: "chargedowner".into(),
                    message: "not an integer".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Import error in sheet 'expenses': amount: missing required column; row 3: chargedowner: not an integer"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }

    #[test]
    fn test_from_sqlite_error() {
        let err: LedgerError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
