//! Strongly-typed ID wrappers
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Store-assigned ids are integers; generation
//! runs are identified by a UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate integer ID newtype wrappers
macro_rules! define_int_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store id
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the underlying integer
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                // Accept the display prefix used in logs and exports
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_int_id!(OwnerId, "owner-");
define_int_id!(WalletEntryId, "wal-");

/// Identifies one distribution or variance run
///
/// Every wallet entry records the run that emitted it, so a month's ledger
/// can be traced back to the regeneration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a run ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_id_parse() {
        assert_eq!("7".parse::<OwnerId>().unwrap(), OwnerId::new(7));
        assert_eq!("owner-12".parse::<OwnerId>().unwrap(), OwnerId::new(12));
        assert!("abc".parse::<OwnerId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(OwnerId::new(3).to_string(), "3");
        assert_eq!(WalletEntryId::new(42).get(), 42);
    }

    #[test]
    fn test_run_id_round_trip() {
        let id = RunId::new();
        assert!(!id.as_uuid().is_nil());
        let parsed = RunId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert_ne!(RunId::new(), id);
    }
}
