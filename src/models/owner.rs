//! Owner model
//!
//! A co-owner of the building. `share_held` is a weight, not a fraction:
//! shares are normalized against their sum whenever income is apportioned.

use serde::{Deserialize, Serialize};

use super::ids::OwnerId;

/// Validation errors for owners
#[derive(Debug, Clone, PartialEq)]
pub enum OwnerValidationError {
    EmptyName,
    NegativeShare(f64),
    NonFiniteShare,
}

impl std::fmt::Display for OwnerValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Owner name cannot be empty"),
            Self::NegativeShare(s) => write!(f, "Share held cannot be negative: {}", s),
            Self::NonFiniteShare => write!(f, "Share held must be a finite number"),
        }
    }
}

impl std::error::Error for OwnerValidationError {}

/// A building co-owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    pub share_held: f64,
}

impl Owner {
    /// Create a new owner
    pub fn new(id: OwnerId, name: impl Into<String>, share_held: f64) -> Self {
        Self {
            id,
            name: name.into(),
            share_held,
        }
    }

    /// Validate the owner
    pub fn validate(&self) -> Result<(), OwnerValidationError> {
        if self.name.trim().is_empty() {
            return Err(OwnerValidationError::EmptyName);
        }
        if !self.share_held.is_finite() {
            return Err(OwnerValidationError::NonFiniteShare);
        }
        if self.share_held < 0.0 {
            return Err(OwnerValidationError::NegativeShare(self.share_held));
        }
        Ok(())
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Owner::new(OwnerId::new(1), "Amal", 60.0).validate().is_ok());
        assert_eq!(
            Owner::new(OwnerId::new(1), "  ", 60.0).validate(),
            Err(OwnerValidationError::EmptyName)
        );
        assert!(matches!(
            Owner::new(OwnerId::new(1), "Amal", -1.0).validate(),
            Err(OwnerValidationError::NegativeShare(_))
        ));
        assert_eq!(
            Owner::new(OwnerId::new(1), "Amal", f64::NAN).validate(),
            Err(OwnerValidationError::NonFiniteShare)
        );
    }

    #[test]
    fn test_display() {
        let owner = Owner::new(OwnerId::new(4), "Karim", 25.0);
        assert_eq!(owner.to_string(), "Karim (#4)");
    }
}
