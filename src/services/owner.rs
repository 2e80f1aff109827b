//! Owner service
//!
//! Owner listing and edits with validation and audit logging.

use serde::Serialize;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Owner, OwnerId};
use crate::storage::Storage;

/// Service for owner management
pub struct OwnerService<'a> {
    storage: &'a Storage,
}

/// An owner with its normalized share of the building
#[derive(Debug, Clone, Serialize)]
pub struct OwnerShare {
    pub owner: Owner,
    /// share_held over the sum of all shares, 0 when every share is zero
    pub fraction: f64,
}

impl<'a> OwnerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> LedgerResult<Vec<Owner>> {
        self.storage.owners().get_all()
    }

    /// All owners with normalized shares
    pub fn list_with_shares(&self) -> LedgerResult<Vec<OwnerShare>> {
        let owners = self.list()?;
        let total: f64 = owners.iter().map(|o| o.share_held).sum();
        Ok(owners
            .into_iter()
            .map(|owner| {
                let fraction = if total == 0.0 {
                    0.0
                } else {
                    owner.share_held / total
                };
                OwnerShare { owner, fraction }
            })
            .collect())
    }

    /// Find an owner by id or name
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Owner>> {
        if let Ok(id) = identifier.parse::<OwnerId>() {
            if let Some(owner) = self.storage.owners().get(id)? {
                return Ok(Some(owner));
            }
        }
        self.storage.owners().get_by_name(identifier)
    }

    /// Like [`find`](Self::find) but a missing owner is an error
    pub fn require(&self, identifier: &str) -> LedgerResult<Owner> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::owner_not_found(identifier))
    }

    /// Add an owner, assigning the next free id when none is given
    pub fn add(&self, name: &str, share_held: f64, id: Option<OwnerId>) -> LedgerResult<Owner> {
        let name = name.trim();
        let owners = self.storage.owners();

        let id = match id {
            Some(id) => {
                if owners.get(id)?.is_some() {
                    return Err(LedgerError::Duplicate {
                        entity_type: "Owner",
                        identifier: id.to_string(),
                    });
                }
                id
            }
            None => owners.next_id()?,
        };

        if owners.get_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Owner",
                identifier: name.to_string(),
            });
        }

        let owner = Owner::new(id, name, share_held);
        owner
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        owners.insert(&owner)?;
        info!(owner = %owner.id, share = owner.share_held, "owner added");

        self.storage.log_create(
            EntityType::Owner,
            owner.id.to_string(),
            Some(owner.name.clone()),
            &owner,
        )?;

        Ok(owner)
    }

    /// Change an owner's share
    pub fn set_share(&self, id: OwnerId, share_held: f64) -> LedgerResult<Owner> {
        let before = self
            .storage
            .owners()
            .get(id)?
            .ok_or_else(|| LedgerError::owner_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.share_held = share_held;
        after
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.owners().update_share(id, share_held)?;
        info!(owner = %id, from = before.share_held, to = share_held, "share updated");

        self.storage.log_update(
            EntityType::Owner,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open_in_memory()
            .unwrap()
            .with_audit_log(AuditLogger::new(temp_dir.path().join("audit.log")));
        (temp_dir, storage)
    }

    #[test]
    fn test_add_and_find() {
        let (_temp, storage) = create_test_storage();
        let service = OwnerService::new(&storage);

        let amal = service.add("Amal", 60.0, None).unwrap();
        let karim = service.add("Karim", 40.0, Some(OwnerId::new(7))).unwrap();

        assert_eq!(amal.id, OwnerId::new(1));
        assert_eq!(karim.id, OwnerId::new(7));
        assert_eq!(service.find("7").unwrap().unwrap().name, "Karim");
        assert_eq!(service.find("amal").unwrap().unwrap().id, amal.id);
        assert!(service.require("Nour").unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_rejects_duplicates_and_bad_shares() {
        let (_temp, storage) = create_test_storage();
        let service = OwnerService::new(&storage);
        service.add("Amal", 60.0, None).unwrap();

        assert!(matches!(
            service.add("amal", 10.0, None),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(matches!(
            service.add("Nour", 10.0, Some(OwnerId::new(1))),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(service.add("Nour", -1.0, None).unwrap_err().is_validation());
        assert!(service.add("  ", 1.0, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_set_share_is_audited() {
        let (_temp, storage) = create_test_storage();
        let service = OwnerService::new(&storage);
        let amal = service.add("Amal", 60.0, None).unwrap();

        let updated = service.set_share(amal.id, 55.0).unwrap();
        assert_eq!(updated.share_held, 55.0);
        assert!(service.set_share(OwnerId::new(99), 1.0).unwrap_err().is_not_found());

        let entries = storage.audit_logger().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("share_held: 60.0 -> 55.0")
        );
    }

    #[test]
    fn test_list_with_shares() {
        let (_temp, storage) = create_test_storage();
        let service = OwnerService::new(&storage);
        service.add("Amal", 3.0, None).unwrap();
        service.add("Karim", 1.0, None).unwrap();

        let shares = service.list_with_shares().unwrap();
        assert_eq!(shares[0].fraction, 0.75);
        assert_eq!(shares[1].fraction, 0.25);
    }
}
