//! Owner repository
//!
//! Reads and writes the `owners` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::LedgerResult;
use crate::models::{Owner, OwnerId};

/// Repository for owner persistence
pub struct OwnerRepository<'c> {
    conn: &'c Connection,
}

fn owner_from_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get(0)?,
        name: row.get(1)?,
        share_held: row.get(2)?,
    })
}

impl<'c> OwnerRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// All owners ordered by id
    pub fn get_all(&self) -> LedgerResult<Vec<Owner>> {
        let mut stmt = self
            .conn
            .prepare("SELECT ownerId, name, shareHeld FROM owners ORDER BY ownerId")?;
        let owners = stmt
            .query_map([], owner_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(owners)
    }

    pub fn get(&self, id: OwnerId) -> LedgerResult<Option<Owner>> {
        let owner = self
            .conn
            .query_row(
                "SELECT ownerId, name, shareHeld FROM owners WHERE ownerId = ?1",
                params![id],
                owner_from_row,
            )
            .optional()?;
        Ok(owner)
    }

    /// Find an owner by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<Owner>> {
        let owner = self
            .conn
            .query_row(
                "SELECT ownerId, name, shareHeld FROM owners
                 WHERE lower(name) = lower(?1) ORDER BY ownerId LIMIT 1",
                params![name.trim()],
                owner_from_row,
            )
            .optional()?;
        Ok(owner)
    }

    pub fn insert(&self, owner: &Owner) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO owners (ownerId, name, shareHeld) VALUES (?1, ?2, ?3)",
            params![owner.id, owner.name, owner.share_held],
        )?;
        Ok(())
    }

    /// Change an owner's share; returns false when the owner doesn't exist
    pub fn update_share(&self, id: OwnerId, share_held: f64) -> LedgerResult<bool> {
        let changed = self.conn.execute(
            "UPDATE owners SET shareHeld = ?1 WHERE ownerId = ?2",
            params![share_held, id],
        )?;
        Ok(changed > 0)
    }

    /// Remove every owner; returns the number of rows deleted
    pub fn delete_all(&self) -> LedgerResult<usize> {
        Ok(self.conn.execute("DELETE FROM owners", [])?)
    }

    /// Next free owner id
    pub fn next_id(&self) -> LedgerResult<OwnerId> {
        let max: i64 = self
            .conn
            .query_row("SELECT COALESCE(MAX(ownerId), 0) FROM owners", [], |row| {
                row.get(0)
            })?;
        Ok(OwnerId::new(max + 1))
    }

    pub fn count(&self) -> LedgerResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM owners", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let storage = create_test_storage();
        let repo = storage.owners();

        repo.insert(&Owner::new(OwnerId::new(2), "Karim", 40.0)).unwrap();
        repo.insert(&Owner::new(OwnerId::new(1), "Amal", 60.0)).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Amal");

        let karim = repo.get(OwnerId::new(2)).unwrap().unwrap();
        assert_eq!(karim.share_held, 40.0);
        assert!(repo.get(OwnerId::new(9)).unwrap().is_none());
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let storage = create_test_storage();
        let repo = storage.owners();
        repo.insert(&Owner::new(OwnerId::new(1), "Amal", 60.0)).unwrap();

        assert!(repo.get_by_name("amal").unwrap().is_some());
        assert!(repo.get_by_name("Nour").unwrap().is_none());
    }

    #[test]
    fn test_update_share_and_next_id() {
        let storage = create_test_storage();
        let repo = storage.owners();
        assert_eq!(repo.next_id().unwrap(), OwnerId::new(1));

        repo.insert(&Owner::new(OwnerId::new(5), "Amal", 60.0)).unwrap();
        assert!(repo.update_share(OwnerId::new(5), 55.0).unwrap());
        assert!(!repo.update_share(OwnerId::new(6), 55.0).unwrap());
        assert_eq!(repo.get(OwnerId::new(5)).unwrap().unwrap().share_held, 55.0);
        assert_eq!(repo.next_id().unwrap(), OwnerId::new(6));

        assert_eq!(repo.delete_all().unwrap(), 1);
        assert_eq!(repo.count().unwrap(), 0);
    }
}
