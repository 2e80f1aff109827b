//! Audit entry data structures
//!
//! Defines the operations and entities that are audited, and the entry
//! format written to the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A month's snapshot was wiped and rebuilt
    Regenerate,
    /// A sheet was loaded into the store
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Regenerate => write!(f, "REGENERATE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Owner,
    ExpectedDistribution,
    VarianceReport,
    Sheet,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Owner => write!(f, "Owner"),
            EntityType::ExpectedDistribution => write!(f, "ExpectedDistribution"),
            EntityType::VarianceReport => write!(f, "VarianceReport"),
            EntityType::Sheet => write!(f, "Sheet"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Owner id, month, or sheet name depending on the entity
    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// State before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// State after the operation, or the run summary for regenerations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// Record an update; the diff summary is derived from the two states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => field_changes(b, a),
            _ => None,
        };
        Self {
            entity_name,
            before,
            after,
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id.into())
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// Record a month regeneration with its run summary
    pub fn regenerate<T: Serialize>(
        entity_type: EntityType,
        month: impl Into<String>,
        summary: &T,
        note: impl Into<String>,
    ) -> Self {
        Self {
            after: serde_json::to_value(summary).ok(),
            diff_summary: Some(note.into()),
            ..Self::new(Operation::Regenerate, entity_type, month.into())
        }
    }

    /// Record a sheet import
    pub fn import<T: Serialize>(
        sheet: impl Into<String>,
        source: Option<String>,
        summary: &T,
    ) -> Self {
        Self {
            entity_name: source,
            after: serde_json::to_value(summary).ok(),
            ..Self::new(Operation::Import, EntityType::Sheet, sheet.into())
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  {}", diff));
        }

        output
    }
}

/// Top-level field changes between two JSON objects, `None` when equal
fn field_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(b), Value::Object(a)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", before, after));
    };

    let mut changes: Vec<String> = b
        .iter()
        .filter_map(|(key, old)| match a.get(key) {
            Some(new) if new != old => Some(format!("{}: {} -> {}", key, old, new)),
            Some(_) => None,
            None => Some(format!("{}: {} -> (removed)", key, old)),
        })
        .collect();
    changes.extend(
        a.iter()
            .filter(|(key, _)| !b.contains_key(*key))
            .map(|(key, new)| format!("{}: (added) -> {}", key, new)),
    );

    (!changes.is_empty()).then(|| changes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Regenerate.to_string(), "REGENERATE");
        assert_eq!(Operation::Import.to_string(), "IMPORT");
    }

    #[test]
    fn test_update_entry_diff() {
        let before = json!({"name": "Amal", "share_held": 60.0});
        let after = json!({"name": "Amal", "share_held": 55.0});

        let entry = AuditEntry::update(
            EntityType::Owner,
            "1",
            Some("Amal".to_string()),
            &before,
            &after,
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("share_held: 60.0 -> 55.0")
        );
    }

    #[test]
    fn test_update_without_changes_has_no_diff() {
        let same = json!({"name": "Amal"});
        let entry = AuditEntry::update(EntityType::Owner, "1", None, &same, &same);
        assert!(entry.diff_summary.is_none());
    }

    #[test]
    fn test_regenerate_entry() {
        let summary = json!({"owners": 2, "wallet_entries": 4});
        let entry = AuditEntry::regenerate(
            EntityType::ExpectedDistribution,
            "2024-01",
            &summary,
            "pool_inclusive",
        );

        assert_eq!(entry.operation, Operation::Regenerate);
        assert_eq!(entry.entity_id, "2024-01");
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(summary));
    }

    #[test]
    fn test_serialization() {
        let entry =
            AuditEntry::import("units_rents", Some("rents.csv".into()), &json!({"rows": 3}));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"operation\":\"import\""));
        assert!(json.contains("\"entity_type\":\"sheet\""));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operation, Operation::Import);
        assert_eq!(back.entity_name.as_deref(), Some("rents.csv"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::Owner,
            "3",
            Some("Karim".to_string()),
            &json!({"name": "Karim"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Owner 3 (Karim)"));
    }
}
