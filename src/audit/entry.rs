//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Entity, EntityKind};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
    /// All collections were replaced from an export file
    Import,
    /// All collections were emptied
    Clear,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Clear => write!(f, "CLEAR"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Kind of entity affected; absent for whole-store operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityKind>,

    /// ID of the affected entity; absent for whole-store operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Human-readable description of the entity (e.g., account name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// The entity before the operation (updates and deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// The entity after the operation (creates and updates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable summary: field changes, or import outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn for_entity<T: Entity>(operation: Operation, entity: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type: Some(T::KIND),
            entity_id: Some(entity.id().to_string()),
            entity_name: Some(entity.display_name()),
            before: None,
            after: None,
            summary: None,
        }
    }

    fn for_store(operation: Operation, summary: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type: None,
            entity_id: None,
            entity_name: None,
            before: None,
            after: None,
            summary: Some(summary),
        }
    }

    /// Entry for a newly created entity
    pub fn create<T: Entity>(entity: &T) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::for_entity(Operation::Create, entity)
        }
    }

    /// Entry for a modified entity, with a summary of what changed
    pub fn update<T: Entity>(before: &T, after: &T, summary: Option<String>) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            summary,
            ..Self::for_entity(Operation::Update, after)
        }
    }

    /// Entry for a removed entity
    pub fn delete<T: Entity>(entity: &T) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::for_entity(Operation::Delete, entity)
        }
    }

    /// Entry for a full-store import attempt
    pub fn import(summary: impl Into<String>) -> Self {
        Self::for_store(Operation::Import, summary.into())
    }

    /// Entry for emptying every collection
    pub fn clear(summary: impl Into<String>) -> Self {
        Self::for_store(Operation::Clear, summary.into())
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation
        );

        if let Some(kind) = &self.entity_type {
            output.push_str(&format!(" {}", kind));
        }

        if let Some(id) = &self.entity_id {
            output.push_str(&format!(" {}", id));
        }

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(summary) = &self.summary {
            output.push_str(&format!("\n  {}", summary));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, Tag};

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Import.to_string(), "IMPORT");
        assert_eq!(Operation::Clear.to_string(), "CLEAR");
    }

    #[test]
    fn test_create_entry() {
        let account = Account::new("Checking", AccountType::Checking, "USD");
        let entry = AuditEntry::create(&account);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, Some(EntityKind::Account));
        assert_eq!(entry.entity_id, Some(account.id.to_string()));
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_and_delete_entries() {
        let before = Tag::new("trip", "#111111");
        let mut after = before.clone();
        after.name = "travel".into();

        let update = AuditEntry::update(&before, &after, Some("name changed".into()));
        assert_eq!(update.entity_name.as_deref(), Some("travel"));
        assert!(update.before.is_some() && update.after.is_some());

        let delete = AuditEntry::delete(&after);
        assert_eq!(delete.operation, Operation::Delete);
        assert!(delete.after.is_none());
    }

    #[test]
    fn test_store_entry_serialization() {
        let entry = AuditEntry::import("2 accounts");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("entity_type"));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operation, Operation::Import);
        assert_eq!(back.summary.as_deref(), Some("2 accounts"));
    }

    #[test]
    fn test_human_readable_format() {
        let tag = Tag::new("groceries", "#00ff00");
        let formatted = AuditEntry::create(&tag).format_human_readable();
        assert!(formatted.contains("CREATE"));
        assert!(formatted.contains("Tag"));
        assert!(formatted.contains("(groceries)"));
    }
}
