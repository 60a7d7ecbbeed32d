//! Tag service

use crate::audit::AuditEntry;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{EntityKind, Tag, TagId, Transaction};
use crate::storage::{Store, TransactionMode};

use super::{audit_update, require, required_text};

/// Service for tag management
pub struct TagService<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> TagService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new tag; names are unique ignoring case
    pub fn create(&self, name: &str, color: &str) -> PiggyBankResult<Tag> {
        let name = required_text(name, "Tag name")?;
        let color = required_text(color, "Tag color")?;
        let tag = Tag::new(name, color);

        self.store
            .transaction(TransactionMode::ReadWrite, &[EntityKind::Tag], |tx| {
                if tx
                    .get_all::<Tag>()?
                    .iter()
                    .any(|t| t.name.eq_ignore_ascii_case(&tag.name))
                {
                    return Err(PiggyBankError::Duplicate {
                        entity_type: "Tag",
                        identifier: tag.name.clone(),
                    });
                }
                tx.add(tag.clone())
            })?;

        self.store.audit(&AuditEntry::create(&tag));
        Ok(tag)
    }

    pub fn get(&self, id: TagId) -> PiggyBankResult<Option<Tag>> {
        self.store.get(id)
    }

    /// Find a tag by name (case-insensitive, leading `#` optional) or ID
    pub fn find(&self, identifier: &str) -> PiggyBankResult<Option<Tag>> {
        let identifier = identifier.trim();
        let name = identifier.trim_start_matches('#');
        let tags = self.list()?;

        if let Some(tag) = tags.iter().find(|t| t.name.eq_ignore_ascii_case(name)) {
            return Ok(Some(tag.clone()));
        }

        Ok(identifier
            .parse::<TagId>()
            .ok()
            .and_then(|id| tags.into_iter().find(|t| t.id == id)))
    }

    pub fn list(&self) -> PiggyBankResult<Vec<Tag>> {
        self.store.get_all()
    }

    /// Rename or recolour a tag
    pub fn update(
        &self,
        id: TagId,
        name: Option<&str>,
        color: Option<&str>,
    ) -> PiggyBankResult<Tag> {
        let (before, after) =
            self.store
                .transaction(TransactionMode::ReadWrite, &[EntityKind::Tag], |tx| {
                    let before: Tag = require(tx, id)?;
                    let mut tag = before.clone();
                    if let Some(name) = name {
                        tag.name = required_text(name, "Tag name")?;
                    }
                    if let Some(color) = color {
                        tag.color = required_text(color, "Tag color")?;
                    }
                    tag.touch();
                    tx.put(tag.clone())?;
                    Ok((before, tag))
                })?;

        audit_update(self.store, &before, &after);
        Ok(after)
    }

    /// Delete a tag and drop it from every transaction that carries it
    pub fn delete(&self, id: TagId) -> PiggyBankResult<Tag> {
        let tag = self.store.transaction(
            TransactionMode::ReadWrite,
            &[EntityKind::Tag, EntityKind::Transaction],
            |tx| {
                let tag: Tag = require(tx, id)?;
                for mut transaction in tx.get_all::<Transaction>()? {
                    if transaction.has_tag(id) {
                        transaction.tag_ids.retain(|t| *t != id);
                        transaction.touch();
                        tx.put(transaction)?;
                    }
                }
                tx.delete::<Tag>(id)?;
                Ok(tag)
            },
        )?;

        self.store.audit(&AuditEntry::delete(&tag));
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, CategoryId, TransactionType};
    use crate::storage::Database;
    use chrono::Utc;

    #[test]
    fn test_create_and_find() {
        let db = Database::in_memory();
        let service = TagService::new(&db);

        let tag = service.create("Vacation", "#00ff00").unwrap();
        assert_eq!(service.find("#vacation").unwrap().unwrap().id, tag.id);
        assert!(matches!(
            service.create("VACATION", "#000000"),
            Err(PiggyBankError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_update_tag() {
        let db = Database::in_memory();
        let service = TagService::new(&db);
        let tag = service.create("Work", "#000000").unwrap();

        let updated = service.update(tag.id, None, Some("#ffffff")).unwrap();
        assert_eq!(updated.name, "Work");
        assert_eq!(updated.color, "#ffffff");
        assert!(service.update(tag.id, Some("  "), None).is_err());
    }

    #[test]
    fn test_delete_strips_tag_from_transactions() {
        let db = Database::in_memory();
        let service = TagService::new(&db);
        let keep = service.create("keep", "#000000").unwrap();
        let gone = service.create("gone", "#000000").unwrap();

        let mut transaction = Transaction::new(
            AccountId::new(),
            CategoryId::new(),
            TransactionType::Expense,
            1.0,
            Utc::now(),
            "Shop",
        );
        transaction.tag_ids = vec![keep.id, gone.id];
        db.bulk_add(vec![transaction.clone()]).unwrap();

        service.delete(gone.id).unwrap();

        let stored = db.get::<Transaction>(transaction.id).unwrap().unwrap();
        assert_eq!(stored.tag_ids, vec![keep.id]);
        assert_eq!(service.list().unwrap().len(), 1);
    }
}
