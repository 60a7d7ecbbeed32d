//! Category service
//!
//! Provides business logic for category management. The built-in
//! categories can be renamed or recoloured but never deleted.

use tracing::warn;

use crate::audit::AuditEntry;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Budget, Category, CategoryId, CategoryType, EntityKind, Transaction};
use crate::storage::init::seed_default_categories;
use crate::storage::{Store, TransactionMode};

use super::{audit_update, require, required_text};

/// Service for category management
pub struct CategoryService<'a, S: Store> {
    store: &'a S,
}

/// Fields that may change on an existing category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl<'a, S: Store> CategoryService<'a, S> {
    /// Create a new category service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a user category
    pub fn create(
        &self,
        name: &str,
        category_type: CategoryType,
        color: &str,
        icon: Option<&str>,
    ) -> PiggyBankResult<Category> {
        let name = required_text(name, "Category name")?;
        let mut category = Category::new(name, category_type, color.trim());
        category.icon = icon.map(str::to_string);
        category
            .validate()
            .map_err(|e| PiggyBankError::Validation(e.to_string()))?;

        self.store
            .transaction(TransactionMode::ReadWrite, &[EntityKind::Category], |tx| {
                tx.add(category.clone())
            })?;

        self.store.audit(&AuditEntry::create(&category));
        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> PiggyBankResult<Option<Category>> {
        self.store.get(id)
    }

    /// Find a category by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> PiggyBankResult<Option<Category>> {
        let identifier = identifier.trim();
        let categories = self.list()?;

        if let Some(category) = categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(category.clone()));
        }

        Ok(identifier
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| categories.into_iter().find(|c| c.id == id)))
    }

    /// List all categories
    pub fn list(&self) -> PiggyBankResult<Vec<Category>> {
        self.store.get_all()
    }

    /// List categories of one type
    pub fn list_by_type(&self, category_type: CategoryType) -> PiggyBankResult<Vec<Category>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.category_type == category_type)
            .collect())
    }

    /// Update a category
    pub fn update(&self, id: CategoryId, changes: CategoryUpdate) -> PiggyBankResult<Category> {
        let (before, after) =
            self.store
                .transaction(TransactionMode::ReadWrite, &[EntityKind::Category], |tx| {
                    let before: Category = require(tx, id)?;
                    let mut category = before.clone();

                    if let Some(name) = &changes.name {
                        category.name = required_text(name, "Category name")?;
                    }
                    if let Some(color) = &changes.color {
                        category.color = color.trim().to_string();
                    }
                    if let Some(icon) = &changes.icon {
                        category.icon = Some(icon.clone());
                    }

                    category
                        .validate()
                        .map_err(|e| PiggyBankError::Validation(e.to_string()))?;
                    category.touch();
                    tx.put(category.clone())?;
                    Ok((before, category))
                })?;

        audit_update(self.store, &before, &after);
        Ok(after)
    }

    /// Delete a category
    ///
    /// Returns `false` without touching the store for a default category.
    /// Categories still used by transactions or budgets cannot be deleted.
    pub fn delete(&self, id: CategoryId) -> PiggyBankResult<bool> {
        let removed = self.store.transaction(
            TransactionMode::ReadWrite,
            &[EntityKind::Category, EntityKind::Transaction, EntityKind::Budget],
            |tx| {
                let category: Category = require(tx, id)?;
                if category.is_default {
                    return Ok(None);
                }

                let transactions = tx
                    .get_all::<Transaction>()?
                    .iter()
                    .filter(|t| t.category_id == id)
                    .count();
                let budgets = tx
                    .get_all::<Budget>()?
                    .iter()
                    .filter(|b| b.category_id == id)
                    .count();
                if transactions + budgets > 0 {
                    return Err(PiggyBankError::Validation(format!(
                        "Category '{}' is used by {} transaction(s) and {} budget(s)",
                        category.name, transactions, budgets
                    )));
                }

                tx.delete::<Category>(id)?;
                Ok(Some(category))
            },
        )?;

        match removed {
            Some(category) => {
                self.store.audit(&AuditEntry::delete(&category));
                Ok(true)
            }
            None => {
                warn!(category = %id, "refused to delete default category");
                Ok(false)
            }
        }
    }

    /// Add the built-in categories if the store has none
    pub fn seed_defaults(&self) -> PiggyBankResult<usize> {
        seed_default_categories(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetPeriod;
    use crate::storage::Database;
    use chrono::Utc;

    #[test]
    fn test_create_is_never_default() {
        let db = Database::in_memory();
        let service = CategoryService::new(&db);

        let category = service
            .create("Pets", CategoryType::Expense, "#123456", Some("🐶"))
            .unwrap();
        assert!(!category.is_default);
        assert_eq!(category.icon.as_deref(), Some("🐶"));
        assert!(service
            .create("", CategoryType::Expense, "#123456", None)
            .is_err());
    }

    #[test]
    fn test_list_by_type() {
        let db = Database::in_memory();
        let service = CategoryService::new(&db);
        assert_eq!(service.seed_defaults().unwrap(), 16);

        assert_eq!(service.list_by_type(CategoryType::Income).unwrap().len(), 4);
        assert_eq!(service.list_by_type(CategoryType::Expense).unwrap().len(), 12);
    }

    #[test]
    fn test_default_categories_cannot_be_deleted() {
        let db = Database::in_memory();
        let service = CategoryService::new(&db);
        service.seed_defaults().unwrap();

        let housing = service.find("housing").unwrap().unwrap();
        assert!(housing.is_default);
        assert!(!service.delete(housing.id).unwrap());
        assert!(service.get(housing.id).unwrap().is_some());
        assert_eq!(service.list().unwrap().len(), 16);
    }

    #[test]
    fn test_delete_user_category() {
        let db = Database::in_memory();
        let service = CategoryService::new(&db);
        let category = service
            .create("Pets", CategoryType::Expense, "#123456", None)
            .unwrap();

        assert!(service.delete(category.id).unwrap());
        assert!(service.get(category.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_refuses_category_in_use() {
        let db = Database::in_memory();
        let service = CategoryService::new(&db);
        let category = service
            .create("Pets", CategoryType::Expense, "#123456", None)
            .unwrap();
        db.bulk_add(vec![Budget::new(
            category.id,
            50.0,
            BudgetPeriod::Monthly,
            Utc::now(),
        )])
        .unwrap();

        assert!(service.delete(category.id).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_category() {
        let db = Database::in_memory();
        let service = CategoryService::new(&db);
        let category = service
            .create("Pets", CategoryType::Expense, "#123456", None)
            .unwrap();

        let updated = service
            .update(
                category.id,
                CategoryUpdate {
                    name: Some("Animals".into()),
                    ..CategoryUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Animals");
        assert_eq!(updated.color, "#123456");
    }
}
