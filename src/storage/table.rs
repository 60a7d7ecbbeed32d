//! In-memory collections
//!
//! A `Table` keeps rows in insertion order and enforces primary-key
//! uniqueness. `Tables` bundles the five collections so a whole store can be
//! cloned into a staging copy for a transaction.

use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Account, Budget, Category, Entity, EntityKind, Tag, Transaction};

/// One collection of entities keyed by ID
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Entity> Table<T> {
    pub fn from_rows(rows: Vec<T>) -> PiggyBankResult<Self> {
        let mut table = Self::default();
        table.bulk_add(rows)?;
        Ok(table)
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Insert a new row; fails if the ID is taken
    pub fn add(&mut self, row: T) -> PiggyBankResult<()> {
        if self.contains(row.id()) {
            return Err(duplicate::<T>(row.id()));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Insert many rows, all or nothing
    ///
    /// IDs must be new to the table and unique within `rows`.
    pub fn bulk_add(&mut self, rows: Vec<T>) -> PiggyBankResult<()> {
        let mut seen = std::collections::HashSet::with_capacity(rows.len());
        for row in &rows {
            let id = row.id();
            if self.contains(id) || !seen.insert(id) {
                return Err(duplicate::<T>(id));
            }
        }
        self.rows.extend(rows);
        Ok(())
    }

    /// Insert or replace by ID
    pub fn put(&mut self, row: T) {
        match self.rows.iter_mut().find(|existing| existing.id() == row.id()) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Remove by ID, returning the removed row
    pub fn delete(&mut self, id: T::Id) -> Option<T> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(index))
    }
}

fn duplicate<T: Entity>(id: T::Id) -> PiggyBankError {
    PiggyBankError::Duplicate {
        entity_type: T::KIND.label(),
        identifier: id.to_string(),
    }
}

/// All five collections of a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub accounts: Table<Account>,
    pub categories: Table<Category>,
    pub tags: Table<Tag>,
    pub transactions: Table<Transaction>,
    pub budgets: Table<Budget>,
}

impl Tables {
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Account => self.accounts.len(),
            EntityKind::Category => self.categories.len(),
            EntityKind::Tag => self.tags.len(),
            EntityKind::Transaction => self.transactions.len(),
            EntityKind::Budget => self.budgets.len(),
        }
    }

    pub fn clear(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Account => self.accounts.clear(),
            EntityKind::Category => self.categories.clear(),
            EntityKind::Tag => self.tags.clear(),
            EntityKind::Transaction => self.transactions.clear(),
            EntityKind::Budget => self.budgets.clear(),
        }
    }
}

/// Entities that live in one of the five tables
pub trait Stored: Entity {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

macro_rules! impl_stored {
    ($ty:ty, $field:ident) => {
        impl Stored for $ty {
            fn table(tables: &Tables) -> &Table<Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
                &mut tables.$field
            }
        }
    };
}

impl_stored!(Account, accounts);
impl_stored!(Category, categories);
impl_stored!(Tag, tags);
impl_stored!(Transaction, transactions);
impl_stored!(Budget, budgets);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicates() {
        let mut table = Table::default();
        let tag = Tag::new("a", "#000000");
        table.add(tag.clone()).unwrap();

        let err = table.add(tag).unwrap_err();
        assert!(matches!(err, PiggyBankError::Duplicate { entity_type: "Tag", .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bulk_add_is_all_or_nothing() {
        let mut table = Table::default();
        let first = Tag::new("a", "#000000");
        let second = Tag::new("b", "#000000");

        let result = table.bulk_add(vec![first.clone(), second, first]);
        assert!(result.is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_put_and_delete() {
        let mut table = Table::default();
        let mut tag = Tag::new("a", "#000000");
        table.put(tag.clone());

        tag.name = "renamed".into();
        table.put(tag.clone());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(tag.id).unwrap().name, "renamed");

        assert!(table.delete(tag.id).is_some());
        assert!(table.delete(tag.id).is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let tags: Vec<_> = ["c", "a", "b"].iter().map(|n| Tag::new(*n, "#fff")).collect();
        let table = Table::from_rows(tags).unwrap();
        let names: Vec<_> = table.rows().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_tables_count_and_clear() {
        let mut tables = Tables::default();
        Tag::table_mut(&mut tables).add(Tag::new("a", "#000")).unwrap();
        assert_eq!(tables.count(EntityKind::Tag), 1);

        tables.clear(EntityKind::Tag);
        assert_eq!(tables.count(EntityKind::Tag), 0);
    }
}
