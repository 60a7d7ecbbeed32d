//! The view of the store handed to a transaction body

use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::EntityKind;

use super::table::{Stored, Tables};

/// Whether a transaction may modify its collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    ReadOnly,
    ReadWrite,
}

enum Access<'a> {
    Shared(&'a Tables),
    Exclusive(&'a mut Tables),
}

/// Collection operations available inside [`Store::transaction`]
///
/// Only the collections named when the transaction was opened are
/// reachable. Writes in a read-only transaction fail.
///
/// [`Store::transaction`]: super::Store::transaction
pub struct UnitOfWork<'a> {
    access: Access<'a>,
    scope: &'a [EntityKind],
    written: Vec<EntityKind>,
}

impl<'a> UnitOfWork<'a> {
    pub fn read_only(tables: &'a Tables, scope: &'a [EntityKind]) -> Self {
        Self {
            access: Access::Shared(tables),
            scope,
            written: Vec::new(),
        }
    }

    pub fn read_write(tables: &'a mut Tables, scope: &'a [EntityKind]) -> Self {
        Self {
            access: Access::Exclusive(tables),
            scope,
            written: Vec::new(),
        }
    }

    pub fn mode(&self) -> TransactionMode {
        match self.access {
            Access::Shared(_) => TransactionMode::ReadOnly,
            Access::Exclusive(_) => TransactionMode::ReadWrite,
        }
    }

    /// Collections modified so far, in first-write order
    pub fn written(&self) -> &[EntityKind] {
        &self.written
    }

    pub fn get_all<T: Stored>(&self) -> PiggyBankResult<Vec<T>> {
        Ok(T::table(self.tables(T::KIND)?).rows().to_vec())
    }

    pub fn get<T: Stored>(&self, id: T::Id) -> PiggyBankResult<Option<T>> {
        Ok(T::table(self.tables(T::KIND)?).get(id).cloned())
    }

    pub fn count(&self, kind: EntityKind) -> PiggyBankResult<usize> {
        Ok(self.tables(kind)?.count(kind))
    }

    pub fn clear<T: Stored>(&mut self) -> PiggyBankResult<()> {
        self.clear_kind(T::KIND)
    }

    /// Empty a collection by kind
    pub fn clear_kind(&mut self, kind: EntityKind) -> PiggyBankResult<()> {
        self.tables_mut(kind)?.clear(kind);
        Ok(())
    }

    /// Insert a new entity; fails on a duplicate ID
    pub fn add<T: Stored>(&mut self, item: T) -> PiggyBankResult<()> {
        T::table_mut(self.tables_mut(T::KIND)?).add(item)
    }

    /// Insert many new entities; nothing is inserted if any ID is taken
    pub fn bulk_add<T: Stored>(&mut self, items: Vec<T>) -> PiggyBankResult<()> {
        T::table_mut(self.tables_mut(T::KIND)?).bulk_add(items)
    }

    /// Insert or replace by ID
    pub fn put<T: Stored>(&mut self, item: T) -> PiggyBankResult<()> {
        T::table_mut(self.tables_mut(T::KIND)?).put(item);
        Ok(())
    }

    /// Remove by ID, returning what was removed
    pub fn delete<T: Stored>(&mut self, id: T::Id) -> PiggyBankResult<Option<T>> {
        Ok(T::table_mut(self.tables_mut(T::KIND)?).delete(id))
    }

    fn check_scope(&self, kind: EntityKind) -> PiggyBankResult<()> {
        if self.scope.contains(&kind) {
            Ok(())
        } else {
            Err(PiggyBankError::Storage(format!(
                "Collection {} is not part of this transaction",
                kind.collection()
            )))
        }
    }

    fn tables(&self, kind: EntityKind) -> PiggyBankResult<&Tables> {
        self.check_scope(kind)?;
        Ok(match &self.access {
            Access::Shared(tables) => *tables,
            Access::Exclusive(tables) => &**tables,
        })
    }

    fn tables_mut(&mut self, kind: EntityKind) -> PiggyBankResult<&mut Tables> {
        self.check_scope(kind)?;
        let Access::Exclusive(tables) = &mut self.access else {
            return Err(PiggyBankError::Storage(format!(
                "Cannot modify {} in a read-only transaction",
                kind.collection()
            )));
        };
        if !self.written.contains(&kind) {
            self.written.push(kind);
        }
        Ok(&mut **tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, Tag};

    #[test]
    fn test_scope_is_enforced() {
        let mut tables = Tables::default();
        let scope = [EntityKind::Tag];
        let mut uow = UnitOfWork::read_write(&mut tables, &scope);

        uow.add(Tag::new("a", "#000")).unwrap();
        let err = uow
            .add(Account::new("Checking", AccountType::Checking, "USD"))
            .unwrap_err();
        assert!(err.to_string().contains("accounts"));
        assert_eq!(uow.written(), &[EntityKind::Tag]);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let tables = Tables::default();
        let scope = EntityKind::ALL;
        let mut uow = UnitOfWork::read_only(&tables, &scope);

        assert_eq!(uow.mode(), TransactionMode::ReadOnly);
        assert!(uow.get_all::<Tag>().unwrap().is_empty());
        assert!(uow.clear::<Tag>().is_err());
        assert!(uow.written().is_empty());
    }
}
