//! Storage layer for PiggyBank
//!
//! Code above this layer talks to a [`Store`]: per-collection reads plus a
//! closure-based transaction over any set of collections. [`Database`] is
//! the shipped implementation, backed by one JSON file per collection or
//! kept purely in memory.

pub mod database;
pub mod file_io;
pub mod init;
pub mod table;
pub mod unit_of_work;

pub use database::Database;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use table::{Stored, Table, Tables};
pub use unit_of_work::{TransactionMode, UnitOfWork};

use crate::audit::AuditEntry;
use crate::error::PiggyBankResult;
use crate::models::EntityKind;

/// A handle to the five collections
///
/// `transaction` is the only atomicity guarantee: either everything the
/// closure did is committed, or (when it returns an error) nothing is.
pub trait Store {
    /// Every entity of one kind, in insertion order
    fn get_all<T: Stored>(&self) -> PiggyBankResult<Vec<T>>;

    /// Number of entities of one kind
    fn count(&self, kind: EntityKind) -> PiggyBankResult<usize>;

    /// Run `work` against the named collections as one unit
    fn transaction<R, F>(
        &self,
        mode: TransactionMode,
        scope: &[EntityKind],
        work: F,
    ) -> PiggyBankResult<R>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> PiggyBankResult<R>;

    fn get<T: Stored>(&self, id: T::Id) -> PiggyBankResult<Option<T>> {
        self.transaction(TransactionMode::ReadOnly, &[T::KIND], |tx| tx.get::<T>(id))
    }

    fn clear<T: Stored>(&self) -> PiggyBankResult<()> {
        self.transaction(TransactionMode::ReadWrite, &[T::KIND], |tx| tx.clear::<T>())
    }

    fn bulk_add<T: Stored>(&self, items: Vec<T>) -> PiggyBankResult<()> {
        self.transaction(TransactionMode::ReadWrite, &[T::KIND], |tx| {
            tx.bulk_add(items)
        })
    }

    /// Record an audit entry; stores without an audit log ignore it
    fn audit(&self, _entry: &AuditEntry) {}
}
