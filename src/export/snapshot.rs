//! Native copy of every collection

use crate::error::PiggyBankResult;
use crate::models::{Account, Budget, Category, EntityKind, Tag, Transaction};
use crate::storage::{Store, TransactionMode, UnitOfWork};

use super::EntityCounts;

/// All five collections with native (typed) values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

impl Snapshot {
    /// Read every collection in one read-only transaction
    pub fn read<S: Store>(store: &S) -> PiggyBankResult<Self> {
        store.transaction(TransactionMode::ReadOnly, &EntityKind::ALL, |tx| {
            Ok(Self {
                accounts: tx.get_all()?,
                categories: tx.get_all()?,
                tags: tx.get_all()?,
                transactions: tx.get_all()?,
                budgets: tx.get_all()?,
            })
        })
    }

    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            accounts: self.accounts.len(),
            categories: self.categories.len(),
            tags: self.tags.len(),
            transactions: self.transactions.len(),
            budgets: self.budgets.len(),
        }
    }

    /// Replace every collection with this snapshot's contents
    ///
    /// Clears all five, then inserts accounts, categories, tags,
    /// transactions and budgets in that order.
    pub fn replace_into(self, tx: &mut UnitOfWork<'_>) -> PiggyBankResult<()> {
        for kind in EntityKind::ALL {
            tx.clear_kind(kind)?;
        }
        tx.bulk_add(self.accounts)?;
        tx.bulk_add(self.categories)?;
        tx.bulk_add(self.tags)?;
        tx.bulk_add(self.transactions)?;
        tx.bulk_add(self.budgets)?;
        Ok(())
    }
}
