//! Export module for PiggyBank
//!
//! Produces the versioned JSON envelope holding every collection, and the
//! native snapshot the importer keeps for rollback.

pub mod json;
pub mod snapshot;

pub use json::{export_all, export_to_writer, ExportData};
pub use snapshot::Snapshot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PiggyBankResult;
use crate::models::EntityKind;
use crate::storage::Store;

/// Envelope version written by this build
pub const CURRENT_VERSION: &str = "1.0.0";

/// Envelope versions accepted on import
pub const SUPPORTED_VERSIONS: [&str; 1] = [CURRENT_VERSION];

/// Per-kind entity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub accounts: usize,
    pub categories: usize,
    pub tags: usize,
    pub transactions: usize,
    pub budgets: usize,
}

impl EntityCounts {
    pub fn get(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Account => self.accounts,
            EntityKind::Category => self.categories,
            EntityKind::Tag => self.tags,
            EntityKind::Transaction => self.transactions,
            EntityKind::Budget => self.budgets,
        }
    }

    pub fn total(&self) -> usize {
        EntityKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

impl fmt::Display for EntityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accounts, {} categories, {} tags, {} transactions, {} budgets",
            self.accounts, self.categories, self.tags, self.transactions, self.budgets
        )
    }
}

/// Current number of entities of each kind in the store
pub fn data_stats<S: Store>(store: &S) -> PiggyBankResult<EntityCounts> {
    Ok(EntityCounts {
        accounts: store.count(EntityKind::Account)?,
        categories: store.count(EntityKind::Category)?,
        tags: store.count(EntityKind::Tag)?,
        transactions: store.count(EntityKind::Transaction)?,
        budgets: store.count(EntityKind::Budget)?,
    })
}

/// `piggybank-export-YYYY-MM-DD.json` for the given day
pub fn default_export_filename(date: DateTime<Utc>) -> String {
    format!("piggybank-export-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use crate::storage::Database;
    use chrono::TimeZone;

    #[test]
    fn test_default_filename() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(default_export_filename(date), "piggybank-export-2024-03-09.json");
    }

    #[test]
    fn test_data_stats() {
        let db = Database::in_memory();
        db.bulk_add(vec![Tag::new("a", "#000"), Tag::new("b", "#000")])
            .unwrap();

        let stats = data_stats(&db).unwrap();
        assert_eq!(stats.tags, 2);
        assert_eq!(stats.total(), 2);
        assert_eq!(
            stats.to_string(),
            "0 accounts, 0 categories, 2 tags, 0 transactions, 0 budgets"
        );
    }
}
