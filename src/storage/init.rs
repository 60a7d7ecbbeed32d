//! Storage initialization
//!
//! Handles first-run setup: directories, settings file and the built-in
//! categories.

use tracing::info;

use crate::audit::AuditEntry;
use crate::config::paths::PiggyBankPaths;
use crate::config::settings::Settings;
use crate::error::PiggyBankResult;
use crate::models::{default_categories, Category, EntityKind};

use super::database::Database;
use super::unit_of_work::TransactionMode;
use super::Store;

/// Initialize storage for a fresh installation
///
/// Writes default settings if none exist and seeds the default categories
/// when the categories collection has never been written. Returns the
/// number of categories seeded.
pub fn initialize_storage(paths: &PiggyBankPaths) -> PiggyBankResult<usize> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    if paths.collection_file(EntityKind::Category).exists() {
        return Ok(0);
    }

    let db = Database::open(paths.clone())?;
    seed_default_categories(&db)
}

/// Add the built-in categories to a store that has none
pub fn seed_default_categories<S: Store>(store: &S) -> PiggyBankResult<usize> {
    let seeded = store.transaction(
        TransactionMode::ReadWrite,
        &[EntityKind::Category],
        |tx| {
            if tx.count(EntityKind::Category)? > 0 {
                return Ok(Vec::new());
            }
            let defaults = default_categories();
            tx.bulk_add(defaults.clone())?;
            Ok(defaults)
        },
    )?;

    for category in &seeded {
        store.audit(&AuditEntry::create::<Category>(category));
    }

    if !seeded.is_empty() {
        info!(count = seeded.len(), "seeded default categories");
    }

    Ok(seeded.len())
}
