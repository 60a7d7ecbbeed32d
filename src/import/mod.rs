//! Import module for PiggyBank
//!
//! An import replaces the whole store with the contents of an export
//! envelope. It moves through validating, backing up and writing; a failure
//! while writing puts the backup back through the same transaction
//! primitive before the failure is reported.

pub mod result;

pub use result::ImportResult;

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::audit::AuditEntry;
use crate::dates;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::export::{EntityCounts, Snapshot};
use crate::models::{Entity, EntityKind};
use crate::storage::{Store, TransactionMode};
use crate::validation::envelope::records;
use crate::validation::{format_validation_errors, validate_export_data};

/// Service for whole-store imports
pub struct ImportService<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> ImportService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Import an export file from disk
    pub fn import_file(&self, path: impl AsRef<Path>) -> ImportResult {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => self.import_json(&text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read import file");
                ImportResult::failed_with("Failed to read file")
            }
        }
    }

    /// Import export JSON held in memory
    pub fn import_json(&self, text: &str) -> ImportResult {
        match serde_json::from_str::<Value>(text) {
            Ok(data) => self.import_value(&data),
            Err(e) => {
                warn!(error = %e, "import payload is not valid JSON");
                ImportResult::failed_with(e.to_string())
            }
        }
    }

    /// Import an already parsed envelope
    pub fn import_value(&self, data: &Value) -> ImportResult {
        let validation = validate_export_data(data);
        if !validation.valid {
            let formatted = format_validation_errors(&validation.errors);
            warn!(errors = validation.errors.len(), "rejected import payload");
            self.store
                .audit(&AuditEntry::import(format!("Rejected: {}", formatted)));
            return ImportResult::failed(
                format!("Validation failed: {}", formatted),
                validation.messages(),
            );
        }

        let backup = match Snapshot::read(self.store) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "could not snapshot data before import");
                return ImportResult::failed_with(e.to_string());
            }
        };
        debug!(existing = %backup.counts(), "took pre-import snapshot");

        match self.write(data) {
            Ok(imported) => {
                info!(%imported, "imported data");
                self.store
                    .audit(&AuditEntry::import(format!("Imported {}", imported)));
                ImportResult::succeeded(imported)
            }
            Err(e) => self.roll_back(backup, e),
        }
    }

    /// Empty every collection in one transaction, returning what was removed
    pub fn clear_all(&self) -> PiggyBankResult<EntityCounts> {
        let removed = self
            .store
            .transaction(TransactionMode::ReadWrite, &EntityKind::ALL, |tx| {
                let counts = EntityCounts {
                    accounts: tx.count(EntityKind::Account)?,
                    categories: tx.count(EntityKind::Category)?,
                    tags: tx.count(EntityKind::Tag)?,
                    transactions: tx.count(EntityKind::Transaction)?,
                    budgets: tx.count(EntityKind::Budget)?,
                };
                for kind in EntityKind::ALL {
                    tx.clear_kind(kind)?;
                }
                Ok(counts)
            })?;

        info!(%removed, "cleared all data");
        self.store
            .audit(&AuditEntry::clear(format!("Removed {}", removed)));
        Ok(removed)
    }

    fn write(&self, data: &Value) -> PiggyBankResult<EntityCounts> {
        let incoming = decode_snapshot(data)?;
        let imported = incoming.counts();
        self.store
            .transaction(TransactionMode::ReadWrite, &EntityKind::ALL, |tx| {
                incoming.replace_into(tx)
            })?;
        Ok(imported)
    }

    fn roll_back(&self, backup: Snapshot, cause: PiggyBankError) -> ImportResult {
        let message = cause.to_string();
        warn!(error = %cause, "import failed, restoring previous data");

        let mut result = ImportResult::failed_with(message.clone());
        let restored = self
            .store
            .transaction(TransactionMode::ReadWrite, &EntityKind::ALL, |tx| {
                backup.replace_into(tx)
            });

        match restored {
            Ok(()) => debug!("restored pre-import snapshot"),
            Err(e) => {
                error!(error = %e, "rollback failed, stored data may be incomplete");
                result.data_loss_risk = true;
                result.rollback_error = Some(e.to_string());
            }
        }

        self.store
            .audit(&AuditEntry::import(format!("Failed: {}", message)));
        result
    }
}

/// Typed entities for every collection of a validated envelope
fn decode_snapshot(data: &Value) -> PiggyBankResult<Snapshot> {
    Ok(Snapshot {
        accounts: decode(data)?,
        categories: decode(data)?,
        tags: decode(data)?,
        transactions: decode(data)?,
        budgets: decode(data)?,
    })
}

fn decode<T: Entity>(data: &Value) -> PiggyBankResult<Vec<T>> {
    let collection = T::KIND.collection();
    dates::deserialize_array_dates(records(data, collection), T::DATE_FIELDS)
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record)
                .map_err(|e| PiggyBankError::Import(format!("{}[{}]: {}", collection, i, e)))
        })
        .collect()
}
