//! The file-backed (or in-memory) store
//!
//! Each collection lives in `data/<collection>.json`. A write transaction
//! works on a staging copy of the tables; on success every collection it
//! touched is written to disk and the copy replaces the live tables. On error
//! the copy is dropped.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::PiggyBankPaths;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Account, Budget, Category, EntityKind, Tag, Transaction};

use super::file_io::{read_json, write_json_atomic};
use super::table::{Stored, Table, Tables};
use super::unit_of_work::{TransactionMode, UnitOfWork};
use super::Store;

const FILE_FORMAT_VERSION: u32 = 1;

/// On-disk form of one collection
#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile<T> {
    #[serde(default = "file_format_version")]
    version: u32,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

fn file_format_version() -> u32 {
    FILE_FORMAT_VERSION
}

impl<T> Default for CollectionFile<T> {
    fn default() -> Self {
        Self {
            version: FILE_FORMAT_VERSION,
            records: Vec::new(),
        }
    }
}

/// The PiggyBank store
pub struct Database {
    paths: Option<PiggyBankPaths>,
    tables: RwLock<Tables>,
    audit: Option<AuditLogger>,
}

impl Database {
    /// Open the store under `paths`, loading every collection file
    pub fn open(paths: PiggyBankPaths) -> PiggyBankResult<Self> {
        paths.ensure_directories()?;

        let mut tables = Tables::default();
        load_table::<Account>(&paths, &mut tables)?;
        load_table::<Category>(&paths, &mut tables)?;
        load_table::<Tag>(&paths, &mut tables)?;
        load_table::<Transaction>(&paths, &mut tables)?;
        load_table::<Budget>(&paths, &mut tables)?;

        debug!(base_dir = %paths.base_dir().display(), "opened database");

        Ok(Self {
            paths: Some(paths),
            tables: RwLock::new(tables),
            audit: None,
        })
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            paths: None,
            tables: RwLock::new(Tables::default()),
            audit: None,
        }
    }

    /// Record mutations through `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    fn read(&self) -> PiggyBankResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| PiggyBankError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> PiggyBankResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| PiggyBankError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Write the given collections of `staged` to disk
    ///
    /// If one file fails, collections already rewritten are put back from
    /// `current` so the files keep matching the live tables.
    fn persist(
        &self,
        current: &Tables,
        staged: &Tables,
        kinds: &[EntityKind],
    ) -> PiggyBankResult<()> {
        let Some(paths) = &self.paths else {
            return Ok(());
        };

        for (i, kind) in kinds.iter().enumerate() {
            if let Err(err) = save_kind(paths, staged, *kind) {
                for done in &kinds[..i] {
                    if let Err(revert_err) = save_kind(paths, current, *done) {
                        warn!(
                            collection = done.collection(),
                            error = %revert_err,
                            "failed to revert collection file"
                        );
                    }
                }
                return Err(err);
            }
        }

        Ok(())
    }
}

impl Store for Database {
    fn get_all<T: Stored>(&self) -> PiggyBankResult<Vec<T>> {
        let tables = self.read()?;
        Ok(T::table(&tables).rows().to_vec())
    }

    fn count(&self, kind: EntityKind) -> PiggyBankResult<usize> {
        Ok(self.read()?.count(kind))
    }

    fn transaction<R, F>(
        &self,
        mode: TransactionMode,
        scope: &[EntityKind],
        work: F,
    ) -> PiggyBankResult<R>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> PiggyBankResult<R>,
    {
        if mode == TransactionMode::ReadOnly {
            let tables = self.read()?;
            let mut uow = UnitOfWork::read_only(&tables, scope);
            return work(&mut uow);
        }

        // Held until commit so no other writer interleaves
        let mut live = self.write()?;
        let mut staged = live.clone();

        let (value, written) = {
            let mut uow = UnitOfWork::read_write(&mut staged, scope);
            let value = work(&mut uow)?;
            (value, uow.written().to_vec())
        };

        if !written.is_empty() {
            self.persist(&live, &staged, &written)?;
            *live = staged;
        }

        Ok(value)
    }

    fn audit(&self, entry: &AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(entry) {
                warn!(error = %e, "failed to write audit entry");
            }
        }
    }
}

fn load_table<T: Stored>(paths: &PiggyBankPaths, tables: &mut Tables) -> PiggyBankResult<()> {
    let path = paths.collection_file(T::KIND);
    let file: CollectionFile<T> = read_json(&path)?;
    *T::table_mut(tables) = Table::from_rows(file.records).map_err(|e| {
        PiggyBankError::Storage(format!("Corrupt collection {}: {}", path.display(), e))
    })?;
    Ok(())
}

fn save_table<T: Stored>(paths: &PiggyBankPaths, tables: &Tables) -> PiggyBankResult<()> {
    let file = CollectionFile {
        version: FILE_FORMAT_VERSION,
        records: T::table(tables).rows().to_vec(),
    };
    write_json_atomic(paths.collection_file(T::KIND), &file)
}

fn save_kind(paths: &PiggyBankPaths, tables: &Tables, kind: EntityKind) -> PiggyBankResult<()> {
    match kind {
        EntityKind::Account => save_table::<Account>(paths, tables),
        EntityKind::Category => save_table::<Category>(paths, tables),
        EntityKind::Tag => save_table::<Tag>(paths, tables),
        EntityKind::Transaction => save_table::<Transaction>(paths, tables),
        EntityKind::Budget => save_table::<Budget>(paths, tables),
    }
}
