//! JSON export
//!
//! The envelope carries each collection as plain JSON records with every
//! date field rewritten to the millisecond ISO wire form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use tracing::info;

use crate::dates;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::Entity;
use crate::storage::Store;

use super::snapshot::Snapshot;
use super::{EntityCounts, CURRENT_VERSION};

/// The versioned export envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub export_date: String,
    pub accounts: Vec<Value>,
    pub categories: Vec<Value>,
    #[serde(default)]
    pub tags: Vec<Value>,
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub budgets: Vec<Value>,
}

impl ExportData {
    /// Build an envelope from native collections
    pub fn from_snapshot(snapshot: &Snapshot) -> PiggyBankResult<Self> {
        Ok(Self {
            version: CURRENT_VERSION.to_string(),
            export_date: dates::to_iso(&dates::now()),
            accounts: to_records(&snapshot.accounts)?,
            categories: to_records(&snapshot.categories)?,
            tags: to_records(&snapshot.tags)?,
            transactions: to_records(&snapshot.transactions)?,
            budgets: to_records(&snapshot.budgets)?,
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
}

/// Serialize entities and rewrite their date fields to the wire form
fn to_records<T: Entity>(entities: &[T]) -> PiggyBankResult<Vec<Value>> {
    let native = entities
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            PiggyBankError::Export(format!("Failed to serialize {}: {}", T::KIND.collection(), e))
        })?;
    Ok(dates::serialize_array_dates(&native, T::DATE_FIELDS))
}

/// Read the whole store into an export envelope
pub fn export_all<S: Store>(store: &S) -> PiggyBankResult<ExportData> {
    let snapshot = Snapshot::read(store)?;
    ExportData::from_snapshot(&snapshot)
}

/// Export the whole store as JSON to `writer`
pub fn export_to_writer<S: Store, W: Write>(
    store: &S,
    writer: &mut W,
    pretty: bool,
) -> PiggyBankResult<EntityCounts> {
    let export = export_all(store)?;

    let written = if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    };
    written.map_err(|e| PiggyBankError::Export(e.to_string()))?;

    writer
        .flush()
        .map_err(|e| PiggyBankError::Export(e.to_string()))?;

    let counts = export.counts();
    info!(%counts, "exported data");
    Ok(counts)
}
