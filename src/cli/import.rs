//! CLI commands for import, validation, clearing and the audit history

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::audit::AuditLogger;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::import::ImportService;
use crate::storage::Store;
use crate::validation::{format_validation_errors, validate_export_data};

/// Replace all data with the contents of an export file
pub fn handle_import<S: Store>(store: &S, file: &Path) -> PiggyBankResult<()> {
    let result = ImportService::new(store).import_file(file);

    if result.success {
        println!("{}", result.message);
        println!("  Imported {}", result.imported);
        return Ok(());
    }

    if let Some(errors) = &result.errors {
        for error in errors {
            eprintln!("  {}", error);
        }
    }
    if result.data_loss_risk {
        eprintln!("WARNING: restoring the previous data also failed; the store may be incomplete.");
        if let Some(rollback_error) = &result.rollback_error {
            eprintln!("  Rollback error: {}", rollback_error);
        }
    }

    Err(PiggyBankError::Import(result.message))
}

/// Check an export file without importing it
pub fn handle_validate(file: &Path) -> PiggyBankResult<()> {
    let text = fs::read_to_string(file).map_err(|e| {
        PiggyBankError::Io(format!("Failed to read {}: {}", file.display(), e))
    })?;
    let data: Value = serde_json::from_str(&text)?;

    let result = validate_export_data(&data);
    if result.valid {
        println!("{} is a valid PiggyBank export", file.display());
        return Ok(());
    }

    for message in result.messages() {
        eprintln!("  {}", message);
    }
    Err(PiggyBankError::Validation(format_validation_errors(
        &result.errors,
    )))
}

/// Delete every record in every collection
pub fn handle_clear<S: Store>(store: &S, confirmed: bool) -> PiggyBankResult<()> {
    if !confirmed {
        return Err(PiggyBankError::Validation(
            "Refusing to delete all data without --yes".into(),
        ));
    }

    let removed = ImportService::new(store).clear_all()?;
    println!("Deleted {}", removed);
    Ok(())
}

/// Show the most recent audit entries
pub fn handle_history(logger: &AuditLogger, limit: usize) -> PiggyBankResult<()> {
    let entries = logger.read_recent(limit)?;
    if entries.is_empty() {
        println!("No history recorded.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
