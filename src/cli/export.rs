//! CLI commands for data export and statistics

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use chrono::Utc;

use crate::error::{PiggyBankError, PiggyBankResult};
use crate::export::{data_stats, default_export_filename, export_to_writer};
use crate::storage::Store;

/// Write the whole store as a JSON export
///
/// `-` as the output writes to stdout; no output means
/// `piggybank-export-<today>.json` in the current directory.
pub fn handle_export<S: Store>(
    store: &S,
    output: Option<PathBuf>,
    pretty: bool,
) -> PiggyBankResult<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(default_export_filename(Utc::now())));

    if output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        export_to_writer(store, &mut writer, pretty)?;
        return Ok(());
    }

    let file = File::create(&output).map_err(|e| {
        PiggyBankError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);
    let counts = export_to_writer(store, &mut writer, pretty)?;

    println!("Exported {} to: {}", counts, output.display());
    Ok(())
}

/// Print per-collection counts
pub fn handle_stats<S: Store>(store: &S) -> PiggyBankResult<()> {
    let stats = data_stats(store)?;

    println!("PiggyBank Data");
    println!("==============");
    println!("  Accounts:     {}", stats.accounts);
    println!("  Categories:   {}", stats.categories);
    println!("  Tags:         {}", stats.tags);
    println!("  Transactions: {}", stats.transactions);
    println!("  Budgets:      {}", stats.budgets);
    println!("  Total:        {}", stats.total());

    Ok(())
}
