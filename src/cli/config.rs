//! Configuration CLI commands

use clap::Subcommand;

use crate::config::{PiggyBankPaths, Settings};
use crate::error::PiggyBankResult;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and current settings
    Show,
    /// Change a setting (default_currency, pretty_export, audit_enabled)
    Set {
        key: String,
        value: String,
    },
}

/// Handle a config command
pub fn handle_config_command(
    paths: &PiggyBankPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> PiggyBankResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("PiggyBank Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  default_currency: {}", settings.default_currency);
            println!("  pretty_export:    {}", settings.pretty_export);
            println!("  audit_enabled:    {}", settings.audit_enabled);
        }
        ConfigCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
    }

    Ok(())
}
