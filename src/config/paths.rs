//! Path management for PiggyBank
//!
//! ## Path Resolution Order
//!
//! 1. `PIGGYBANK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/piggybank` or `~/.config/piggybank`
//! 3. Windows: `%APPDATA%\piggybank`

use std::path::PathBuf;

use crate::error::PiggyBankError;
use crate::models::EntityKind;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PIGGYBANK_DATA_DIR";

/// Manages all paths used by PiggyBank
#[derive(Debug, Clone)]
pub struct PiggyBankPaths {
    /// Base directory for all PiggyBank data
    base_dir: PathBuf,
}

impl PiggyBankPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application-data directory is known.
    pub fn new() -> Result<Self, PiggyBankError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PiggyBankPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/piggybank/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/piggybank/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the file holding one collection, e.g. `data/accounts.json`
    pub fn collection_file(&self, kind: EntityKind) -> PathBuf {
        self.data_dir().join(format!("{}.json", kind.collection()))
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), PiggyBankError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PiggyBankError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PiggyBankError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if PiggyBank has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PiggyBankError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                PiggyBankError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("piggybank"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PiggyBankError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PiggyBankError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("piggybank"))
}
