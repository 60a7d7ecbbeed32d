//! User settings for PiggyBank
//!
//! Stored as `config.json` in the base directory. Missing fields fall back to
//! their defaults so older files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::PiggyBankPaths;
use crate::error::PiggyBankError;

/// User settings for PiggyBank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency given to new accounts when none is specified
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Indent exported JSON
    #[serde(default = "default_true")]
    pub pretty_export: bool,

    /// Record mutations in the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            pretty_export: true,
            audit_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PiggyBankPaths) -> Result<Self, PiggyBankError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PiggyBankError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| PiggyBankError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PiggyBankPaths) -> Result<(), PiggyBankError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PiggyBankError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PiggyBankError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Update one setting by key, as used by `piggybank config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PiggyBankError> {
        match key {
            "default_currency" => {
                let currency = value.trim();
                if currency.is_empty() {
                    return Err(PiggyBankError::Config("Currency cannot be empty".into()));
                }
                self.default_currency = currency.to_uppercase();
            }
            "pretty_export" => self.pretty_export = parse_bool(key, value)?,
            "audit_enabled" => self.audit_enabled = parse_bool(key, value)?,
            _ => {
                return Err(PiggyBankError::Config(format!(
                    "Unknown setting: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, PiggyBankError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(PiggyBankError::Config(format!(
            "Invalid value for {}: {}",
            key, value
        ))),
    }
}
