//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod category;
pub mod config;
pub mod export;
pub mod import;
pub mod tag;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use export::{handle_export, handle_stats};
pub use import::{handle_clear, handle_history, handle_import, handle_validate};
pub use tag::{handle_tag_command, TagCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{DateTime, Utc};

use crate::dates;
use crate::error::{PiggyBankError, PiggyBankResult};

/// Parse a date argument (`YYYY-MM-DD` or a full ISO timestamp)
pub(crate) fn parse_date(input: &str) -> PiggyBankResult<DateTime<Utc>> {
    dates::deserialize_date(Some(input.trim())).ok_or_else(|| {
        PiggyBankError::Validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD or an ISO-8601 timestamp",
            input
        ))
    })
}

/// Parse an amount argument
pub(crate) fn parse_amount(input: &str) -> PiggyBankResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| PiggyBankError::Validation(format!("Invalid amount: '{}'", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-09").unwrap();
        assert_eq!(dates::to_iso(&date), "2024-03-09T00:00:00.000Z");
        assert!(parse_date("March 9").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), 12.5);
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("ten").is_err());
    }
}
