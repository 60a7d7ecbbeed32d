//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::display::{format_account_details, format_account_list};
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Account, AccountType};
use crate::services::{AccountService, AccountUpdate};
use crate::storage::Store;

use super::parse_amount;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (checking, savings, credit, debit, investment)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// ISO currency code; defaults to the configured currency
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New account type
        #[arg(short = 't', long)]
        account_type: Option<String>,
        /// New currency code
        #[arg(short, long)]
        currency: Option<String>,
        /// Credit limit (credit cards)
        #[arg(long)]
        credit_limit: Option<String>,
        /// Interest rate percentage (credit cards)
        #[arg(long)]
        interest_rate: Option<String>,
        /// Statement closing day, 1-31 (credit cards)
        #[arg(long)]
        statement_day: Option<u8>,
    },
    /// Mark an account as reviewed now
    Review {
        /// Account name or ID
        account: String,
    },
    /// Delete an account with no transactions
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command<S: Store>(
    store: &S,
    default_currency: &str,
    cmd: AccountCommands,
) -> PiggyBankResult<()> {
    let service = AccountService::new(store);

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            currency,
        } => {
            let account_type = parse_account_type(&account_type)?;
            let mut balance = parse_amount(&balance)?;

            // Debt is entered as a positive number and stored as owed
            if account_type.is_liability() && balance > 0.0 {
                balance = -balance;
            }

            let currency = currency.as_deref().unwrap_or(default_currency);
            let account = service.create(&name, account_type, currency, balance)?;

            println!("Created account: {}", account.name);
            println!("  Type:    {}", account.account_type);
            println!("  Balance: {:.2} {}", account.balance, account.currency);
            println!("  ID:      {}", account.id);
        }

        AccountCommands::List => {
            print!("{}", format_account_list(&service.list()?));
        }

        AccountCommands::Show { account } => {
            let found = find(&service, &account)?;
            print!("{}", format_account_details(&found));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            currency,
            credit_limit,
            interest_rate,
            statement_day,
        } => {
            let found = find(&service, &account)?;

            let mut changes = AccountUpdate {
                name,
                currency,
                ..AccountUpdate::default()
            };
            if let Some(account_type) = account_type {
                changes.account_type = Some(parse_account_type(&account_type)?);
            }
            if credit_limit.is_some() || interest_rate.is_some() || statement_day.is_some() {
                let mut details = found.credit_card_details.clone().unwrap_or_default();
                if let Some(limit) = credit_limit {
                    details.credit_limit = Some(parse_amount(&limit)?);
                }
                if let Some(rate) = interest_rate {
                    details.interest_rate = Some(parse_amount(&rate)?);
                }
                if statement_day.is_some() {
                    details.statement_day = statement_day;
                }
                changes.credit_card_details = Some(Some(details));
            }

            if is_unchanged(&changes) {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(found.id, changes)?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Review { account } => {
            let found = find(&service, &account)?;
            let reviewed = service.mark_reviewed(found.id)?;
            println!("Marked '{}' as reviewed", reviewed.name);
        }

        AccountCommands::Delete { account } => {
            let found = find(&service, &account)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}

fn find<S: Store>(service: &AccountService<'_, S>, identifier: &str) -> PiggyBankResult<Account> {
    service
        .find(identifier)?
        .ok_or_else(|| PiggyBankError::account_not_found(identifier))
}

fn parse_account_type(input: &str) -> PiggyBankResult<AccountType> {
    AccountType::parse(input).ok_or_else(|| {
        PiggyBankError::Validation(format!(
            "Invalid account type: '{}'. Valid types: {}",
            input,
            AccountType::NAMES.join(", ")
        ))
    })
}

fn is_unchanged(changes: &AccountUpdate) -> bool {
    changes.name.is_none()
        && changes.account_type.is_none()
        && changes.currency.is_none()
        && changes.credit_card_details.is_none()
}
