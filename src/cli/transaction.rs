//! Transaction CLI commands

use clap::Subcommand;

use crate::display::format_transaction_register;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Account, Category, TagId, Transaction};
use crate::services::{
    AccountService, CategoryService, NewTransaction, TagService, TransactionFilter,
    TransactionService, TransactionUpdate,
};
use crate::storage::Store;

use super::category::parse_category_type;
use super::{parse_amount, parse_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Account name or ID
        account: String,
        /// Amount (always positive; the type gives the direction)
        amount: String,
        /// Who was paid or who paid
        vendor: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
        /// Transaction date (YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Tag name or ID (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List transactions, newest first
    List {
        /// Filter by account
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by type (income or expense)
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Vendor contains this text
        #[arg(long)]
        vendor: Option<String>,
        /// Carries any of these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command<S: Store>(
    store: &S,
    cmd: TransactionCommands,
) -> PiggyBankResult<()> {
    let service = TransactionService::new(store);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            vendor,
            category,
            transaction_type,
            date,
            notes,
            tags,
        } => {
            let account = find_account(store, &account)?;
            let input = NewTransaction {
                account_id: account.id,
                category_id: find_category(store, &category)?.id,
                transaction_type: parse_category_type(&transaction_type)?,
                amount: parse_amount(&amount)?,
                date: match date {
                    Some(d) => parse_date(&d)?,
                    None => crate::dates::now(),
                },
                vendor,
                notes,
                tag_ids: resolve_tags(store, &tags)?,
            };

            let txn = service.create(input)?;
            println!(
                "Recorded {:.2} at {} on {}",
                txn.signed_amount(),
                txn.vendor,
                account.name
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            category,
            transaction_type,
            from,
            to,
            vendor,
            tags,
            limit,
        } => {
            let mut filter = TransactionFilter::new()
                .date_range(
                    from.as_deref().map(parse_date).transpose()?,
                    to.as_deref().map(parse_date).transpose()?,
                )
                .tags(resolve_tags(store, &tags)?)
                .limit(limit);
            if let Some(account) = account {
                filter = filter.account(find_account(store, &account)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(find_category(store, &category)?.id);
            }
            if let Some(t) = transaction_type {
                filter = filter.transaction_type(parse_category_type(&t)?);
            }
            if let Some(vendor) = vendor {
                filter = filter.vendor(vendor);
            }

            print!("{}", format_transaction_register(&service.filter(&filter)?));
        }

        TransactionCommands::Edit {
            id,
            account,
            amount,
            vendor,
            category,
            transaction_type,
            date,
            notes,
        } => {
            let txn = find(&service, &id)?;
            let changes = TransactionUpdate {
                account_id: account
                    .map(|a| find_account(store, &a).map(|a| a.id))
                    .transpose()?,
                category_id: category
                    .map(|c| find_category(store, &c).map(|c| c.id))
                    .transpose()?,
                transaction_type: transaction_type
                    .as_deref()
                    .map(parse_category_type)
                    .transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                vendor,
                notes,
                tag_ids: None,
            };

            let updated = service.update(txn.id, changes)?;
            println!("Updated transaction: {}", updated);
        }

        TransactionCommands::Delete { id } => {
            let txn = find(&service, &id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {}", deleted);
        }
    }

    Ok(())
}

fn find<S: Store>(service: &TransactionService<'_, S>, id: &str) -> PiggyBankResult<Transaction> {
    service
        .find(id)?
        .ok_or_else(|| PiggyBankError::transaction_not_found(id))
}

fn find_account<S: Store>(store: &S, identifier: &str) -> PiggyBankResult<Account> {
    AccountService::new(store)
        .find(identifier)?
        .ok_or_else(|| PiggyBankError::account_not_found(identifier))
}

fn find_category<S: Store>(store: &S, identifier: &str) -> PiggyBankResult<Category> {
    CategoryService::new(store)
        .find(identifier)?
        .ok_or_else(|| PiggyBankError::category_not_found(identifier))
}

fn resolve_tags<S: Store>(store: &S, identifiers: &[String]) -> PiggyBankResult<Vec<TagId>> {
    let service = TagService::new(store);
    identifiers
        .iter()
        .map(|t| super::tag::find(&service, t).map(|tag| tag.id))
        .collect()
}
