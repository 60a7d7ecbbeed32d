//! Budget CLI commands

use clap::Subcommand;

use crate::display::format_budget_list;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Budget, BudgetPeriod};
use crate::services::{BudgetService, BudgetUpdate, CategoryService};
use crate::storage::Store;

use super::{parse_amount, parse_date};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List budgets
    List {
        /// Only budgets for this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Create a budget for a category
    Create {
        /// Category name or ID
        category: String,
        /// Spending limit per period
        amount: String,
        /// weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
        /// First day the budget applies (YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        start: Option<String>,
        /// Last day the budget applies (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Edit a budget
    Edit {
        /// Budget ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        /// Remove the end date
        #[arg(long, conflicts_with = "end")]
        open_ended: bool,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command<S: Store>(store: &S, cmd: BudgetCommands) -> PiggyBankResult<()> {
    let service = BudgetService::new(store);
    let categories = CategoryService::new(store);

    match cmd {
        BudgetCommands::List { category } => {
            let budgets = match category {
                Some(c) => {
                    let found = categories
                        .find(&c)?
                        .ok_or_else(|| PiggyBankError::category_not_found(&c))?;
                    service.list_by_category(found.id)?
                }
                None => service.list()?,
            };
            print!("{}", format_budget_list(&budgets, &categories.list()?));
        }

        BudgetCommands::Create {
            category,
            amount,
            period,
            start,
            end,
        } => {
            let found = categories
                .find(&category)?
                .ok_or_else(|| PiggyBankError::category_not_found(&category))?;
            let start = match start {
                Some(s) => parse_date(&s)?,
                None => crate::dates::now(),
            };

            let budget = service.create(
                found.id,
                parse_amount(&amount)?,
                parse_period(&period)?,
                start,
                end.as_deref().map(parse_date).transpose()?,
            )?;
            println!(
                "Created {} budget of {:.2} for {}",
                budget.period, budget.amount, found.name
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Edit {
            id,
            amount,
            period,
            end,
            open_ended,
        } => {
            let budget = find(&service, &id)?;
            let changes = BudgetUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                period: period.as_deref().map(parse_period).transpose()?,
                start_date: None,
                end_date: if open_ended {
                    Some(None)
                } else {
                    end.as_deref().map(parse_date).transpose()?.map(Some)
                },
            };

            let updated = service.update(budget.id, changes)?;
            println!("Updated budget: {}", updated.id);
        }

        BudgetCommands::Delete { id } => {
            let budget = find(&service, &id)?;
            service.delete(budget.id)?;
            println!("Deleted budget: {}", budget.id);
        }
    }

    Ok(())
}

fn find<S: Store>(service: &BudgetService<'_, S>, id: &str) -> PiggyBankResult<Budget> {
    service
        .find(id)?
        .ok_or_else(|| PiggyBankError::budget_not_found(id))
}

fn parse_period(input: &str) -> PiggyBankResult<BudgetPeriod> {
    BudgetPeriod::parse(input).ok_or_else(|| {
        PiggyBankError::Validation(format!(
            "Invalid period: '{}'. Valid periods: {}",
            input,
            BudgetPeriod::NAMES.join(", ")
        ))
    })
}
