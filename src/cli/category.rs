//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Category, CategoryType};
use crate::services::{CategoryService, CategoryUpdate};
use crate::storage::Store;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only show one type (income or expense)
        #[arg(short = 't', long)]
        category_type: Option<String>,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Category type (income or expense)
        #[arg(short = 't', long, default_value = "expense")]
        category_type: String,
        /// Display color
        #[arg(short, long, default_value = "#64748b")]
        color: String,
        /// Icon shown next to the name
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color
        #[arg(short, long)]
        color: Option<String>,
        /// New icon
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a category (built-in categories are kept)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command<S: Store>(store: &S, cmd: CategoryCommands) -> PiggyBankResult<()> {
    let service = CategoryService::new(store);

    match cmd {
        CategoryCommands::List { category_type } => {
            let categories = match category_type {
                Some(t) => service.list_by_type(parse_category_type(&t)?)?,
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create {
            name,
            category_type,
            color,
            icon,
        } => {
            let category_type = parse_category_type(&category_type)?;
            let category = service.create(&name, category_type, &color, icon.as_deref())?;
            println!("Created category: {} ({})", category.name, category.category_type);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            icon,
        } => {
            let found = find(&service, &category)?;
            if name.is_none() && color.is_none() && icon.is_none() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(found.id, CategoryUpdate { name, color, icon })?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let found = find(&service, &category)?;
            if service.delete(found.id)? {
                println!("Deleted category: {}", found.name);
            } else {
                println!("'{}' is a built-in category and cannot be deleted.", found.name);
            }
        }
    }

    Ok(())
}

fn find<S: Store>(service: &CategoryService<'_, S>, identifier: &str) -> PiggyBankResult<Category> {
    service
        .find(identifier)?
        .ok_or_else(|| PiggyBankError::category_not_found(identifier))
}

pub(crate) fn parse_category_type(input: &str) -> PiggyBankResult<CategoryType> {
    CategoryType::parse(input).ok_or_else(|| {
        PiggyBankError::Validation(format!(
            "Invalid type: '{}'. Valid types: {}",
            input,
            CategoryType::NAMES.join(", ")
        ))
    })
}
