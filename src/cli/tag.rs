//! Tag CLI commands

use clap::Subcommand;

use crate::display::format_tag_list;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::Tag;
use crate::services::TagService;
use crate::storage::Store;

/// Tag subcommands
#[derive(Subcommand)]
pub enum TagCommands {
    /// List all tags
    List,
    /// Create a new tag
    Create {
        /// Tag name
        name: String,
        /// Display color
        #[arg(short, long, default_value = "#64748b")]
        color: String,
    },
    /// Rename or recolour a tag
    Edit {
        /// Tag name or ID
        tag: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a tag and remove it from transactions
    Delete {
        /// Tag name or ID
        tag: String,
    },
}

/// Handle a tag command
pub fn handle_tag_command<S: Store>(store: &S, cmd: TagCommands) -> PiggyBankResult<()> {
    let service = TagService::new(store);

    match cmd {
        TagCommands::List => print!("{}", format_tag_list(&service.list()?)),
        TagCommands::Create { name, color } => {
            let tag = service.create(&name, &color)?;
            println!("Created tag: {}", tag);
            println!("  ID: {}", tag.id);
        }
        TagCommands::Edit { tag, name, color } => {
            let found = find(&service, &tag)?;
            let updated = service.update(found.id, name.as_deref(), color.as_deref())?;
            println!("Updated tag: {}", updated);
        }
        TagCommands::Delete { tag } => {
            let found = find(&service, &tag)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted tag: {}", deleted);
        }
    }

    Ok(())
}

pub(crate) fn find<S: Store>(service: &TagService<'_, S>, identifier: &str) -> PiggyBankResult<Tag> {
    service
        .find(identifier)?
        .ok_or_else(|| PiggyBankError::tag_not_found(identifier))
}
