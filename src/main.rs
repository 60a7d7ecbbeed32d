use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use piggybank::audit::AuditLogger;
use piggybank::cli::{
    handle_account_command, handle_budget_command, handle_category_command, handle_clear,
    handle_config_command, handle_export, handle_history, handle_import, handle_stats,
    handle_tag_command, handle_transaction_command, handle_validate, AccountCommands,
    BudgetCommands, CategoryCommands, ConfigCommands, TagCommands, TransactionCommands,
};
use piggybank::config::{PiggyBankPaths, Settings};
use piggybank::storage::{initialize_storage, Database};

#[derive(Parser)]
#[command(
    name = "piggybank",
    version,
    about = "Personal finance tracker with portable JSON exports",
    long_about = "PiggyBank tracks accounts, transactions, categories, budgets and tags \
                  in a local data directory, and moves all of it between machines as a \
                  single validated JSON export."
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, settings and default categories
    Init,

    /// Export all data as JSON
    Export {
        /// Output file ("-" for stdout); defaults to piggybank-export-<date>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write compact JSON regardless of the pretty_export setting
        #[arg(long)]
        compact: bool,
    },

    /// Replace all data with the contents of an export file
    Import {
        /// Export file to import
        file: PathBuf,
    },

    /// Check an export file without importing it
    Validate {
        /// Export file to check
        file: PathBuf,
    },

    /// Show how many records each collection holds
    Stats,

    /// Delete all data
    Clear {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Tag management commands
    #[command(subcommand)]
    Tag(TagCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let paths = PiggyBankPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("PiggyBank - personal finance tracking");
        println!();
        println!("Run 'piggybank init' to set up a data directory.");
        println!("Run 'piggybank --help' for usage information.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            let seeded = initialize_storage(&paths)?;
            println!("Initialized PiggyBank at: {}", paths.base_dir().display());
            if seeded > 0 {
                println!("Created {} default categories.", seeded);
            }
        }
        Commands::Config(cmd) => handle_config_command(&paths, &mut settings, cmd)?,
        Commands::Validate { file } => handle_validate(&file)?,
        Commands::History { limit } => {
            handle_history(&AuditLogger::new(paths.audit_log()), limit)?
        }
        Commands::Export { output, compact } => {
            let db = open_database(&paths, &settings)?;
            handle_export(&db, output, settings.pretty_export && !compact)?
        }
        Commands::Import { file } => handle_import(&open_database(&paths, &settings)?, &file)?,
        Commands::Stats => handle_stats(&open_database(&paths, &settings)?)?,
        Commands::Clear { yes } => handle_clear(&open_database(&paths, &settings)?, yes)?,
        Commands::Account(cmd) => {
            let db = open_database(&paths, &settings)?;
            handle_account_command(&db, &settings.default_currency, cmd)?
        }
        Commands::Category(cmd) => handle_category_command(&open_database(&paths, &settings)?, cmd)?,
        Commands::Tag(cmd) => handle_tag_command(&open_database(&paths, &settings)?, cmd)?,
        Commands::Transaction(cmd) => {
            handle_transaction_command(&open_database(&paths, &settings)?, cmd)?
        }
        Commands::Budget(cmd) => handle_budget_command(&open_database(&paths, &settings)?, cmd)?,
    }

    Ok(())
}

/// Open the store, recording changes when auditing is enabled
fn open_database(paths: &PiggyBankPaths, settings: &Settings) -> Result<Database> {
    let db = Database::open(paths.clone())?;
    Ok(if settings.audit_enabled {
        db.with_audit(AuditLogger::new(paths.audit_log()))
    } else {
        db
    })
}
