//! PiggyBank - personal finance tracking with portable JSON exports
//!
//! This library provides the core functionality for PiggyBank: accounts,
//! categories, tags, transactions and budgets kept in a local store, plus a
//! validated, all-or-nothing import of the versioned export format.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `dates`: ISO-8601 date codec used at the JSON boundary
//! - `models`: Core data models (accounts, transactions, categories, etc.)
//! - `storage`: The `Store` trait and the JSON file-backed `Database`
//! - `validation`: Schema and reference checks for untrusted export data
//! - `export`: Export envelope assembly
//! - `import`: Validated import with snapshot rollback
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `cli` and `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use piggybank::config::PiggyBankPaths;
//! use piggybank::import::ImportService;
//! use piggybank::storage::Database;
//!
//! let db = Database::open(PiggyBankPaths::new()?)?;
//! let result = ImportService::new(&db).import_file("piggybank-export-2024-01-15.json");
//! assert!(result.success, "{}", result.message);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod dates;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{PiggyBankError, PiggyBankResult};
