//! Audit logging system for PiggyBank
//!
//! Records entity mutations, imports and clears in an append-only
//! line-delimited JSON log.
//!
//! - `AuditEntry`: one logged operation with optional before/after values
//! - `AuditLogger`: appends entries to `audit.log` and reads them back
//! - `generate_diff`: short summary of what an update changed

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
