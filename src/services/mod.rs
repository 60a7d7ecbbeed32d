//! Service layer for PiggyBank
//!
//! Services sit on top of a [`Store`]: they validate input, keep cross-entity
//! effects (account balances) consistent inside one transaction, and write
//! audit entries once a change has been committed.

pub mod account;
pub mod budget;
pub mod category;
pub mod tag;
pub mod transaction;

pub use account::{AccountService, AccountUpdate};
pub use budget::{BudgetService, BudgetUpdate};
pub use category::{CategoryService, CategoryUpdate};
pub use tag::TagService;
pub use transaction::{NewTransaction, TransactionFilter, TransactionService, TransactionUpdate};

use crate::audit::{generate_diff, AuditEntry};
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::Entity;
use crate::storage::{Store, Stored, UnitOfWork};

/// Record an update, summarizing which fields changed
fn audit_update<S: Store, T: Entity>(store: &S, before: &T, after: &T) {
    let summary = match (serde_json::to_value(before), serde_json::to_value(after)) {
        (Ok(b), Ok(a)) => generate_diff(&b, &a),
        _ => None,
    };
    store.audit(&AuditEntry::update(before, after, summary));
}

/// Fetch an entity inside a transaction, failing when it is missing
fn require<T: Stored>(tx: &UnitOfWork<'_>, id: T::Id) -> PiggyBankResult<T> {
    tx.get::<T>(id)?.ok_or_else(|| PiggyBankError::NotFound {
        entity_type: T::KIND.label(),
        identifier: id.to_string(),
    })
}

/// Trimmed, non-empty text or a validation error naming `what`
fn required_text(value: &str, what: &str) -> PiggyBankResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PiggyBankError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(trimmed.to_string())
}
