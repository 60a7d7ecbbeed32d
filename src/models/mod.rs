//! Core data models for PiggyBank
//!
//! The five entity kinds (accounts, categories, tags, transactions and
//! budgets) plus the identifiers that link them.

pub mod account;
pub mod budget;
pub mod category;
pub mod ids;
pub mod tag;
pub mod transaction;

pub use account::{Account, AccountType, CreditCardDetails};
pub use budget::{Budget, BudgetPeriod};
pub use category::{default_categories, Category, CategoryType};
pub use ids::{AccountId, BudgetId, CategoryId, TagId, TransactionId};
pub use tag::Tag;
pub use transaction::{Transaction, TransactionType};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// The five kinds of stored entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Category,
    Tag,
    Transaction,
    Budget,
}

impl EntityKind {
    /// Every kind, in the order collections are written during an import
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Account,
        EntityKind::Category,
        EntityKind::Tag,
        EntityKind::Transaction,
        EntityKind::Budget,
    ];

    /// Name of the collection holding this kind (also its envelope key)
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Category => "categories",
            Self::Tag => "tags",
            Self::Transaction => "transactions",
            Self::Budget => "budgets",
        }
    }

    /// Singular display name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Category => "Category",
            Self::Tag => "Tag",
            Self::Transaction => "Transaction",
            Self::Budget => "Budget",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared behaviour of every stored entity
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Typed primary key
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug;

    /// Which collection the entity lives in
    const KIND: EntityKind;

    /// Fields (in wire naming) that hold dates
    const DATE_FIELDS: &'static [&'static str];

    /// Primary key
    fn id(&self) -> Self::Id;

    /// Human-readable label for logs and audit entries
    fn display_name(&self) -> String;
}
