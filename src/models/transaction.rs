//! Transaction model
//!
//! A single income or expense against one account, classified by one
//! category and any number of tags. The amount is stored as a magnitude; the
//! sign comes from the transaction type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryType;
use super::ids::{AccountId, CategoryId, TagId, TransactionId};
use super::{Entity, EntityKind};
use crate::dates;

/// Transactions share the income/expense split with categories
pub type TransactionType = CategoryType;

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// Classification
    pub category_id: CategoryId,

    /// Magnitude of the transaction
    pub amount: f64,

    /// Income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Calendar day of the transaction (UTC)
    pub date: DateTime<Utc>,

    /// Who was paid, or who paid
    pub vendor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Attached tags; not required to resolve to stored tags
    #[serde(default)]
    pub tag_ids: Vec<TagId>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        account_id: AccountId,
        category_id: CategoryId,
        transaction_type: TransactionType,
        amount: f64,
        date: DateTime<Utc>,
        vendor: impl Into<String>,
    ) -> Self {
        let now = dates::now();
        Self {
            id: TransactionId::new(),
            account_id,
            category_id,
            amount,
            transaction_type,
            date,
            vendor: vendor.into(),
            notes: None,
            tag_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The effect this transaction has on its account's balance
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            CategoryType::Income => self.amount,
            CategoryType::Expense => -self.amount,
        }
    }

    /// Whether the transaction carries the given tag
    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tag_ids.contains(&tag_id)
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = dates::now();
    }
}

impl Entity for Transaction {
    type Id = TransactionId;
    const KIND: EntityKind = EntityKind::Transaction;
    const DATE_FIELDS: &'static [&'static str] = &["date", "createdAt", "updatedAt"];

    fn id(&self) -> TransactionId {
        self.id
    }

    fn display_name(&self) -> String {
        self.vendor.clone()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2}",
            self.date.format("%Y-%m-%d"),
            self.vendor,
            self.signed_amount()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(transaction_type: TransactionType) -> Transaction {
        Transaction::new(
            AccountId::new(),
            CategoryId::new(),
            transaction_type,
            42.5,
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
            "Grocer",
        )
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(sample(CategoryType::Income).signed_amount(), 42.5);
        assert_eq!(sample(CategoryType::Expense).signed_amount(), -42.5);
    }

    #[test]
    fn test_display() {
        let txn = sample(CategoryType::Expense);
        assert_eq!(txn.to_string(), "2025-01-15 Grocer -42.50");
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let mut txn = sample(CategoryType::Income);
        let tag = TagId::new();
        txn.tag_ids.push(tag);
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["tagIds"][0], tag.to_string());
        assert!(value.get("notes").is_none());
        assert!(txn.has_tag(tag));
    }
}
