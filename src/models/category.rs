//! Category model
//!
//! Categories classify transactions as income or expense and anchor budgets.
//! The built-in set seeded on first run is flagged `is_default` and can never
//! be deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::{Entity, EntityKind};
use crate::dates;

/// Whether a category (or transaction) brings money in or sends it out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    /// Wire names accepted on import
    pub const NAMES: [&'static str; 2] = ["income", "expense"];

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Income or expense
    #[serde(rename = "type")]
    pub category_type: CategoryType,

    /// Display colour (e.g. "#22c55e")
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Built-in categories cannot be deleted
    pub is_default: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user category
    pub fn new(
        name: impl Into<String>,
        category_type: CategoryType,
        color: impl Into<String>,
    ) -> Self {
        let now = dates::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            category_type,
            color: color.into(),
            icon: None,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = dates::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.color.trim().is_empty() {
            return Err(CategoryValidationError::EmptyColor);
        }

        Ok(())
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: EntityKind = EntityKind::Category;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];

    fn id(&self) -> CategoryId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Built-in categories created on first run: (name, type, colour, icon)
pub const DEFAULT_CATEGORIES: [(&str, CategoryType, &str, &str); 16] = [
    ("Salary", CategoryType::Income, "#22c55e", "💰"),
    ("Freelance", CategoryType::Income, "#10b981", "💼"),
    ("Investments", CategoryType::Income, "#3b82f6", "📈"),
    ("Other Income", CategoryType::Income, "#64748b", "💵"),
    ("Housing", CategoryType::Expense, "#ef4444", "🏠"),
    ("Food & Dining", CategoryType::Expense, "#f97316", "🍔"),
    ("Transportation", CategoryType::Expense, "#eab308", "🚗"),
    ("Utilities", CategoryType::Expense, "#a855f7", "💡"),
    ("Entertainment", CategoryType::Expense, "#ec4899", "🎬"),
    ("Shopping", CategoryType::Expense, "#f43f5e", "🛍️"),
    ("Health", CategoryType::Expense, "#06b6d4", "🏥"),
    ("Education", CategoryType::Expense, "#6366f1", "📚"),
    ("Personal Care", CategoryType::Expense, "#f59e0b", "💄"),
    ("Travel", CategoryType::Expense, "#14b8a6", "✈️"),
    ("Gifts", CategoryType::Expense, "#8b5cf6", "🎁"),
    ("Other Expense", CategoryType::Expense, "#94a3b8", "📦"),
];

/// Build the default category set with fresh IDs and a shared timestamp
pub fn default_categories() -> Vec<Category> {
    let now = dates::now();
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, category_type, color, icon)| Category {
            id: CategoryId::new(),
            name: (*name).to_string(),
            category_type: *category_type,
            color: (*color).to_string(),
            icon: Some((*icon).to_string()),
            is_default: true,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    EmptyColor,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::EmptyColor => write!(f, "Category color cannot be empty"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_is_not_default() {
        let category = Category::new("Pets", CategoryType::Expense, "#123456");
        assert!(!category.is_default);
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn test_default_categories() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 16);
        assert!(defaults.iter().all(|c| c.is_default));
        assert_eq!(
            defaults
                .iter()
                .filter(|c| c.category_type == CategoryType::Income)
                .count(),
            4
        );
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Pets", CategoryType::Expense, "#123456");
        assert!(category.validate().is_ok());

        category.color = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyColor));
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let category = Category::new("Bonus", CategoryType::Income, "#00ff00");
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["isDefault"], false);
    }
}
