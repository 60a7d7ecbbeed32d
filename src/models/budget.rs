//! Budget model
//!
//! A spending (or earning) target for one category over a recurring period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::{Entity, EntityKind};
use crate::dates;

/// How often a budget resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// Wire names accepted on import
    pub const NAMES: [&'static str; 3] = ["monthly", "weekly", "yearly"];

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" | "annual" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// A budget for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// The category this budget limits
    pub category_id: CategoryId,

    /// Amount allowed per period
    pub amount: f64,

    pub period: BudgetPeriod,

    /// First day the budget applies
    pub start_date: DateTime<Utc>,

    /// Last day the budget applies; open-ended when absent
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    /// When the budget was created
    pub created_at: DateTime<Utc>,

    /// When the budget was last modified
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new open-ended budget
    pub fn new(
        category_id: CategoryId,
        amount: f64,
        period: BudgetPeriod,
        start_date: DateTime<Utc>,
    ) -> Self {
        let now = dates::now();
        Self {
            id: BudgetId::new(),
            category_id,
            amount,
            period,
            start_date,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the budget covers the given instant
    pub fn is_active_on(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_date && self.end_date.map_or(true, |end| at <= end)
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = dates::now();
    }
}

impl Entity for Budget {
    type Id = BudgetId;
    const KIND: EntityKind = EntityKind::Budget;
    const DATE_FIELDS: &'static [&'static str] = &["startDate", "endDate", "createdAt", "updatedAt"];

    fn id(&self) -> BudgetId {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} {:.2}", self.period, self.amount)
    }
}
