//! Tag model
//!
//! Free-form labels attached to transactions by ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TagId;
use super::{Entity, EntityKind};
use crate::dates;

/// A transaction label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = dates::now();
        Self {
            id: TagId::new(),
            name: name.into(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = dates::now();
    }
}

impl Entity for Tag {
    type Id = TagId;
    const KIND: EntityKind = EntityKind::Tag;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];

    fn id(&self) -> TagId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name)
    }
}
