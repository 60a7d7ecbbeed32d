//! Validation of untrusted import data
//!
//! Imported files are inspected as raw `serde_json::Value`s before anything is
//! converted into typed models. Every check runs and every failure is
//! collected, so a user fixing an export file sees the whole list at once.

pub mod entities;
pub mod envelope;
pub mod references;

pub use entities::{
    validate_account, validate_budget, validate_category, validate_tag, validate_transaction,
};
pub use envelope::validate_export_data;
pub use references::ReferenceSet;

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::dates;

/// A single field-level problem found in imported data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Field path, e.g. `transactions[0].accountId`
    pub field: String,

    /// What is wrong with the field
    pub message: String,

    /// The offending value, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    /// Create an error for a field, capturing the value found there
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.cloned(),
        }
    }

    /// Qualify the field path with a parent path
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.field = format!("{}.{}", prefix, self.field);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating an export envelope
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Build a result from collected errors
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors rendered as `field: message`
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Render errors as one `; `-separated line, dropping exact repeats
pub fn format_validation_errors(errors: &[ValidationError]) -> String {
    let mut seen = HashSet::new();
    errors
        .iter()
        .map(ToString::to_string)
        .filter(|rendered| seen.insert(rendered.clone()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Look up a field, treating JSON `null` as absent
pub(crate) fn field<'v>(record: &'v Value, name: &str) -> Option<&'v Value> {
    record.get(name).filter(|v| !v.is_null())
}

/// Canonical 8-4-4-4-12 hex identifier, either case
pub(crate) fn parse_uuid(value: Option<&Value>) -> Option<Uuid> {
    let s = value?.as_str()?;
    if s.len() != 36 {
        return None;
    }
    Uuid::parse_str(s).ok()
}

pub(crate) fn is_non_empty_string(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

pub(crate) fn is_finite_number(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_f64)
        .is_some_and(f64::is_finite)
}

/// A date that must be present
pub(crate) fn is_valid_date(value: Option<&Value>) -> bool {
    dates::deserialize_date(value.and_then(Value::as_str)).is_some()
}

/// A date that may be absent, but must parse when given
pub(crate) fn is_valid_optional_date(value: Option<&Value>) -> bool {
    value.map_or(true, |v| is_valid_date(Some(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_validation_errors(&[]), "");
    }

    #[test]
    fn test_format_collapses_duplicates_in_order() {
        let errors = vec![
            ValidationError::new("b", "second", None),
            ValidationError::new("a", "first", None),
            ValidationError::new("b", "second", Some(&json!(1))),
            ValidationError::new("b", "other", None),
        ];
        assert_eq!(
            format_validation_errors(&errors),
            "b: second; a: first; b: other"
        );
    }

    #[test]
    fn test_prefixed() {
        let err = ValidationError::new("balance", "Invalid balance", None).prefixed("accounts[2]");
        assert_eq!(err.field, "accounts[2].balance");
        assert_eq!(err.to_string(), "accounts[2].balance: Invalid balance");
    }

    #[test]
    fn test_uuid_shape() {
        let id = Uuid::new_v4();
        assert!(parse_uuid(Some(&json!(id.to_string()))).is_some());
        assert!(parse_uuid(Some(&json!(id.to_string().to_uppercase()))).is_some());
        assert!(parse_uuid(Some(&json!(id.simple().to_string()))).is_none());
        assert!(parse_uuid(Some(&json!("invalid-account-id"))).is_none());
        assert!(parse_uuid(Some(&json!(42))).is_none());
        assert!(parse_uuid(None).is_none());
    }

    #[test]
    fn test_primitive_checks() {
        assert!(is_finite_number(Some(&json!(-3.5))));
        assert!(!is_finite_number(Some(&json!("3.5"))));
        assert!(!is_finite_number(Some(&json!(f64::NAN))));
        assert!(is_non_empty_string(Some(&json!("x"))));
        assert!(!is_non_empty_string(Some(&json!(""))));
        assert!(is_valid_optional_date(None));
        assert!(!is_valid_optional_date(Some(&json!("not-a-date"))));
        assert!(!is_valid_date(None));
    }
}
