//! Validation of the top-level export envelope

use serde_json::Value;

use super::entities::{
    validate_account, validate_budget, validate_category, validate_tag, validate_transaction,
};
use super::references::ReferenceSet;
use super::{field, is_valid_date, ValidationError, ValidationResult};
use crate::export::SUPPORTED_VERSIONS;

/// Validate an entire export envelope
///
/// `null` is rejected with a single `root` error. Structural problems (bad
/// version, date or collection arrays) are reported on their own, without
/// looking at individual records. Otherwise every record is validated with
/// its index in the field path, and transactions and budgets are checked
/// against the accounts and categories of the same batch.
pub fn validate_export_data(data: &Value) -> ValidationResult {
    if data.is_null() {
        return ValidationResult::from_errors(vec![ValidationError::new(
            "root",
            "Data is null or undefined",
            None,
        )]);
    }

    let mut errors = Vec::new();

    let version = field(data, "version");
    match version.and_then(Value::as_str).filter(|v| !v.is_empty()) {
        None => errors.push(ValidationError::new(
            "version",
            "Invalid or missing version",
            version,
        )),
        Some(v) if !SUPPORTED_VERSIONS.contains(&v) => errors.push(ValidationError::new(
            "version",
            format!(
                "Unsupported version: {}. Supported versions: {}",
                v,
                SUPPORTED_VERSIONS.join(", ")
            ),
            version,
        )),
        Some(_) => {}
    }

    let export_date = field(data, "exportDate");
    if !is_valid_date(export_date) {
        errors.push(ValidationError::new(
            "exportDate",
            "Invalid or missing exportDate",
            export_date,
        ));
    }

    for name in ["accounts", "categories", "transactions"] {
        let value = data.get(name);
        if !value.is_some_and(Value::is_array) {
            errors.push(array_error(name, value));
        }
    }

    // optional, but `null` is not an empty collection
    for name in ["tags", "budgets"] {
        let value = data.get(name);
        if value.is_some_and(|v| !v.is_array()) {
            errors.push(array_error(name, value));
        }
    }

    if !errors.is_empty() {
        return ValidationResult::from_errors(errors);
    }

    let mut refs = ReferenceSet::new();

    for (i, account) in records(data, "accounts").iter().enumerate() {
        let found = validate_account(account);
        if found.is_empty() {
            ReferenceSet::collect(&mut refs.accounts, account);
        }
        extend_indexed(&mut errors, "accounts", i, found);
    }

    for (i, category) in records(data, "categories").iter().enumerate() {
        let found = validate_category(category);
        if found.is_empty() {
            ReferenceSet::collect(&mut refs.categories, category);
        }
        extend_indexed(&mut errors, "categories", i, found);
    }

    for (i, tag) in records(data, "tags").iter().enumerate() {
        let found = validate_tag(tag);
        if found.is_empty() {
            ReferenceSet::collect(&mut refs.tags, tag);
        }
        extend_indexed(&mut errors, "tags", i, found);
    }

    for (i, transaction) in records(data, "transactions").iter().enumerate() {
        let found = validate_transaction(transaction, &refs.accounts, &refs.categories);
        extend_indexed(&mut errors, "transactions", i, found);
    }

    for (i, budget) in records(data, "budgets").iter().enumerate() {
        let found = validate_budget(budget, &refs.categories);
        extend_indexed(&mut errors, "budgets", i, found);
    }

    ValidationResult::from_errors(errors)
}

fn array_error(name: &str, value: Option<&Value>) -> ValidationError {
    ValidationError::new(name, format!("{} must be an array", name), value)
}

/// Records of a collection; absent optional collections are empty
pub(crate) fn records<'v>(data: &'v Value, name: &str) -> &'v [Value] {
    field(data, name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn extend_indexed(
    errors: &mut Vec<ValidationError>,
    collection: &str,
    index: usize,
    found: Vec<ValidationError>,
) {
    let prefix = format!("{}[{}]", collection, index);
    errors.extend(found.into_iter().map(|e| e.prefixed(&prefix)));
}
