//! Foreign-key checks within a single import batch
//!
//! Only IDs of records that passed their own validation are collected, so a
//! transaction pointing at a broken account is reported as dangling.

use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

use super::{field, parse_uuid, ValidationError};

/// IDs observed in the batch, per referenced kind
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    pub accounts: HashSet<Uuid>,
    pub categories: HashSet<Uuid>,
    /// Collected but never resolved against; `tagIds` are checked for shape only
    pub tags: HashSet<Uuid>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the `id` of a valid record into one of the sets
    pub(crate) fn collect(set: &mut HashSet<Uuid>, record: &Value) {
        if let Some(id) = parse_uuid(field(record, "id")) {
            set.insert(id);
        }
    }
}

/// Check a required foreign key: first its shape, then that it resolves
///
/// Appends at most one error. Malformed and dangling references get distinct
/// messages.
pub(crate) fn check_reference(
    record: &Value,
    name: &str,
    known: &HashSet<Uuid>,
    dangling_message: &str,
    errors: &mut Vec<ValidationError>,
) {
    let value = field(record, name);
    match parse_uuid(value) {
        None => errors.push(ValidationError::new(
            name,
            format!("Invalid or missing {}", name),
            value,
        )),
        Some(id) if !known.contains(&id) => {
            errors.push(ValidationError::new(name, dangling_message, value))
        }
        Some(_) => {}
    }
}

/// Check that every element of an ID list looks like an ID
///
/// Tag references are soft: they are never resolved against the batch.
pub(crate) fn check_id_list(
    record: &Value,
    name: &str,
    element_message: &str,
    errors: &mut Vec<ValidationError>,
) {
    let value = field(record, name);
    let Some(items) = value.and_then(Value::as_array) else {
        errors.push(ValidationError::new(
            name,
            format!("{} must be an array", name),
            value,
        ));
        return;
    };

    for (i, item) in items.iter().enumerate() {
        if parse_uuid(Some(item)).is_none() {
            errors.push(ValidationError::new(
                format!("{}[{}]", name, i),
                element_message,
                Some(item),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_messages() {
        let known_id = Uuid::new_v4();
        let known: HashSet<Uuid> = [known_id].into_iter().collect();

        let mut errors = Vec::new();
        check_reference(
            &json!({ "accountId": known_id.to_string() }),
            "accountId",
            &known,
            "Referenced account does not exist",
            &mut errors,
        );
        assert!(errors.is_empty());

        check_reference(
            &json!({ "accountId": Uuid::new_v4().to_string() }),
            "accountId",
            &known,
            "Referenced account does not exist",
            &mut errors,
        );
        check_reference(
            &json!({ "accountId": "nope" }),
            "accountId",
            &known,
            "Referenced account does not exist",
            &mut errors,
        );
        assert_eq!(errors[0].message, "Referenced account does not exist");
        assert_eq!(errors[1].message, "Invalid or missing accountId");
    }

    #[test]
    fn test_reference_matching_ignores_case() {
        let id = Uuid::new_v4();
        let known: HashSet<Uuid> = [id].into_iter().collect();
        let mut errors = Vec::new();
        check_reference(
            &json!({ "categoryId": id.to_string().to_uppercase() }),
            "categoryId",
            &known,
            "Referenced category does not exist",
            &mut errors,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_id_list() {
        let mut errors = Vec::new();
        check_id_list(
            &json!({ "tagIds": [Uuid::new_v4().to_string(), "bad", 7] }),
            "tagIds",
            "Invalid tag ID",
            &mut errors,
        );
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["tagIds[1]", "tagIds[2]"]);

        errors.clear();
        check_id_list(&json!({}), "tagIds", "Invalid tag ID", &mut errors);
        assert_eq!(errors[0].message, "tagIds must be an array");
    }

    #[test]
    fn test_collect_skips_malformed_ids() {
        let mut set = HashSet::new();
        ReferenceSet::collect(&mut set, &json!({ "id": "x" }));
        ReferenceSet::collect(&mut set, &json!({ "id": Uuid::new_v4().to_string() }));
        assert_eq!(set.len(), 1);
    }
}
