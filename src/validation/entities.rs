//! Per-kind record validators
//!
//! Each validator takes one loosely typed record and returns every problem
//! it finds. Records that are not JSON objects fail every required field.

use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

use super::references::{check_id_list, check_reference};
use super::{
    field, is_finite_number, is_non_empty_string, is_valid_date, is_valid_optional_date,
    parse_uuid, ValidationError,
};
use crate::models::{AccountType, BudgetPeriod, CategoryType};

/// Validate an account record
pub fn validate_account(account: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_id(account, &mut errors);
    check_required_string(account, "name", &mut errors);
    check_enum(account, "type", &AccountType::NAMES, "Invalid account type", &mut errors);
    check_number(account, "balance", "Invalid balance", &mut errors);
    check_required_string(account, "currency", &mut errors);
    for name in ["color", "icon", "bankId"] {
        check_optional_string(account, name, &mut errors);
    }
    check_timestamps(account, &mut errors);

    let last_reviewed = field(account, "lastReviewedAt");
    if !is_valid_optional_date(last_reviewed) {
        errors.push(ValidationError::new(
            "lastReviewedAt",
            "Invalid lastReviewedAt date",
            last_reviewed,
        ));
    }

    if let Some(details) = field(account, "creditCardDetails") {
        if details.is_object() {
            errors.extend(
                validate_credit_card_details(details)
                    .into_iter()
                    .map(|e| e.prefixed("creditCardDetails")),
            );
        } else {
            errors.push(ValidationError::new(
                "creditCardDetails",
                "Invalid creditCardDetails",
                Some(details),
            ));
        }
    }

    errors
}

fn validate_credit_card_details(details: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, message) in [
        ("interestRate", "Invalid interestRate"),
        ("creditLimit", "Invalid creditLimit"),
    ] {
        let value = details.get(name);
        if value.is_some() && !is_finite_number(value) {
            errors.push(ValidationError::new(name, message, value));
        }
    }

    let statement_day = field(details, "statementDay");
    if let Some(day) = statement_day {
        if !day.as_u64().is_some_and(|d| (1..=31).contains(&d)) {
            errors.push(ValidationError::new(
                "statementDay",
                "Invalid statementDay (must be 1-31)",
                Some(day),
            ));
        }
    }

    errors
}

/// Validate a category record
pub fn validate_category(category: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_id(category, &mut errors);
    check_required_string(category, "name", &mut errors);
    check_enum(category, "type", &CategoryType::NAMES, "Invalid category type", &mut errors);
    check_required_string(category, "color", &mut errors);
    check_optional_string(category, "icon", &mut errors);

    let is_default = category.get("isDefault");
    if !is_default.is_some_and(Value::is_boolean) {
        errors.push(ValidationError::new("isDefault", "Invalid isDefault", is_default));
    }

    check_timestamps(category, &mut errors);
    errors
}

/// Validate a tag record
pub fn validate_tag(tag: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_id(tag, &mut errors);
    check_required_string(tag, "name", &mut errors);
    check_required_string(tag, "color", &mut errors);
    check_timestamps(tag, &mut errors);

    errors
}

/// Validate a transaction record against the accounts and categories in its batch
///
/// Tag IDs are only checked for shape.
pub fn validate_transaction(
    transaction: &Value,
    account_ids: &HashSet<Uuid>,
    category_ids: &HashSet<Uuid>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_id(transaction, &mut errors);
    check_reference(
        transaction,
        "accountId",
        account_ids,
        "Referenced account does not exist",
        &mut errors,
    );
    check_reference(
        transaction,
        "categoryId",
        category_ids,
        "Referenced category does not exist",
        &mut errors,
    );
    check_number(transaction, "amount", "Invalid amount", &mut errors);
    check_enum(
        transaction,
        "type",
        &CategoryType::NAMES,
        "Invalid transaction type",
        &mut errors,
    );

    let date = field(transaction, "date");
    if !is_valid_date(date) {
        errors.push(ValidationError::new("date", "Invalid date", date));
    }

    check_required_string(transaction, "vendor", &mut errors);

    let notes = transaction.get("notes");
    if notes.is_some_and(|n| !n.is_string()) {
        errors.push(ValidationError::new("notes", "Invalid notes", notes));
    }

    check_id_list(transaction, "tagIds", "Invalid tag ID", &mut errors);
    check_timestamps(transaction, &mut errors);

    errors
}

/// Validate a budget record against the categories in its batch
pub fn validate_budget(budget: &Value, category_ids: &HashSet<Uuid>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_id(budget, &mut errors);
    check_reference(
        budget,
        "categoryId",
        category_ids,
        "Referenced category does not exist",
        &mut errors,
    );
    check_number(budget, "amount", "Invalid amount", &mut errors);
    check_enum(budget, "period", &BudgetPeriod::NAMES, "Invalid budget period", &mut errors);

    let start = field(budget, "startDate");
    if !is_valid_date(start) {
        errors.push(ValidationError::new("startDate", "Invalid startDate date", start));
    }

    let end = field(budget, "endDate");
    if !is_valid_optional_date(end) {
        errors.push(ValidationError::new("endDate", "Invalid endDate date", end));
    }

    check_timestamps(budget, &mut errors);
    errors
}

fn check_id(record: &Value, errors: &mut Vec<ValidationError>) {
    let id = field(record, "id");
    if parse_uuid(id).is_none() {
        errors.push(ValidationError::new("id", "Invalid or missing id", id));
    }
}

fn check_required_string(record: &Value, name: &str, errors: &mut Vec<ValidationError>) {
    let value = field(record, name);
    if !is_non_empty_string(value) {
        errors.push(ValidationError::new(
            name,
            format!("Invalid or missing {}", name),
            value,
        ));
    }
}

/// Absent and `null` are fine; anything else must be a string
fn check_optional_string(record: &Value, name: &str, errors: &mut Vec<ValidationError>) {
    let value = field(record, name);
    if value.is_some_and(|v| !v.is_string()) {
        errors.push(ValidationError::new(name, format!("Invalid {}", name), value));
    }
}

fn check_number(record: &Value, name: &str, message: &str, errors: &mut Vec<ValidationError>) {
    let value = field(record, name);
    if !is_finite_number(value) {
        errors.push(ValidationError::new(name, message, value));
    }
}

fn check_enum(
    record: &Value,
    name: &str,
    allowed: &[&str],
    message: &str,
    errors: &mut Vec<ValidationError>,
) {
    let value = field(record, name);
    let matches = value
        .and_then(Value::as_str)
        .is_some_and(|s| allowed.contains(&s));
    if !matches {
        errors.push(ValidationError::new(name, message, value));
    }
}

fn check_timestamps(record: &Value, errors: &mut Vec<ValidationError>) {
    for name in ["createdAt", "updatedAt"] {
        let value = field(record, name);
        if !is_valid_date(value) {
            errors.push(ValidationError::new(
                name,
                format!("Invalid {} date", name),
                value,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STAMP: &str = "2024-01-15T10:30:00.000Z";

    fn id() -> String {
        Uuid::new_v4().to_string()
    }

    fn account() -> Value {
        json!({
            "id": id(),
            "name": "Checking",
            "type": "checking",
            "balance": 1250.75,
            "currency": "USD",
            "createdAt": STAMP,
            "updatedAt": STAMP,
        })
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_account() {
        assert!(validate_account(&account()).is_empty());
    }

    #[test]
    fn test_account_collects_every_error() {
        let bad = json!({
            "id": "not-a-uuid",
            "name": "",
            "type": "invalid-type",
            "balance": "lots",
            "currency": null,
            "createdAt": "not-a-date",
            "updatedAt": STAMP,
        });
        assert_eq!(
            fields(&validate_account(&bad)),
            vec!["id", "name", "type", "balance", "currency", "createdAt"]
        );
    }

    #[test]
    fn test_account_negative_balance_is_fine() {
        let mut record = account();
        record["balance"] = json!(-500);
        assert!(validate_account(&record).is_empty());
    }

    #[test]
    fn test_credit_card_details() {
        let mut record = account();
        record["type"] = json!("credit");
        record["creditCardDetails"] = json!({
            "interestRate": "high",
            "statementDay": 32,
            "creditLimit": 5000,
        });
        let errors = validate_account(&record);
        assert_eq!(
            fields(&errors),
            vec!["creditCardDetails.interestRate", "creditCardDetails.statementDay"]
        );
        assert_eq!(errors[1].message, "Invalid statementDay (must be 1-31)");

        record["creditCardDetails"] = json!({ "statementDay": 1.5 });
        assert_eq!(
            fields(&validate_account(&record)),
            vec!["creditCardDetails.statementDay"]
        );

        record["creditCardDetails"] = json!({ "statementDay": 31 });
        assert!(validate_account(&record).is_empty());

        record["creditCardDetails"] = json!({ "interestRate": null, "creditLimit": null });
        assert_eq!(
            fields(&validate_account(&record)),
            vec!["creditCardDetails.interestRate", "creditCardDetails.creditLimit"]
        );
    }

    #[test]
    fn test_optional_display_strings() {
        let mut record = account();
        record["color"] = json!("#22c55e");
        record["icon"] = Value::Null;
        assert!(validate_account(&record).is_empty());

        record["color"] = json!(5);
        record["icon"] = json!(["wallet"]);
        record["bankId"] = json!({ "code": 1 });
        let errors = validate_account(&record);
        assert_eq!(fields(&errors), vec!["color", "icon", "bankId"]);
        assert_eq!(errors[0].message, "Invalid color");

        let category = json!({
            "id": id(),
            "name": "Food",
            "type": "expense",
            "color": "#f97316",
            "icon": false,
            "isDefault": false,
            "createdAt": STAMP,
            "updatedAt": STAMP,
        });
        assert_eq!(fields(&validate_category(&category)), vec!["icon"]);
    }

    #[test]
    fn test_non_object_record() {
        let errors = validate_tag(&json!("tag"));
        assert_eq!(
            fields(&errors),
            vec!["id", "name", "color", "createdAt", "updatedAt"]
        );
    }

    #[test]
    fn test_category_is_default_must_be_boolean() {
        let record = json!({
            "id": id(),
            "name": "Food",
            "type": "expense",
            "color": "#f97316",
            "isDefault": "yes",
            "createdAt": STAMP,
            "updatedAt": STAMP,
        });
        let errors = validate_category(&record);
        assert_eq!(fields(&errors), vec!["isDefault"]);
    }

    #[test]
    fn test_transaction_checks() {
        let account_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let accounts: HashSet<Uuid> = [account_id].into_iter().collect();
        let categories: HashSet<Uuid> = [category_id].into_iter().collect();

        let mut record = json!({
            "id": id(),
            "accountId": account_id.to_string(),
            "categoryId": category_id.to_string(),
            "amount": 12.5,
            "type": "expense",
            "date": "2024-01-15",
            "vendor": "Cafe",
            "tagIds": [],
            "createdAt": STAMP,
            "updatedAt": STAMP,
        });
        assert!(validate_transaction(&record, &accounts, &categories).is_empty());

        record["notes"] = json!(5);
        record["categoryId"] = json!(id());
        record["tagIds"] = json!(["bad"]);
        let errors = validate_transaction(&record, &accounts, &categories);
        assert_eq!(fields(&errors), vec!["categoryId", "notes", "tagIds[0]"]);
        assert_eq!(errors[0].message, "Referenced category does not exist");

        record["categoryId"] = json!(category_id.to_string());
        record["tagIds"] = json!([]);
        record["notes"] = Value::Null;
        let errors = validate_transaction(&record, &accounts, &categories);
        assert_eq!(fields(&errors), vec!["notes"]);
    }

    #[test]
    fn test_tag_existence_is_not_checked() {
        let account_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let record = json!({
            "id": id(),
            "accountId": account_id.to_string(),
            "categoryId": category_id.to_string(),
            "amount": 1,
            "type": "income",
            "date": STAMP,
            "vendor": "Employer",
            "tagIds": [id()],
            "createdAt": STAMP,
            "updatedAt": STAMP,
        });
        let errors = validate_transaction(
            &record,
            &[account_id].into_iter().collect(),
            &[category_id].into_iter().collect(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_budget_checks() {
        let category_id = Uuid::new_v4();
        let categories: HashSet<Uuid> = [category_id].into_iter().collect();
        let mut record = json!({
            "id": id(),
            "categoryId": category_id.to_string(),
            "amount": 400,
            "period": "monthly",
            "startDate": STAMP,
            "endDate": null,
            "createdAt": STAMP,
            "updatedAt": STAMP,
        });
        assert!(validate_budget(&record, &categories).is_empty());

        record["period"] = json!("daily");
        record["endDate"] = json!("someday");
        record["categoryId"] = json!(id());
        let errors = validate_budget(&record, &categories);
        assert_eq!(fields(&errors), vec!["categoryId", "period", "endDate"]);
    }
}
