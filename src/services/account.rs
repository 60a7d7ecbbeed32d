//! Account service
//!
//! Provides business logic for account management: creation, lookup,
//! updates, review tracking and balance adjustments.

use tracing::debug;

use crate::audit::AuditEntry;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Account, AccountId, AccountType, CreditCardDetails, EntityKind, Transaction};
use crate::storage::{Store, TransactionMode};

use super::{audit_update, require, required_text};

/// Service for account management
pub struct AccountService<'a, S: Store> {
    store: &'a S,
}

/// Fields that may change on an existing account
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub currency: Option<String>,
    /// `Some(None)` removes the details
    pub credit_card_details: Option<Option<CreditCardDetails>>,
}

impl<'a, S: Store> AccountService<'a, S> {
    /// Create a new account service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        currency: &str,
        balance: f64,
    ) -> PiggyBankResult<Account> {
        let name = required_text(name, "Account name")?;
        let account = Account::with_balance(name, account_type, currency.trim(), balance);
        account
            .validate()
            .map_err(|e| PiggyBankError::Validation(e.to_string()))?;

        self.store
            .transaction(TransactionMode::ReadWrite, &[EntityKind::Account], |tx| {
                tx.add(account.clone())
            })?;

        self.store.audit(&AuditEntry::create(&account));
        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> PiggyBankResult<Option<Account>> {
        self.store.get(id)
    }

    /// Find an account by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> PiggyBankResult<Option<Account>> {
        let accounts = self.list()?;

        if let Some(account) = accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(identifier.trim()))
        {
            return Ok(Some(account.clone()));
        }

        Ok(identifier
            .trim()
            .parse::<AccountId>()
            .ok()
            .and_then(|id| accounts.into_iter().find(|a| a.id == id)))
    }

    /// Get all accounts
    pub fn list(&self) -> PiggyBankResult<Vec<Account>> {
        self.store.get_all()
    }

    /// Update an account
    pub fn update(&self, id: AccountId, changes: AccountUpdate) -> PiggyBankResult<Account> {
        let (before, after) =
            self.store
                .transaction(TransactionMode::ReadWrite, &[EntityKind::Account], |tx| {
                    let before: Account = require(tx, id)?;
                    let mut account = before.clone();

                    if let Some(name) = &changes.name {
                        account.name = required_text(name, "Account name")?;
                    }
                    if let Some(account_type) = changes.account_type {
                        account.account_type = account_type;
                    }
                    if let Some(currency) = &changes.currency {
                        account.currency = currency.trim().to_string();
                    }
                    if let Some(details) = changes.credit_card_details.clone() {
                        account.credit_card_details = details;
                    }

                    account
                        .validate()
                        .map_err(|e| PiggyBankError::Validation(e.to_string()))?;
                    account.touch();
                    tx.put(account.clone())?;
                    Ok((before, account))
                })?;

        audit_update(self.store, &before, &after);
        Ok(after)
    }

    /// Record that the account was reviewed
    pub fn mark_reviewed(&self, id: AccountId) -> PiggyBankResult<Account> {
        self.modify(id, |account| account.mark_reviewed())
    }

    /// Apply a signed change to the account balance
    pub fn adjust_balance(&self, id: AccountId, delta: f64) -> PiggyBankResult<Account> {
        if !delta.is_finite() {
            return Err(PiggyBankError::Validation(
                "Balance adjustment must be a finite number".into(),
            ));
        }
        let account = self.modify(id, |account| account.adjust_balance(delta))?;
        debug!(account = %account.name, delta, balance = account.balance, "adjusted balance");
        Ok(account)
    }

    /// Delete an account
    ///
    /// Accounts that still own transactions cannot be deleted.
    pub fn delete(&self, id: AccountId) -> PiggyBankResult<Account> {
        let account = self.store.transaction(
            TransactionMode::ReadWrite,
            &[EntityKind::Account, EntityKind::Transaction],
            |tx| {
                let account: Account = require(tx, id)?;
                let owned = tx
                    .get_all::<Transaction>()?
                    .iter()
                    .filter(|t| t.account_id == id)
                    .count();
                if owned > 0 {
                    return Err(PiggyBankError::Validation(format!(
                        "Account '{}' still has {} transaction(s)",
                        account.name, owned
                    )));
                }
                tx.delete::<Account>(id)?;
                Ok(account)
            },
        )?;

        self.store.audit(&AuditEntry::delete(&account));
        Ok(account)
    }

    fn modify(&self, id: AccountId, change: impl FnOnce(&mut Account)) -> PiggyBankResult<Account> {
        let (before, after) =
            self.store
                .transaction(TransactionMode::ReadWrite, &[EntityKind::Account], |tx| {
                    let before: Account = require(tx, id)?;
                    let mut account = before.clone();
                    change(&mut account);
                    tx.put(account.clone())?;
                    Ok((before, account))
                })?;

        audit_update(self.store, &before, &after);
        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, TransactionType};
    use crate::storage::Database;
    use chrono::Utc;

    #[test]
    fn test_create_account() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);

        let account = service
            .create("  Checking  ", AccountType::Checking, "USD", 100.0)
            .unwrap();
        assert_eq!(account.name, "Checking");
        assert_eq!(account.balance, 100.0);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);

        let err = service
            .create("   ", AccountType::Checking, "USD", 0.0)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);
        let account = service
            .create("Savings", AccountType::Savings, "USD", 0.0)
            .unwrap();

        assert_eq!(service.find("savings").unwrap().unwrap().id, account.id);
        assert_eq!(
            service.find(&account.id.to_string()).unwrap().unwrap().id,
            account.id
        );
        assert!(service.find("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_account() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);
        let account = service
            .create("Card", AccountType::Credit, "USD", 0.0)
            .unwrap();

        let updated = service
            .update(
                account.id,
                AccountUpdate {
                    name: Some("Travel Card".into()),
                    credit_card_details: Some(Some(CreditCardDetails {
                        statement_day: Some(15),
                        ..CreditCardDetails::default()
                    })),
                    ..AccountUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Travel Card");
        assert_eq!(
            updated.credit_card_details.unwrap().statement_day,
            Some(15)
        );
        assert!(updated.updated_at >= account.updated_at);
    }

    #[test]
    fn test_update_rejects_bad_statement_day() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);
        let account = service
            .create("Card", AccountType::Credit, "USD", 0.0)
            .unwrap();

        let result = service.update(
            account.id,
            AccountUpdate {
                credit_card_details: Some(Some(CreditCardDetails {
                    statement_day: Some(40),
                    ..CreditCardDetails::default()
                })),
                ..AccountUpdate::default()
            },
        );
        assert!(result.is_err());
        assert!(service.get(account.id).unwrap().unwrap().credit_card_details.is_none());
    }

    #[test]
    fn test_mark_reviewed_and_adjust() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);
        let account = service
            .create("Cash", AccountType::Debit, "USD", 10.0)
            .unwrap();

        let reviewed = service.mark_reviewed(account.id).unwrap();
        assert!(reviewed.last_reviewed_at.is_some());

        let adjusted = service.adjust_balance(account.id, -2.5).unwrap();
        assert_eq!(adjusted.balance, 7.5);
        assert!(service.adjust_balance(account.id, f64::NAN).is_err());
    }

    #[test]
    fn test_delete_refuses_account_with_transactions() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);
        let account = service
            .create("Checking", AccountType::Checking, "USD", 0.0)
            .unwrap();
        db.bulk_add(vec![Transaction::new(
            account.id,
            CategoryId::new(),
            TransactionType::Expense,
            5.0,
            Utc::now(),
            "Shop",
        )])
        .unwrap();

        assert!(service.delete(account.id).is_err());
        assert!(service.get(account.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_account() {
        let db = Database::in_memory();
        let service = AccountService::new(&db);
        let account = service
            .create("Checking", AccountType::Checking, "USD", 0.0)
            .unwrap();

        service.delete(account.id).unwrap();
        assert!(service.get(account.id).unwrap().is_none());
        assert!(service.delete(account.id).unwrap_err().is_not_found());
    }
}
