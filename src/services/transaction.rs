//! Transaction service
//!
//! Provides business logic for transaction management. Every change to a
//! transaction moves the owning account's balance in the same storage
//! transaction: income adds its amount, expense subtracts it.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::audit::AuditEntry;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, EntityKind, Tag, TagId, Transaction, TransactionId,
    TransactionType,
};
use crate::storage::{Store, TransactionMode, UnitOfWork};

use super::{audit_update, require, required_text};

/// Collections a balance-affecting change touches
const SCOPE: [EntityKind; 4] = [
    EntityKind::Account,
    EntityKind::Category,
    EntityKind::Tag,
    EntityKind::Transaction,
];

/// Service for transaction management
pub struct TransactionService<'a, S: Store> {
    store: &'a S,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    /// Inclusive lower bound on the transaction date
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the transaction date
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the vendor
    pub vendor: Option<String>,
    /// Match transactions carrying any of these tags
    pub tag_ids: Vec<TagId>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn tags(mut self, tag_ids: Vec<TagId>) -> Self {
        self.tag_ids = tag_ids;
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every criterion
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self.account_id.is_some_and(|id| id != transaction.account_id) {
            return false;
        }
        if self.category_id.is_some_and(|id| id != transaction.category_id) {
            return false;
        }
        if self
            .transaction_type
            .is_some_and(|t| t != transaction.transaction_type)
        {
            return false;
        }
        if self.start_date.is_some_and(|start| transaction.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| transaction.date > end) {
            return false;
        }
        if let Some(vendor) = &self.vendor {
            if !transaction
                .vendor
                .to_lowercase()
                .contains(&vendor.to_lowercase())
            {
                return false;
            }
        }
        self.tag_ids.is_empty() || self.tag_ids.iter().any(|t| transaction.has_tag(*t))
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub category_id: CategoryId,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub vendor: String,
    pub notes: Option<String>,
    pub tag_ids: Vec<TagId>,
}

/// Fields that may change on an existing transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub vendor: Option<String>,
    pub notes: Option<String>,
    pub tag_ids: Option<Vec<TagId>>,
}

impl<'a, S: Store> TransactionService<'a, S> {
    /// Create a new transaction service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record a transaction and apply it to its account's balance
    pub fn create(&self, input: NewTransaction) -> PiggyBankResult<Transaction> {
        check_amount(input.amount)?;

        let mut transaction = Transaction::new(
            input.account_id,
            input.category_id,
            input.transaction_type,
            input.amount,
            input.date,
            required_text(&input.vendor, "Vendor")?,
        );
        transaction.notes = input.notes.filter(|n| !n.trim().is_empty());
        transaction.tag_ids = input.tag_ids;

        self.store
            .transaction(TransactionMode::ReadWrite, &SCOPE, |tx| {
                check_references(tx, &transaction)?;
                apply(tx, transaction.account_id, transaction.signed_amount())?;
                tx.add(transaction.clone())
            })?;

        debug!(
            account = %transaction.account_id,
            amount = transaction.signed_amount(),
            "recorded transaction"
        );
        self.store.audit(&AuditEntry::create(&transaction));
        Ok(transaction)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> PiggyBankResult<Option<Transaction>> {
        self.store.get(id)
    }

    /// Find a transaction by ID string
    pub fn find(&self, identifier: &str) -> PiggyBankResult<Option<Transaction>> {
        match identifier.trim().parse::<TransactionId>() {
            Ok(id) => self.get(id),
            Err(_) => Ok(None),
        }
    }

    /// All transactions, newest first
    pub fn list(&self) -> PiggyBankResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self.store.get_all()?;
        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(transactions)
    }

    /// Transactions passing `filter`, newest first
    pub fn filter(&self, filter: &TransactionFilter) -> PiggyBankResult<Vec<Transaction>> {
        let mut transactions = self.list()?;
        transactions.retain(|t| filter.matches(t));
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Update a transaction, moving its effect between balances as needed
    pub fn update(
        &self,
        id: TransactionId,
        changes: TransactionUpdate,
    ) -> PiggyBankResult<Transaction> {
        if let Some(amount) = changes.amount {
            check_amount(amount)?;
        }

        let (before, after) = self
            .store
            .transaction(TransactionMode::ReadWrite, &SCOPE, |tx| {
                let before: Transaction = require(tx, id)?;
                let mut after = before.clone();

                if let Some(account_id) = changes.account_id {
                    after.account_id = account_id;
                }
                if let Some(category_id) = changes.category_id {
                    after.category_id = category_id;
                }
                if let Some(transaction_type) = changes.transaction_type {
                    after.transaction_type = transaction_type;
                }
                if let Some(amount) = changes.amount {
                    after.amount = amount;
                }
                if let Some(date) = changes.date {
                    after.date = date;
                }
                if let Some(vendor) = &changes.vendor {
                    after.vendor = required_text(vendor, "Vendor")?;
                }
                if let Some(notes) = &changes.notes {
                    after.notes = Some(notes.clone()).filter(|n| !n.trim().is_empty());
                }
                if let Some(tag_ids) = &changes.tag_ids {
                    after.tag_ids = tag_ids.clone();
                }

                check_references(tx, &after)?;
                apply(tx, before.account_id, -before.signed_amount())?;
                apply(tx, after.account_id, after.signed_amount())?;

                after.touch();
                tx.put(after.clone())?;
                Ok((before, after))
            })?;

        audit_update(self.store, &before, &after);
        Ok(after)
    }

    /// Delete a transaction and take its effect off the account balance
    pub fn delete(&self, id: TransactionId) -> PiggyBankResult<Transaction> {
        let transaction = self
            .store
            .transaction(TransactionMode::ReadWrite, &SCOPE, |tx| {
                let transaction: Transaction = require(tx, id)?;
                if tx.get::<Account>(transaction.account_id)?.is_some() {
                    apply(tx, transaction.account_id, -transaction.signed_amount())?;
                }
                tx.delete::<Transaction>(id)?;
                Ok(transaction)
            })?;

        self.store.audit(&AuditEntry::delete(&transaction));
        Ok(transaction)
    }
}

fn check_amount(amount: f64) -> PiggyBankResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(PiggyBankError::Validation(
            "Amount must be a non-negative number".into(),
        ));
    }
    Ok(())
}

fn check_references(tx: &UnitOfWork<'_>, transaction: &Transaction) -> PiggyBankResult<()> {
    require::<Account>(tx, transaction.account_id)?;
    require::<Category>(tx, transaction.category_id)?;
    for tag_id in &transaction.tag_ids {
        require::<Tag>(tx, *tag_id)?;
    }
    Ok(())
}

/// Move an account's balance by `delta`
fn apply(tx: &mut UnitOfWork<'_>, account_id: AccountId, delta: f64) -> PiggyBankResult<()> {
    let mut account: Account = require(tx, account_id)?;
    account.adjust_balance(delta);
    tx.put(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, CategoryType};
    use crate::storage::Database;
    use chrono::{Duration, TimeZone};

    struct Fixture {
        db: Database,
        checking: Account,
        savings: Account,
        salary: Category,
        food: Category,
        tag: Tag,
    }

    fn fixture() -> Fixture {
        let db = Database::in_memory();
        let checking = Account::with_balance("Checking", AccountType::Checking, "USD", 100.0);
        let savings = Account::new("Savings", AccountType::Savings, "USD");
        let salary = Category::new("Salary", CategoryType::Income, "#22c55e");
        let food = Category::new("Food", CategoryType::Expense, "#f97316");
        let tag = Tag::new("weekend", "#000000");

        db.bulk_add(vec![checking.clone(), savings.clone()]).unwrap();
        db.bulk_add(vec![salary.clone(), food.clone()]).unwrap();
        db.bulk_add(vec![tag.clone()]).unwrap();

        Fixture {
            db,
            checking,
            savings,
            salary,
            food,
            tag,
        }
    }

    fn input(f: &Fixture, transaction_type: TransactionType, amount: f64) -> NewTransaction {
        NewTransaction {
            account_id: f.checking.id,
            category_id: match transaction_type {
                TransactionType::Income => f.salary.id,
                TransactionType::Expense => f.food.id,
            },
            transaction_type,
            amount,
            date: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            vendor: "Vendor".into(),
            notes: None,
            tag_ids: Vec::new(),
        }
    }

    fn balance(f: &Fixture, id: AccountId) -> f64 {
        f.db.get::<Account>(id).unwrap().unwrap().balance
    }

    #[test]
    fn test_create_adjusts_balance() {
        let f = fixture();
        let service = TransactionService::new(&f.db);

        service.create(input(&f, TransactionType::Expense, 30.0)).unwrap();
        assert_eq!(balance(&f, f.checking.id), 70.0);

        service.create(input(&f, TransactionType::Income, 50.0)).unwrap();
        assert_eq!(balance(&f, f.checking.id), 120.0);
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let f = fixture();
        let service = TransactionService::new(&f.db);

        let mut bad = input(&f, TransactionType::Expense, 30.0);
        bad.category_id = CategoryId::new();
        assert!(service.create(bad).unwrap_err().is_not_found());

        assert_eq!(balance(&f, f.checking.id), 100.0);
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_negative_amount() {
        let f = fixture();
        let service = TransactionService::new(&f.db);
        assert!(service
            .create(input(&f, TransactionType::Expense, -1.0))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_update_moves_effect() {
        let f = fixture();
        let service = TransactionService::new(&f.db);
        let created = service.create(input(&f, TransactionType::Expense, 30.0)).unwrap();

        service
            .update(
                created.id,
                TransactionUpdate {
                    amount: Some(10.0),
                    ..TransactionUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(balance(&f, f.checking.id), 90.0);

        let moved = service
            .update(
                created.id,
                TransactionUpdate {
                    account_id: Some(f.savings.id),
                    transaction_type: Some(TransactionType::Income),
                    category_id: Some(f.salary.id),
                    ..TransactionUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(moved.account_id, f.savings.id);
        assert_eq!(balance(&f, f.checking.id), 100.0);
        assert_eq!(balance(&f, f.savings.id), 10.0);
    }

    #[test]
    fn test_delete_reverts_effect() {
        let f = fixture();
        let service = TransactionService::new(&f.db);
        let created = service.create(input(&f, TransactionType::Expense, 40.0)).unwrap();

        service.delete(created.id).unwrap();
        assert_eq!(balance(&f, f.checking.id), 100.0);
        assert!(service.get(created.id).unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let f = fixture();
        let service = TransactionService::new(&f.db);

        let mut older = input(&f, TransactionType::Expense, 1.0);
        older.date -= Duration::days(3);
        older.vendor = "Older".into();
        service.create(older).unwrap();
        service.create(input(&f, TransactionType::Expense, 2.0)).unwrap();

        let listed = service.list().unwrap();
        assert_eq!(listed[0].vendor, "Vendor");
        assert_eq!(listed[1].vendor, "Older");
    }

    #[test]
    fn test_filter() {
        let f = fixture();
        let service = TransactionService::new(&f.db);

        let mut tagged = input(&f, TransactionType::Expense, 5.0);
        tagged.vendor = "Corner Cafe".into();
        tagged.tag_ids = vec![f.tag.id];
        service.create(tagged).unwrap();
        service.create(input(&f, TransactionType::Income, 500.0)).unwrap();

        let by_vendor = service
            .filter(&TransactionFilter::new().vendor("cafe"))
            .unwrap();
        assert_eq!(by_vendor.len(), 1);

        let by_tag = service
            .filter(&TransactionFilter::new().tags(vec![f.tag.id, TagId::new()]))
            .unwrap();
        assert_eq!(by_tag.len(), 1);

        let income = service
            .filter(&TransactionFilter::new().transaction_type(TransactionType::Income))
            .unwrap();
        assert_eq!(income[0].amount, 500.0);

        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let none = service
            .filter(&TransactionFilter::new().date_range(Some(later), None))
            .unwrap();
        assert!(none.is_empty());

        let limited = service
            .filter(&TransactionFilter::new().account(f.checking.id).limit(1))
            .unwrap();
        assert_eq!(limited.len(), 1);
    }
}
