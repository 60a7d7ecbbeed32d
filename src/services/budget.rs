//! Budget service
//!
//! Budgets cap spending in one category per period.

use chrono::{DateTime, Utc};

use crate::audit::AuditEntry;
use crate::error::{PiggyBankError, PiggyBankResult};
use crate::models::{Budget, BudgetId, BudgetPeriod, Category, CategoryId, EntityKind};
use crate::storage::{Store, TransactionMode};

use super::{audit_update, require};

/// Service for budget management
pub struct BudgetService<'a, S: Store> {
    store: &'a S,
}

/// Fields that may change on an existing budget
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub amount: Option<f64>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<DateTime<Utc>>,
    /// `Some(None)` makes the budget open-ended
    pub end_date: Option<Option<DateTime<Utc>>>,
}

impl<'a, S: Store> BudgetService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a budget for an existing category
    pub fn create(
        &self,
        category_id: CategoryId,
        amount: f64,
        period: BudgetPeriod,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> PiggyBankResult<Budget> {
        let mut budget = Budget::new(category_id, amount, period, start_date);
        budget.end_date = end_date;
        check(&budget)?;

        self.store.transaction(
            TransactionMode::ReadWrite,
            &[EntityKind::Category, EntityKind::Budget],
            |tx| {
                require::<Category>(tx, category_id)?;
                tx.add(budget.clone())
            },
        )?;

        self.store.audit(&AuditEntry::create(&budget));
        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> PiggyBankResult<Option<Budget>> {
        self.store.get(id)
    }

    /// Find a budget by ID string
    pub fn find(&self, identifier: &str) -> PiggyBankResult<Option<Budget>> {
        match identifier.trim().parse::<BudgetId>() {
            Ok(id) => self.get(id),
            Err(_) => Ok(None),
        }
    }

    pub fn list(&self) -> PiggyBankResult<Vec<Budget>> {
        self.store.get_all()
    }

    /// Budgets attached to one category
    pub fn list_by_category(&self, category_id: CategoryId) -> PiggyBankResult<Vec<Budget>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|b| b.category_id == category_id)
            .collect())
    }

    /// Update a budget
    pub fn update(&self, id: BudgetId, changes: BudgetUpdate) -> PiggyBankResult<Budget> {
        let (before, after) =
            self.store
                .transaction(TransactionMode::ReadWrite, &[EntityKind::Budget], |tx| {
                    let before: Budget = require(tx, id)?;
                    let mut budget = before.clone();

                    if let Some(amount) = changes.amount {
                        budget.amount = amount;
                    }
                    if let Some(period) = changes.period {
                        budget.period = period;
                    }
                    if let Some(start_date) = changes.start_date {
                        budget.start_date = start_date;
                    }
                    if let Some(end_date) = changes.end_date {
                        budget.end_date = end_date;
                    }

                    check(&budget)?;
                    budget.touch();
                    tx.put(budget.clone())?;
                    Ok((before, budget))
                })?;

        audit_update(self.store, &before, &after);
        Ok(after)
    }

    /// Delete a budget
    pub fn delete(&self, id: BudgetId) -> PiggyBankResult<Budget> {
        let budget = self
            .store
            .transaction(TransactionMode::ReadWrite, &[EntityKind::Budget], |tx| {
                tx.delete::<Budget>(id)?
                    .ok_or_else(|| PiggyBankError::budget_not_found(id.to_string()))
            })?;

        self.store.audit(&AuditEntry::delete(&budget));
        Ok(budget)
    }
}

fn check(budget: &Budget) -> PiggyBankResult<()> {
    if !budget.amount.is_finite() || budget.amount < 0.0 {
        return Err(PiggyBankError::Validation(
            "Budget amount must be a non-negative number".into(),
        ));
    }
    if budget.end_date.is_some_and(|end| end < budget.start_date) {
        return Err(PiggyBankError::Validation(
            "Budget end date is before its start date".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryType;
    use crate::storage::Database;
    use chrono::{Duration, TimeZone};

    fn setup() -> (Database, Category) {
        let db = Database::in_memory();
        let category = Category::new("Food", CategoryType::Expense, "#f97316");
        db.bulk_add(vec![category.clone()]).unwrap();
        (db, category)
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_create_budget() {
        let (db, category) = setup();
        let service = BudgetService::new(&db);

        let budget = service
            .create(category.id, 400.0, BudgetPeriod::Monthly, start(), None)
            .unwrap();
        assert_eq!(service.list_by_category(category.id).unwrap(), vec![budget]);
        assert!(service
            .list_by_category(CategoryId::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_create_requires_category() {
        let (db, _) = setup();
        let service = BudgetService::new(&db);

        let err = service
            .create(CategoryId::new(), 400.0, BudgetPeriod::Monthly, start(), None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let (db, category) = setup();
        let service = BudgetService::new(&db);

        let result = service.create(
            category.id,
            400.0,
            BudgetPeriod::Weekly,
            start(),
            Some(start() - Duration::days(1)),
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_update_and_delete() {
        let (db, category) = setup();
        let service = BudgetService::new(&db);
        let budget = service
            .create(category.id, 400.0, BudgetPeriod::Monthly, start(), None)
            .unwrap();

        let updated = service
            .update(
                budget.id,
                BudgetUpdate {
                    amount: Some(450.0),
                    period: Some(BudgetPeriod::Yearly),
                    ..BudgetUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, 450.0);
        assert_eq!(updated.period, BudgetPeriod::Yearly);

        service.delete(budget.id).unwrap();
        assert!(service.list().unwrap().is_empty());
        assert!(service.delete(budget.id).unwrap_err().is_not_found());
    }
}
