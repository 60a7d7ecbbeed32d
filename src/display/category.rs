//! Category, tag and budget display formatting

use crate::models::{Budget, Category, CategoryType, Tag};

use super::column_width;

/// Format categories as a table, income first
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by_key(|c| c.category_type == CategoryType::Expense);

    let name_width = column_width("Name", sorted.iter().map(|c| c.name.chars().count()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<7}  {:<8}  {}\n",
        "Name", "Type", "Color", "ID"
    ));
    output.push_str(&format!("{:-<name_width$}  {:-<7}  {:-<8}  {:-<8}\n", "", "", "", ""));

    for category in sorted {
        let marker = if category.is_default { " *" } else { "" };
        output.push_str(&format!(
            "{:<name_width$}  {:<7}  {:<8}  {}{}\n",
            category.name,
            category.category_type.to_string(),
            category.color,
            category.id.short(),
            marker,
        ));
    }

    output.push_str("\n* built-in category\n");
    output
}

/// Format tags as a list
pub fn format_tag_list(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "No tags found.\n".to_string();
    }

    tags.iter()
        .map(|t| format!("{}  {}  {}\n", t, t.color, t.id.short()))
        .collect()
}

/// Format budgets with their category names
pub fn format_budget_list(budgets: &[Budget], categories: &[Category]) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let category_name = |budget: &Budget| {
        categories
            .iter()
            .find(|c| c.id == budget.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "(unknown)".to_string())
    };
    let name_width = column_width(
        "Category",
        budgets.iter().map(|b| category_name(b).chars().count()),
    );

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>12}  {:<10}  {:<10}  {}\n",
        "Category", "Period", "Amount", "Start", "End", "ID"
    ));

    for budget in budgets {
        let end = budget
            .end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:>12.2}  {:<10}  {:<10}  {}\n",
            category_name(budget),
            budget.period.to_string(),
            budget.amount,
            budget.start_date.format("%Y-%m-%d"),
            end,
            budget.id.short(),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_categories, BudgetPeriod};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_category_list_marks_defaults() {
        let mut categories = default_categories();
        categories.push(Category::new("Pets", CategoryType::Expense, "#123456"));

        let output = format_category_list(&categories);
        assert!(output.contains("Salary"));
        assert!(output.contains("built-in"));
        assert!(output.find("Salary").unwrap() < output.find("Housing").unwrap());
    }

    #[test]
    fn test_budget_list() {
        let food = Category::new("Food", CategoryType::Expense, "#f97316");
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let budget = Budget::new(food.id, 400.0, BudgetPeriod::Monthly, start);

        let output = format_budget_list(&[budget], &[food]);
        assert!(output.contains("Food"));
        assert!(output.contains("400.00"));
        assert!(output.contains("2024-01-01"));
    }

    #[test]
    fn test_tag_list() {
        let output = format_tag_list(&[Tag::new("trip", "#00ff00")]);
        assert!(output.starts_with("#trip"));
    }
}
