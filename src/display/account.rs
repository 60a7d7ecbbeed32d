//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::Account;

use super::{column_width, format_amount};

/// Format a list of accounts as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let name_width = column_width("Name", accounts.iter().map(|a| a.name.chars().count()));
    let type_width = column_width(
        "Type",
        accounts.iter().map(|a| a.account_type.to_string().len()),
    );

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>16}  {}\n",
        "Name", "Type", "Balance", "ID",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<type_width$}  {:->16}  {:-<8}\n",
        "", "", "", "",
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<name_width$}  {:<type_width$}  {:>16}  {}\n",
            account.name,
            account.account_type.to_string(),
            format_amount(account.balance, &account.currency),
            account.id.short(),
        ));
    }

    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:           {}\n", account.account_type));
    output.push_str(&format!("  ID:             {}\n", account.id));
    output.push_str(&format!(
        "  Balance:        {}\n",
        format_amount(account.balance, &account.currency)
    ));

    if let Some(details) = &account.credit_card_details {
        if let Some(limit) = details.credit_limit {
            output.push_str(&format!(
                "  Credit Limit:   {}\n",
                format_amount(limit, &account.currency)
            ));
        }
        if let Some(rate) = details.interest_rate {
            output.push_str(&format!("  Interest Rate:  {:.2}%\n", rate));
        }
        if let Some(day) = details.statement_day {
            output.push_str(&format!("  Statement Day:  {}\n", day));
        }
    }

    let reviewed = account
        .last_reviewed_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string());
    output.push_str(&format!("  Last Reviewed:  {}\n", reviewed));
    output.push_str(&format!(
        "  Created:        {}\n",
        account.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
