//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for the CLI.

pub mod account;
pub mod category;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use category::{format_budget_list, format_category_list, format_tag_list};
pub use transaction::{format_transaction_register, format_transaction_row};

/// Format a money amount with two decimals and a currency code
pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Widest of the header and every value
fn column_width(header: &str, values: impl Iterator<Item = usize>) -> usize {
    values.max().unwrap_or(0).max(header.chars().count())
}
