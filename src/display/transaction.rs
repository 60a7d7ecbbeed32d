//! Transaction display formatting
//!
//! Register-style rows: date, type marker, vendor, signed amount.

use crate::models::{Transaction, TransactionType};

use super::truncate;

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction) -> String {
    let marker = match txn.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    let tags = if txn.tag_ids.is_empty() {
        String::new()
    } else {
        format!(" [{} tag(s)]", txn.tag_ids.len())
    };

    format!(
        "{} {} {:24} {:>12.2}  {}{}",
        marker,
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.vendor, 24),
        txn.signed_amount(),
        txn.id.short(),
        tags
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:10} {:24} {:>12}  {}\n",
        "", "Date", "Vendor", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    let total: f64 = transactions.iter().map(Transaction::signed_amount).sum();
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!("{:37} {:>12.2}\n", "Net", total));

    output
}
