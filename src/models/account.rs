//! Account model
//!
//! Represents financial accounts (checking, savings, credit cards, etc.)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::{Entity, EntityKind};
use crate::dates;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Checking account
    #[default]
    Checking,
    /// Savings account
    Savings,
    /// Credit card
    Credit,
    /// Debit card
    Debit,
    /// Investment account
    Investment,
}

impl AccountType {
    /// Wire names accepted on import
    pub const NAMES: [&'static str; 5] = ["checking", "savings", "credit", "debit", "investment"];

    /// Returns true if a balance on this account is money owed
    pub fn is_liability(&self) -> bool {
        matches!(self, Self::Credit)
    }

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" | "credit_card" | "creditcard" => Some(Self::Credit),
            "debit" | "debit_card" | "debitcard" => Some(Self::Debit),
            "investment" => Some(Self::Investment),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::Credit => write!(f, "Credit Card"),
            Self::Debit => write!(f, "Debit Card"),
            Self::Investment => write!(f, "Investment"),
        }
    }
}

/// Extra terms tracked for credit card accounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDetails {
    /// APR percentage (e.g. 18.99)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,

    /// Day of month the statement closes (1-31)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_day: Option<u8>,

    /// Credit limit amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
}

/// A financial account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Current balance, negative when overdrawn or owed
    pub balance: f64,

    /// ISO currency code
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Identifier of the issuing bank, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_details: Option<CreditCardDetails>,

    /// When the user last reviewed this account
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        name: impl Into<String>,
        account_type: AccountType,
        currency: impl Into<String>,
    ) -> Self {
        let now = dates::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
            balance: 0.0,
            currency: currency.into(),
            color: None,
            icon: None,
            bank_id: None,
            credit_card_details: None,
            last_reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with an opening balance
    pub fn with_balance(
        name: impl Into<String>,
        account_type: AccountType,
        currency: impl Into<String>,
        balance: f64,
    ) -> Self {
        let mut account = Self::new(name, account_type, currency);
        account.balance = balance;
        account
    }

    /// Apply a signed change to the balance
    pub fn adjust_balance(&mut self, delta: f64) {
        self.balance += delta;
        self.touch();
    }

    /// Record that the account was reviewed now
    pub fn mark_reviewed(&mut self) {
        let now = dates::now();
        self.last_reviewed_at = Some(now);
        self.updated_at = now;
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = dates::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.currency.trim().is_empty() {
            return Err(AccountValidationError::EmptyCurrency);
        }

        if !self.balance.is_finite() {
            return Err(AccountValidationError::InvalidBalance);
        }

        if let Some(day) = self.credit_card_details.as_ref().and_then(|d| d.statement_day) {
            if !(1..=31).contains(&day) {
                return Err(AccountValidationError::InvalidStatementDay(day));
            }
        }

        Ok(())
    }
}

impl Entity for Account {
    type Id = AccountId;
    const KIND: EntityKind = EntityKind::Account;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt", "lastReviewedAt"];

    fn id(&self) -> AccountId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    EmptyCurrency,
    InvalidBalance,
    InvalidStatementDay(u8),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::EmptyCurrency => write!(f, "Account currency cannot be empty"),
            Self::InvalidBalance => write!(f, "Account balance must be a finite number"),
            Self::InvalidStatementDay(day) => {
                write!(f, "Statement day {} is outside 1-31", day)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
