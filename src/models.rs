// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Kind of money holding. Stored as its text tag; parsed exactly once at the
/// boundary and never compared as loose text after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Cash,
    DebitCard,
    CreditCard,
    BankAccount,
    DigitalWallet,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Cash => "cash",
            AccountKind::DebitCard => "debit_card",
            AccountKind::CreditCard => "credit_card",
            AccountKind::BankAccount => "bank_account",
            AccountKind::DigitalWallet => "digital_wallet",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "cash" => Ok(AccountKind::Cash),
            "debit_card" => Ok(AccountKind::DebitCard),
            "credit_card" => Ok(AccountKind::CreditCard),
            "bank_account" => Ok(AccountKind::BankAccount),
            "digital_wallet" => Ok(AccountKind::DigitalWallet),
            other => Err(LedgerError::UnknownTag {
                field: "account kind",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(LedgerError::UnknownTag {
                field: "category kind",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Income,
    Expense,
    Transfer,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
            TxKind::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            "transfer" => Ok(TxKind::Transfer),
            other => Err(LedgerError::UnknownTag {
                field: "transaction kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle state. The only legal transition is `Scheduled -> Posted`;
/// a posted row never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Scheduled,
    Posted,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Scheduled => "scheduled",
            TxStatus::Posted => "posted",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "scheduled" => Ok(TxStatus::Scheduled),
            "posted" => Ok(TxStatus::Posted),
            other => Err(LedgerError::UnknownTag {
                field: "transaction status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Month,
    Week,
    Custom,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Month => "month",
            BudgetPeriod::Week => "week",
            BudgetPeriod::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "month" => Ok(BudgetPeriod::Month),
            "week" => Ok(BudgetPeriod::Week),
            "custom" => Ok(BudgetPeriod::Custom),
            other => Err(LedgerError::UnknownTag {
                field: "budget period",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetStatus {
    Future,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub balance: Decimal,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// None means a shared/system category visible to every owner.
    pub owner: Option<String>,
    pub kind: CategoryKind,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub account_id: i64,
    pub target_account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub kind: TxKind,
    pub date: NaiveDate,
    pub status: TxStatus,
    pub confirmed_at: Option<NaiveDateTime>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub limit_amount: Decimal,
    pub currency: String,
    pub period: BudgetPeriod,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rollover: bool,
    pub active: bool,
}
