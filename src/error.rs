// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Typed failures of the ledger core. Validation variants are raised before
/// any row is written; `ConcurrentModification` is the only retryable one.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be strictly positive, got {0}")]
    InvalidAmount(rust_decimal::Decimal),

    #[error("{kind} transaction requires a category")]
    MissingCategory { kind: &'static str },

    #[error("category {0} not found")]
    CategoryNotFound(i64),

    #[error("category {category} is {category_kind}, transaction is {tx_kind}")]
    CategoryTypeMismatch {
        category: i64,
        category_kind: &'static str,
        tx_kind: &'static str,
    },

    #[error("transfer must not carry a category")]
    CategoryOnTransfer,

    #[error("transfer requires a target account")]
    MissingTransferTarget,

    #[error("only transfers may carry a target account")]
    UnexpectedTransferTarget,

    #[error("transfer source and target must differ (account {0})")]
    SameAccountTransfer(i64),

    #[error("account {0} not found")]
    AccountNotFound(i64),

    // Field is not named `source` because thiserror would treat it as the
    // error source, which a plain String cannot be.
    #[error("currency mismatch: {source_currency} vs {target}")]
    CurrencyMismatch {
        source_currency: String,
        target: String,
    },

    #[error("transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("transaction {0} is already posted")]
    AlreadyPosted(i64),

    #[error("budget {0} not found")]
    BudgetNotFound(i64),

    #[error("custom-period budget {0} has no start/end window")]
    InvalidPeriod(i64),

    #[error("concurrent modification, retry the operation")]
    ConcurrentModification,

    #[error("unknown {field} '{value}'")]
    UnknownTag { field: &'static str, value: String },

    #[error("stored decimal '{0}' is not parseable")]
    CorruptDecimal(String),

    #[error(transparent)]
    Storage(rusqlite::Error),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(e: rusqlite::Error) -> Self {
        // Lock contention surfaces as busy/locked; the caller retries, we don't.
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if matches!(
                err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) {
                return LedgerError::ConcurrentModification;
            }
        }
        LedgerError::Storage(e)
    }
}
