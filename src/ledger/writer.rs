// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Validated append of a transaction plus the incremental cached-balance
//! update, in one SQLite transaction. All validation happens before the
//! first write; a rejected input leaves no partial state.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::balance::{delta_for, Leg};
use super::{load_active_account, parse_stored_decimal};
use crate::error::LedgerError;
use crate::models::{CategoryKind, Transaction, TxKind, TxStatus};

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub owner: String,
    pub account_id: i64,
    pub target_account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub kind: TxKind,
    pub date: NaiveDate,
    pub status: TxStatus,
    pub note: Option<String>,
}

pub fn create_transaction(
    conn: &mut Connection,
    input: NewTransaction,
) -> Result<Transaction, LedgerError> {
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(input.amount));
    }
    let source = load_active_account(conn, input.account_id)?;

    match input.kind {
        TxKind::Income | TxKind::Expense => {
            let category_id = input
                .category_id
                .ok_or(LedgerError::MissingCategory {
                    kind: input.kind.as_str(),
                })?;
            check_category_kind(conn, category_id, input.kind)?;
            if input.target_account_id.is_some() {
                return Err(LedgerError::UnexpectedTransferTarget);
            }
        }
        TxKind::Transfer => {
            if input.category_id.is_some() {
                return Err(LedgerError::CategoryOnTransfer);
            }
            let target_id = input
                .target_account_id
                .ok_or(LedgerError::MissingTransferTarget)?;
            if target_id == input.account_id {
                return Err(LedgerError::SameAccountTransfer(target_id));
            }
            let target = load_active_account(conn, target_id)?;
            if target.currency != source.currency {
                return Err(LedgerError::CurrencyMismatch {
                    source_currency: source.currency.clone(),
                    target: target.currency,
                });
            }
        }
    }

    let confirmed_at = match input.status {
        TxStatus::Posted => Some(Utc::now().naive_utc()),
        TxStatus::Scheduled => None,
    };

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO transactions(owner, account_id, target_account_id, category_id, \
                                  amount, kind, date, status, confirmed_at, note) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            input.owner,
            input.account_id,
            input.target_account_id,
            input.category_id,
            input.amount.to_string(),
            input.kind.as_str(),
            input.date,
            input.status.as_str(),
            confirmed_at,
            input.note,
        ],
    )?;
    let id = tx.last_insert_rowid();

    // Scheduled rows are inert until confirmed.
    if input.status == TxStatus::Posted {
        apply_deltas(
            &tx,
            input.kind,
            input.amount,
            input.account_id,
            input.target_account_id,
        )?;
    }
    tx.commit()?;

    Ok(Transaction {
        id,
        owner: input.owner,
        account_id: input.account_id,
        target_account_id: input.target_account_id,
        category_id: input.category_id,
        amount: input.amount,
        kind: input.kind,
        date: input.date,
        status: input.status,
        confirmed_at,
        note: input.note,
    })
}

fn check_category_kind(
    conn: &Connection,
    category_id: i64,
    tx_kind: TxKind,
) -> Result<(), LedgerError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT kind FROM categories WHERE id=?1",
            params![category_id],
            |r| r.get(0),
        )
        .optional()?;
    let raw = raw.ok_or(LedgerError::CategoryNotFound(category_id))?;
    let category_kind = CategoryKind::parse(&raw)?;
    let matches = matches!(
        (category_kind, tx_kind),
        (CategoryKind::Income, TxKind::Income) | (CategoryKind::Expense, TxKind::Expense)
    );
    if !matches {
        return Err(LedgerError::CategoryTypeMismatch {
            category: category_id,
            category_kind: category_kind.as_str(),
            tx_kind: tx_kind.as_str(),
        });
    }
    Ok(())
}

/// Applies the incremental rule for both legs inside an open SQLite
/// transaction. For a transfer the two account rows are touched in
/// ascending id order, the fixed global order shared by every caller.
pub(crate) fn apply_deltas(
    tx: &rusqlite::Transaction<'_>,
    kind: TxKind,
    amount: Decimal,
    account_id: i64,
    target_account_id: Option<i64>,
) -> Result<(), LedgerError> {
    let mut legs: Vec<(i64, Decimal)> = vec![(account_id, delta_for(kind, amount, Leg::Source))];
    if let Some(target) = target_account_id {
        legs.push((target, delta_for(kind, amount, Leg::Target)));
    }
    legs.sort_by_key(|(id, _)| *id);
    for (id, delta) in legs {
        bump_balance(tx, id, delta)?;
    }
    Ok(())
}

fn bump_balance(
    tx: &rusqlite::Transaction<'_>,
    account_id: i64,
    delta: Decimal,
) -> Result<(), LedgerError> {
    let raw: Option<String> = tx
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?;
    let raw = raw.ok_or(LedgerError::AccountNotFound(account_id))?;
    let current = parse_stored_decimal(&raw)?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![(current + delta).to_string(), account_id],
    )?;
    Ok(())
}
