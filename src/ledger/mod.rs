// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger core: balance derivation, the atomic append-and-update write
//! path, scheduled-to-posted confirmation, cached-balance reconciliation,
//! and budget progress. The CLI in `commands/` is a thin shell over this.

pub mod balance;
pub mod budget;
pub mod confirm;
pub mod reconcile;
pub mod writer;

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{Account, AccountKind, Transaction, TxKind, TxStatus};

pub(crate) fn parse_stored_decimal(s: &str) -> Result<Decimal, LedgerError> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::CorruptDecimal(s.to_string()))
}

/// Looks up an account the write path may touch. Deactivated accounts are
/// invisible here, so writes against them fail with `AccountNotFound`.
pub(crate) fn load_active_account(
    conn: &Connection,
    account_id: i64,
) -> Result<Account, LedgerError> {
    let row: Option<(String, String, String, String, String)> = conn
        .query_row(
            "SELECT owner, name, kind, currency, balance FROM accounts WHERE id=?1 AND active=1",
            params![account_id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                ))
            },
        )
        .optional()?;
    let (owner, name, kind, currency, balance) =
        row.ok_or(LedgerError::AccountNotFound(account_id))?;
    Ok(Account {
        id: account_id,
        owner,
        name,
        kind: AccountKind::parse(&kind)?,
        currency,
        balance: parse_stored_decimal(&balance)?,
        active: true,
    })
}

pub(crate) fn transaction_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: row.get(0)?,
        owner: row.get(1)?,
        account_id: row.get(2)?,
        target_account_id: row.get(3)?,
        category_id: row.get(4)?,
        amount: row.get(5)?,
        kind: row.get(6)?,
        date: row.get(7)?,
        status: row.get(8)?,
        confirmed_at: row.get(9)?,
        note: row.get(10)?,
    })
}

pub(crate) const TX_COLUMNS: &str = "id, owner, account_id, target_account_id, category_id, \
                                     amount, kind, date, status, confirmed_at, note";

/// Transaction row as stored, before the text tags are checked.
pub(crate) struct RawTransaction {
    id: i64,
    owner: String,
    account_id: i64,
    target_account_id: Option<i64>,
    category_id: Option<i64>,
    amount: String,
    kind: String,
    date: chrono::NaiveDate,
    status: String,
    confirmed_at: Option<chrono::NaiveDateTime>,
    note: Option<String>,
}

impl RawTransaction {
    pub(crate) fn into_transaction(self) -> Result<Transaction, LedgerError> {
        Ok(Transaction {
            id: self.id,
            owner: self.owner,
            account_id: self.account_id,
            target_account_id: self.target_account_id,
            category_id: self.category_id,
            amount: parse_stored_decimal(&self.amount)?,
            kind: TxKind::parse(&self.kind)?,
            date: self.date,
            status: TxStatus::parse(&self.status)?,
            confirmed_at: self.confirmed_at,
            note: self.note,
        })
    }
}

pub(crate) fn transaction_by_id(
    conn: &Connection,
    tx_id: i64,
) -> Result<Transaction, LedgerError> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS),
            params![tx_id],
            transaction_from_row,
        )
        .optional()?;
    raw.ok_or(LedgerError::TransactionNotFound(tx_id))?
        .into_transaction()
}

/// Cached balance as stored on the account row. Visible to any scope,
/// including deactivated accounts.
pub fn get_account_balance(conn: &Connection, account_id: i64) -> Result<Decimal, LedgerError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?;
    let raw = raw.ok_or(LedgerError::AccountNotFound(account_id))?;
    parse_stored_decimal(&raw)
}
