// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Authoritative balance derivation. `compute_balance` is a pure fold over
//! posted transactions; the incremental rule used by the write paths is the
//! same `delta_for` so the cached value and the fold can never disagree on
//! semantics, only on staleness.

use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use super::{transaction_from_row, TX_COLUMNS};
use crate::error::LedgerError;
use crate::models::{Transaction, TxKind, TxStatus};

/// Which side of a transaction an account sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Source,
    Target,
}

/// Signed balance contribution of one posted transaction for one leg.
/// Income adds, expense subtracts, a transfer subtracts on the outgoing
/// leg and adds on the incoming leg.
pub fn delta_for(kind: TxKind, amount: Decimal, leg: Leg) -> Decimal {
    match (kind, leg) {
        (TxKind::Income, Leg::Source) => amount,
        (TxKind::Expense, Leg::Source) => -amount,
        (TxKind::Transfer, Leg::Source) => -amount,
        (TxKind::Transfer, Leg::Target) => amount,
        // income/expense never reference a target account
        (TxKind::Income | TxKind::Expense, Leg::Target) => Decimal::ZERO,
    }
}

/// Pure fold of the given set for one account. Rows that are not posted
/// contribute nothing. The (date, id) ordering is for stable audit output;
/// the sum itself is order-independent.
pub fn compute_balance(account_id: i64, transactions: &[Transaction]) -> Decimal {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| (t.date, t.id));

    let mut total = Decimal::ZERO;
    for t in ordered {
        if t.status != TxStatus::Posted {
            continue;
        }
        if t.account_id == account_id {
            total += delta_for(t.kind, t.amount, Leg::Source);
        }
        if t.target_account_id == Some(account_id) {
            total += delta_for(t.kind, t.amount, Leg::Target);
        }
    }
    total
}

/// Posted transactions touching the account as source or transfer target,
/// in fold order.
pub fn posted_for_account(
    conn: &Connection,
    account_id: i64,
) -> Result<Vec<Transaction>, LedgerError> {
    let sql = format!(
        "SELECT {} FROM transactions \
         WHERE (account_id=?1 OR target_account_id=?1) AND status='posted' \
         ORDER BY date ASC, id ASC",
        TX_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt.query_map(params![account_id], transaction_from_row)?;
    let mut out = Vec::new();
    for raw in raws {
        out.push(raw?.into_transaction()?);
    }
    Ok(out)
}

/// Recomputes the balance from the authoritative log. Read-only; this is
/// what reconciliation compares the cached value against.
pub fn computed_balance(conn: &Connection, account_id: i64) -> Result<Decimal, LedgerError> {
    let txs = posted_for_account(conn, account_id)?;
    Ok(compute_balance(account_id, &txs))
}
