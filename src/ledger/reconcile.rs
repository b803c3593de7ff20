// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recomputes every cached balance from the posted log and reports drift.
//! Dry-run by default; `fix` overwrites the cached value with the computed
//! one, under the same SQLite write lock the writer uses. Drift is never an
//! error value, only a structured finding in the report.

use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use super::balance::{compute_balance, posted_for_account};
use super::parse_stored_decimal;
use crate::error::LedgerError;

/// Which accounts to check.
#[derive(Debug, Clone)]
pub enum Scope {
    All,
    Owner(String),
}

/// Absolute tolerance when comparing cached vs computed, to absorb rounding
/// noise: 0.01 currency unit.
pub fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub account_id: i64,
    pub name: String,
    pub cached: Decimal,
    pub computed: Decimal,
    pub delta: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanTransaction {
    pub transaction_id: i64,
    pub missing_account_id: i64,
    pub leg: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
    /// Account ids whose cached balance was overwritten (fix mode only).
    pub fixed: Vec<i64>,
    pub orphans: Vec<OrphanTransaction>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.orphans.is_empty()
    }
}

/// Checks every account in scope, deactivated ones included (their history
/// stays auditable). Idempotent: a second fix run with no intervening
/// writes reports zero mismatches.
pub fn validate(conn: &mut Connection, scope: &Scope, fix: bool) -> Result<Report, LedgerError> {
    let tx = conn.transaction()?;

    let accounts: Vec<(i64, String, String)> = {
        let (sql, owner) = match scope {
            Scope::All => (
                "SELECT id, name, balance FROM accounts ORDER BY id".to_string(),
                None,
            ),
            Scope::Owner(o) => (
                "SELECT id, name, balance FROM accounts WHERE owner=?1 ORDER BY id".to_string(),
                Some(o.clone()),
            ),
        };
        let mut stmt = tx.prepare(&sql)?;
        let map = |r: &rusqlite::Row<'_>| Ok((r.get(0)?, r.get(1)?, r.get(2)?));
        let rows = match owner {
            Some(o) => stmt
                .query_map(params![o], map)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], map)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        rows
    };

    let mut mismatches = Vec::new();
    let mut fixed = Vec::new();
    for (id, name, raw_balance) in &accounts {
        let cached = parse_stored_decimal(raw_balance)?;
        let posted = posted_for_account(&tx, *id)?;
        let computed = compute_balance(*id, &posted);
        let delta = computed - cached;
        if delta.abs() <= tolerance() {
            continue;
        }
        mismatches.push(Mismatch {
            account_id: *id,
            name: name.clone(),
            cached,
            computed,
            delta,
        });
        if fix {
            tx.execute(
                "UPDATE accounts SET balance=?1 WHERE id=?2",
                params![computed.to_string(), id],
            )?;
            fixed.push(*id);
        }
    }

    let orphans = find_orphans(&tx)?;
    tx.commit()?;

    Ok(Report {
        checked: accounts.len(),
        mismatches,
        fixed,
        orphans,
    })
}

/// Transactions referencing an account id with no account row. Non-fatal:
/// reported, never repaired here.
fn find_orphans(conn: &Connection) -> Result<Vec<OrphanTransaction>, LedgerError> {
    let mut out = Vec::new();

    let mut stmt = conn.prepare(
        "SELECT t.id, t.account_id FROM transactions t \
         LEFT JOIN accounts a ON t.account_id = a.id WHERE a.id IS NULL",
    )?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (tx_id, acct) = row?;
        out.push(OrphanTransaction {
            transaction_id: tx_id,
            missing_account_id: acct,
            leg: "source",
        });
    }

    let mut stmt = conn.prepare(
        "SELECT t.id, t.target_account_id FROM transactions t \
         LEFT JOIN accounts a ON t.target_account_id = a.id \
         WHERE t.target_account_id IS NOT NULL AND a.id IS NULL",
    )?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (tx_id, acct) = row?;
        out.push(OrphanTransaction {
            transaction_id: tx_id,
            missing_account_id: acct,
            leg: "target",
        });
    }

    Ok(out)
}
