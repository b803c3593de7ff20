// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget windows and spend progress. A budget's window is either stored
//! (custom) or resolved against "today" (calendar month, ISO Monday-Sunday
//! week). Spent only ever counts posted expense rows; both window bounds
//! are inclusive.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;

use super::parse_stored_decimal;
use crate::error::LedgerError;
use crate::models::{Budget, BudgetPeriod, BudgetStatus, CategoryKind};

#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub spent: Decimal,
    /// limit - spent; negative means overspend.
    pub remaining: Decimal,
    /// spent / limit * 100, two decimal places; 0 when the limit is 0.
    pub percentage: Decimal,
    pub status: BudgetStatus,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

/// Links an expense category to a budget. The expense-only rule lives here,
/// at link time, not in a database trigger.
pub fn link_category(
    conn: &Connection,
    budget_id: i64,
    category_id: i64,
) -> Result<(), LedgerError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM budgets WHERE id=?1",
            params![budget_id],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(LedgerError::BudgetNotFound(budget_id));
    }

    let raw_kind: Option<String> = conn
        .query_row(
            "SELECT kind FROM categories WHERE id=?1",
            params![category_id],
            |r| r.get(0),
        )
        .optional()?;
    let raw_kind = raw_kind.ok_or(LedgerError::CategoryNotFound(category_id))?;
    let kind = CategoryKind::parse(&raw_kind)?;
    if kind != CategoryKind::Expense {
        return Err(LedgerError::CategoryTypeMismatch {
            category: category_id,
            category_kind: kind.as_str(),
            tx_kind: "expense",
        });
    }

    conn.execute(
        "INSERT INTO budget_categories(budget_id, category_id) VALUES (?1, ?2) \
         ON CONFLICT(budget_id, category_id) DO NOTHING",
        params![budget_id, category_id],
    )?;
    Ok(())
}

pub fn load_budget(conn: &Connection, budget_id: i64) -> Result<Budget, LedgerError> {
    let row: Option<(
        String,
        String,
        String,
        String,
        String,
        Option<NaiveDate>,
        Option<NaiveDate>,
        bool,
        bool,
    )> = conn
        .query_row(
            "SELECT owner, name, limit_amount, currency, period, start_date, end_date, \
                    rollover, active FROM budgets WHERE id=?1",
            params![budget_id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                    r.get(8)?,
                ))
            },
        )
        .optional()?;
    let (owner, name, limit_amount, currency, period, start_date, end_date, rollover, active) =
        row.ok_or(LedgerError::BudgetNotFound(budget_id))?;
    Ok(Budget {
        id: budget_id,
        owner,
        name,
        limit_amount: parse_stored_decimal(&limit_amount)?,
        currency,
        period: BudgetPeriod::parse(&period)?,
        start_date,
        end_date,
        rollover,
        active,
    })
}

/// Inclusive window for the budget relative to `today`.
pub fn resolve_window(
    budget: &Budget,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), LedgerError> {
    match budget.period {
        BudgetPeriod::Custom => match (budget.start_date, budget.end_date) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(LedgerError::InvalidPeriod(budget.id)),
        },
        BudgetPeriod::Month => Ok(month_bounds(today)),
        BudgetPeriod::Week => {
            let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            Ok((monday, monday + Duration::days(6)))
        }
    }
}

fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let (next_y, next_m) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .map(|d| d - Duration::days(1))
        .unwrap_or(today);
    (first, last)
}

pub fn progress(
    conn: &Connection,
    budget_id: i64,
    today: NaiveDate,
) -> Result<BudgetProgress, LedgerError> {
    let budget = load_budget(conn, budget_id)?;
    let (start, end) = resolve_window(&budget, today)?;

    let mut stmt = conn.prepare(
        "SELECT t.amount FROM transactions t \
         JOIN budget_categories bc ON bc.category_id = t.category_id \
         WHERE bc.budget_id=?1 AND t.kind='expense' AND t.status='posted' \
           AND t.date >= ?2 AND t.date <= ?3",
    )?;
    let rows = stmt.query_map(params![budget_id, start, end], |r| r.get::<_, String>(0))?;
    let mut spent = Decimal::ZERO;
    for raw in rows {
        spent += parse_stored_decimal(&raw?)?;
    }

    let remaining = budget.limit_amount - spent;
    let percentage = if budget.limit_amount.is_zero() {
        Decimal::ZERO
    } else {
        (spent / budget.limit_amount * Decimal::from(100)).round_dp(2)
    };
    let status = if start > today {
        BudgetStatus::Future
    } else if end < today {
        BudgetStatus::Completed
    } else {
        BudgetStatus::Active
    };

    Ok(BudgetProgress {
        budget_id,
        spent,
        remaining,
        percentage,
        status,
        window_start: start,
        window_end: end,
    })
}
