// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::ledger::balance::{compute_balance, delta_for, Leg};
use tallybook::models::{Transaction, TxKind, TxStatus};

fn tx(
    id: i64,
    account_id: i64,
    target: Option<i64>,
    amount: Decimal,
    kind: TxKind,
    status: TxStatus,
    day: u32,
) -> Transaction {
    Transaction {
        id,
        owner: "local".into(),
        account_id,
        target_account_id: target,
        category_id: match kind {
            TxKind::Transfer => None,
            _ => Some(1),
        },
        amount,
        kind,
        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        status,
        confirmed_at: None,
        note: None,
    }
}

#[test]
fn delta_rule_per_kind_and_leg() {
    assert_eq!(delta_for(TxKind::Income, dec!(10), Leg::Source), dec!(10));
    assert_eq!(delta_for(TxKind::Expense, dec!(10), Leg::Source), dec!(-10));
    assert_eq!(delta_for(TxKind::Transfer, dec!(10), Leg::Source), dec!(-10));
    assert_eq!(delta_for(TxKind::Transfer, dec!(10), Leg::Target), dec!(10));
}

#[test]
fn fold_applies_income_and_expense() {
    let txs = vec![
        tx(1, 1, None, dec!(1000), TxKind::Income, TxStatus::Posted, 1),
        tx(2, 1, None, dec!(200), TxKind::Expense, TxStatus::Posted, 2),
    ];
    assert_eq!(compute_balance(1, &txs), dec!(800));
}

#[test]
fn scheduled_rows_contribute_nothing() {
    let txs = vec![
        tx(1, 1, None, dec!(1000), TxKind::Income, TxStatus::Posted, 1),
        tx(2, 1, None, dec!(500), TxKind::Expense, TxStatus::Scheduled, 2),
    ];
    assert_eq!(compute_balance(1, &txs), dec!(1000));
}

#[test]
fn transfer_hits_both_legs() {
    let txs = vec![
        tx(1, 1, None, dec!(1000), TxKind::Income, TxStatus::Posted, 1),
        tx(2, 1, Some(2), dec!(300), TxKind::Transfer, TxStatus::Posted, 2),
    ];
    assert_eq!(compute_balance(1, &txs), dec!(700));
    assert_eq!(compute_balance(2, &txs), dec!(300));
}

#[test]
fn fold_order_does_not_change_the_sum() {
    let forward = vec![
        tx(1, 1, None, dec!(100), TxKind::Income, TxStatus::Posted, 1),
        tx(2, 1, None, dec!(40), TxKind::Expense, TxStatus::Posted, 2),
        tx(3, 1, Some(2), dec!(25), TxKind::Transfer, TxStatus::Posted, 3),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();
    assert_eq!(compute_balance(1, &forward), compute_balance(1, &reversed));
    assert_eq!(compute_balance(1, &forward), dec!(35));
}

#[test]
fn unrelated_accounts_are_ignored() {
    let txs = vec![
        tx(1, 7, None, dec!(500), TxKind::Income, TxStatus::Posted, 1),
        tx(2, 1, None, dec!(100), TxKind::Income, TxStatus::Posted, 2),
    ];
    assert_eq!(compute_balance(1, &txs), dec!(100));
}
