// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::error::LedgerError;
use tallybook::ledger::confirm::confirm;
use tallybook::ledger::get_account_balance;
use tallybook::ledger::writer::{create_transaction, NewTransaction};
use tallybook::models::{TxKind, TxStatus};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tallybook::db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        "INSERT INTO accounts(owner, name, kind, currency) VALUES('local', 'Main', 'bank_account', 'USD');
         INSERT INTO categories(owner, kind, name) VALUES(NULL, 'income', 'Salary');
         INSERT INTO categories(owner, kind, name) VALUES(NULL, 'expense', 'Food');",
    )
    .unwrap();
    conn
}

fn record(
    conn: &mut Connection,
    amount: Decimal,
    kind: TxKind,
    category_id: i64,
    status: TxStatus,
    day: u32,
) -> i64 {
    create_transaction(
        conn,
        NewTransaction {
            owner: "local".into(),
            account_id: 1,
            target_account_id: None,
            category_id: Some(category_id),
            amount,
            kind,
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            status,
            note: None,
        },
    )
    .unwrap()
    .id
}

#[test]
fn confirm_applies_the_delta_exactly_once() {
    // Scenario: 0 -> income 1000 -> 1000 -> expense 200 -> 800 ->
    // scheduled expense 500 -> still 800 -> confirm -> 300.
    let mut conn = setup();
    record(&mut conn, dec!(1000), TxKind::Income, 1, TxStatus::Posted, 1);
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(1000));

    record(&mut conn, dec!(200), TxKind::Expense, 2, TxStatus::Posted, 2);
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(800));

    let scheduled = record(&mut conn, dec!(500), TxKind::Expense, 2, TxStatus::Scheduled, 3);
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(800));

    let posted = confirm(&mut conn, scheduled).unwrap();
    assert_eq!(posted.status, TxStatus::Posted);
    assert!(posted.confirmed_at.is_some());
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(300));
}

#[test]
fn double_confirm_is_rejected_and_leaves_balances_alone() {
    let mut conn = setup();
    let scheduled = record(&mut conn, dec!(100), TxKind::Expense, 2, TxStatus::Scheduled, 1);

    confirm(&mut conn, scheduled).unwrap();
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(-100));

    let err = confirm(&mut conn, scheduled).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyPosted(id) if id == scheduled));
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(-100));
}

#[test]
fn confirming_a_directly_posted_transaction_is_rejected() {
    let mut conn = setup();
    let posted = record(&mut conn, dec!(100), TxKind::Income, 1, TxStatus::Posted, 1);
    let err = confirm(&mut conn, posted).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyPosted(_)));
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(100));
}

#[test]
fn confirm_unknown_id_fails() {
    let mut conn = setup();
    let err = confirm(&mut conn, 42).unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(42)));
}

#[test]
fn confirmed_scheduled_transfer_moves_value() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO accounts(owner, name, kind, currency) VALUES('local', 'Savings', 'bank_account', 'USD')",
        [],
    )
    .unwrap();
    record(&mut conn, dec!(1000), TxKind::Income, 1, TxStatus::Posted, 1);

    let transfer = create_transaction(
        &mut conn,
        NewTransaction {
            owner: "local".into(),
            account_id: 1,
            target_account_id: Some(2),
            category_id: None,
            amount: dec!(250),
            kind: TxKind::Transfer,
            date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            status: TxStatus::Scheduled,
            note: None,
        },
    )
    .unwrap();
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(1000));
    assert_eq!(get_account_balance(&conn, 2).unwrap(), dec!(0));

    confirm(&mut conn, transfer.id).unwrap();
    assert_eq!(get_account_balance(&conn, 1).unwrap(), dec!(750));
    assert_eq!(get_account_balance(&conn, 2).unwrap(), dec!(250));

    // posted rows have no further transitions
    let err = confirm(&mut conn, transfer.id).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyPosted(_)));
}
