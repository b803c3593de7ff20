// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::error::LedgerError;
use tallybook::ledger::get_account_balance;
use tallybook::ledger::writer::{create_transaction, NewTransaction};
use tallybook::models::{TxKind, TxStatus};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tallybook::db::init_schema(&mut conn).unwrap();
    conn
}

fn add_account(conn: &Connection, name: &str, ccy: &str) -> i64 {
    conn.execute(
        "INSERT INTO accounts(owner, name, kind, currency) VALUES('local', ?1, 'bank_account', ?2)",
        params![name, ccy],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn add_category(conn: &Connection, name: &str, kind: &str) -> i64 {
    conn.execute(
        "INSERT INTO categories(owner, kind, name) VALUES(NULL, ?1, ?2)",
        params![kind, name],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn new_tx(account_id: i64, amount: Decimal, kind: TxKind, status: TxStatus) -> NewTransaction {
    NewTransaction {
        owner: "local".into(),
        account_id,
        target_account_id: None,
        category_id: None,
        amount,
        kind,
        date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        status,
        note: None,
    }
}

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn posted_income_updates_cached_balance() {
    let mut conn = setup();
    let acct = add_account(&conn, "Checking", "USD");
    let cat = add_category(&conn, "Salary", "income");

    let mut input = new_tx(acct, dec!(1000), TxKind::Income, TxStatus::Posted);
    input.category_id = Some(cat);
    let tx = create_transaction(&mut conn, input).unwrap();

    assert_eq!(tx.status, TxStatus::Posted);
    assert!(tx.confirmed_at.is_some());
    assert_eq!(get_account_balance(&conn, acct).unwrap(), dec!(1000));
}

#[test]
fn scheduled_transaction_is_inert() {
    let mut conn = setup();
    let acct = add_account(&conn, "Checking", "USD");
    let cat = add_category(&conn, "Food", "expense");

    let mut input = new_tx(acct, dec!(500), TxKind::Expense, TxStatus::Scheduled);
    input.category_id = Some(cat);
    let tx = create_transaction(&mut conn, input).unwrap();

    assert_eq!(tx.status, TxStatus::Scheduled);
    assert!(tx.confirmed_at.is_none());
    assert_eq!(get_account_balance(&conn, acct).unwrap(), dec!(0));
    assert_eq!(tx_count(&conn), 1);
}

#[test]
fn transfer_conserves_value_across_accounts() {
    let mut conn = setup();
    let a = add_account(&conn, "A", "USD");
    let b = add_account(&conn, "B", "USD");
    let salary = add_category(&conn, "Salary", "income");

    let mut seed = new_tx(a, dec!(1000), TxKind::Income, TxStatus::Posted);
    seed.category_id = Some(salary);
    create_transaction(&mut conn, seed).unwrap();

    let mut transfer = new_tx(a, dec!(300), TxKind::Transfer, TxStatus::Posted);
    transfer.target_account_id = Some(b);
    create_transaction(&mut conn, transfer).unwrap();

    let bal_a = get_account_balance(&conn, a).unwrap();
    let bal_b = get_account_balance(&conn, b).unwrap();
    assert_eq!(bal_a, dec!(700));
    assert_eq!(bal_b, dec!(300));
    // net system-wide delta of the transfer is zero
    assert_eq!(bal_a + bal_b, dec!(1000));
}

#[test]
fn zero_or_negative_amount_is_rejected_before_any_write() {
    let mut conn = setup();
    let acct = add_account(&conn, "Checking", "USD");
    let cat = add_category(&conn, "Food", "expense");

    for amount in [dec!(0), dec!(-5)] {
        let mut input = new_tx(acct, amount, TxKind::Expense, TxStatus::Posted);
        input.category_id = Some(cat);
        let err = create_transaction(&mut conn, input).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
    assert_eq!(tx_count(&conn), 0);
    assert_eq!(get_account_balance(&conn, acct).unwrap(), dec!(0));
}

#[test]
fn category_kind_must_match_transaction_kind() {
    let mut conn = setup();
    let acct = add_account(&conn, "Checking", "USD");
    let salary = add_category(&conn, "Salary", "income");

    let mut input = new_tx(acct, dec!(50), TxKind::Expense, TxStatus::Posted);
    input.category_id = Some(salary);
    let err = create_transaction(&mut conn, input).unwrap_err();
    assert!(matches!(err, LedgerError::CategoryTypeMismatch { .. }));
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn income_without_category_is_rejected() {
    let mut conn = setup();
    let acct = add_account(&conn, "Checking", "USD");
    let err =
        create_transaction(&mut conn, new_tx(acct, dec!(50), TxKind::Income, TxStatus::Posted))
            .unwrap_err();
    assert!(matches!(err, LedgerError::MissingCategory { .. }));
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn transfer_validation_errors() {
    let mut conn = setup();
    let a = add_account(&conn, "A", "USD");
    let eur = add_account(&conn, "EurAccount", "EUR");
    let cat = add_category(&conn, "Food", "expense");

    // no target
    let err =
        create_transaction(&mut conn, new_tx(a, dec!(10), TxKind::Transfer, TxStatus::Posted))
            .unwrap_err();
    assert!(matches!(err, LedgerError::MissingTransferTarget));

    // same account on both legs
    let mut same = new_tx(a, dec!(10), TxKind::Transfer, TxStatus::Posted);
    same.target_account_id = Some(a);
    let err = create_transaction(&mut conn, same).unwrap_err();
    assert!(matches!(err, LedgerError::SameAccountTransfer(_)));

    // category not allowed on a transfer
    let mut with_cat = new_tx(a, dec!(10), TxKind::Transfer, TxStatus::Posted);
    with_cat.target_account_id = Some(eur);
    with_cat.category_id = Some(cat);
    let err = create_transaction(&mut conn, with_cat).unwrap_err();
    assert!(matches!(err, LedgerError::CategoryOnTransfer));

    // cross-currency transfer is unsupported
    let mut cross = new_tx(a, dec!(10), TxKind::Transfer, TxStatus::Posted);
    cross.target_account_id = Some(eur);
    let err = create_transaction(&mut conn, cross).unwrap_err();
    assert!(matches!(err, LedgerError::CurrencyMismatch { .. }));

    // unknown target account
    let mut missing = new_tx(a, dec!(10), TxKind::Transfer, TxStatus::Posted);
    missing.target_account_id = Some(999);
    let err = create_transaction(&mut conn, missing).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(999)));

    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn deactivated_account_is_not_writable() {
    let mut conn = setup();
    let acct = add_account(&conn, "Old", "USD");
    let cat = add_category(&conn, "Food", "expense");
    conn.execute("UPDATE accounts SET active=0 WHERE id=?1", params![acct])
        .unwrap();

    let mut input = new_tx(acct, dec!(10), TxKind::Expense, TxStatus::Posted);
    input.category_id = Some(cat);
    let err = create_transaction(&mut conn, input).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}
