// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::confirm::confirm;
use crate::ledger::writer::{create_transaction, NewTransaction};
use crate::models::{TxKind, TxStatus};
use crate::utils::{
    id_for_account, id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table,
    resolve_owner,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("confirm", sub)) => confirm_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let account_name = sub.get_one::<String>("account").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = TxKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let status = TxStatus::parse(sub.get_one::<String>("status").unwrap())?;
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let account_id = id_for_account(conn, account_name)?;
    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, cat)?),
        None => None,
    };
    let target_account_id = match sub.get_one::<String>("target") {
        Some(target) => Some(id_for_account(conn, target)?),
        None => None,
    };
    let owner = resolve_owner(conn, sub.get_one::<String>("owner"))?;

    let tx = create_transaction(
        conn,
        NewTransaction {
            owner,
            account_id,
            target_account_id,
            category_id,
            amount,
            kind,
            date,
            status,
            note,
        },
    )?;
    println!(
        "Recorded {} {} of {} on {} (id: {})",
        tx.status.as_str(),
        tx.kind.as_str(),
        tx.amount,
        tx.date,
        tx.id
    );
    Ok(())
}

fn confirm_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let tx = confirm(conn, id)?;
    println!(
        "Posted transaction {} ({} {} on {})",
        tx.id,
        tx.kind.as_str(),
        tx.amount,
        tx.date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.target.clone(),
                    r.category.clone(),
                    r.kind.clone(),
                    r.status.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Account", "Target", "Category", "Kind", "Status", "Amount", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub target: String,
    pub category: String,
    pub kind: String,
    pub status: String,
    pub amount: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, a.name, ta.name, c.name, t.kind, t.status, t.amount, t.note \
         FROM transactions t \
         LEFT JOIN accounts a ON t.account_id=a.id \
         LEFT JOIN accounts ta ON t.target_account_id=ta.id \
         LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND (a.name=? OR ta.name=?)");
        params_vec.push(acct.into());
        params_vec.push(acct.into());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        sql.push_str(" AND t.status=?");
        params_vec.push(status.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let binds: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(binds))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let account: Option<String> = r.get(2)?;
        let target: Option<String> = r.get(3)?;
        let category: Option<String> = r.get(4)?;
        let kind: String = r.get(5)?;
        let status: String = r.get(6)?;
        let amount: String = r.get(7)?;
        let note: Option<String> = r.get(8)?;
        data.push(TransactionRow {
            id,
            date,
            account: account.unwrap_or_default(),
            target: target.unwrap_or_default(),
            category: category.unwrap_or_default(),
            kind,
            status,
            amount,
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}
