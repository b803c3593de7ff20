// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, a.name as account, ta.name as target, c.name as category, \
                t.kind, t.status, t.amount, t.note \
         FROM transactions t \
         LEFT JOIN accounts a ON t.account_id=a.id \
         LEFT JOIN accounts ta ON t.target_account_id=ta.id \
         LEFT JOIN categories c ON t.category_id=c.id \
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "account", "target", "category", "kind", "status", "amount", "note",
            ])?;
            for row in rows {
                let (d, a, ta, cat, kind, status, amt, note) = row?;
                wtr.write_record([
                    d,
                    a.unwrap_or_default(),
                    ta.unwrap_or_default(),
                    cat.unwrap_or_default(),
                    kind,
                    status,
                    amt,
                    note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, a, ta, cat, kind, status, amt, note) = row?;
                items.push(json!({
                    "date": d, "account": a, "target": ta, "category": cat,
                    "kind": kind, "status": status, "amount": amt, "note": note
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
