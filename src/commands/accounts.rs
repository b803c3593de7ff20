// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::AccountKind;
use crate::utils::{fmt_money, id_for_account, pretty_table, resolve_owner};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = AccountKind::parse(sub.get_one::<String>("kind").unwrap())?;
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            let owner = resolve_owner(conn, sub.get_one::<String>("owner"))?;
            conn.execute(
                "INSERT INTO accounts(owner, name, kind, currency) VALUES (?1, ?2, ?3, ?4)",
                params![owner, name, kind.as_str(), ccy],
            )?;
            println!("Added account '{}' ({}, {})", name, kind.as_str(), ccy);
        }
        Some(("list", sub)) => {
            let include_inactive = sub.get_flag("all");
            let mut sql = String::from(
                "SELECT name, kind, currency, balance, active FROM accounts WHERE 1=1",
            );
            let mut params_vec: Vec<String> = Vec::new();
            if let Some(owner) = sub.get_one::<String>("owner") {
                sql.push_str(" AND owner=?");
                params_vec.push(owner.clone());
            }
            if !include_inactive {
                sql.push_str(" AND active=1");
            }
            sql.push_str(" ORDER BY name");
            let mut stmt = conn.prepare(&sql)?;
            let binds: Vec<&dyn rusqlite::ToSql> = params_vec
                .iter()
                .map(|s| s as &dyn rusqlite::ToSql)
                .collect();
            let rows = stmt.query_map(rusqlite::params_from_iter(binds), |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, bool>(4)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, k, c, b, active) = row?;
                data.push(vec![
                    n,
                    k,
                    c,
                    b,
                    if active { "yes".into() } else { "no".into() },
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Name", "Kind", "Currency", "Balance", "Active"], data)
            );
        }
        Some(("deactivate", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute(
                "UPDATE accounts SET active=0 WHERE name=?1 AND active=1",
                params![name],
            )?;
            if n == 0 {
                println!("No active account named '{}'", name);
            } else {
                println!("Deactivated account '{}'", name);
            }
        }
        Some(("balance", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_account(conn, name)?;
            let ccy: String = conn.query_row(
                "SELECT currency FROM accounts WHERE id=?1",
                params![id],
                |r| r.get(0),
            )?;
            let balance = ledger::get_account_balance(conn, id)?;
            println!("{}", fmt_money(&balance, &ccy));
        }
        _ => {}
    }
    Ok(())
}
