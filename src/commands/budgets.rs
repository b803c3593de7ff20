// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::budget::{link_category, progress};
use crate::models::BudgetPeriod;
use crate::utils::{
    id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table, resolve_owner,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("link", sub)) => link(conn, sub)?,
        Some(("progress", sub)) => progress_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn id_for_budget(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM budgets WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Budget '{}' not found", name))?;
    Ok(id)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
    let period = BudgetPeriod::parse(sub.get_one::<String>("period").unwrap())?;
    let start = sub
        .get_one::<String>("start")
        .map(|s| parse_date(s))
        .transpose()?;
    let end = sub
        .get_one::<String>("end")
        .map(|s| parse_date(s))
        .transpose()?;
    let rollover = sub.get_flag("rollover");
    let owner = resolve_owner(conn, sub.get_one::<String>("owner"))?;

    if period == BudgetPeriod::Custom && (start.is_none() || end.is_none()) {
        anyhow::bail!("custom-period budget needs --start and --end");
    }

    conn.execute(
        "INSERT INTO budgets(owner, name, limit_amount, currency, period, start_date, end_date, rollover) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            owner,
            name,
            limit.to_string(),
            ccy,
            period.as_str(),
            start,
            end,
            rollover
        ],
    )?;
    println!("Created budget '{}' ({} {} per {})", name, limit, ccy, period.as_str());
    Ok(())
}

fn list(conn: &Connection, _sub: &clap::ArgMatches) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT b.name, b.limit_amount, b.currency, b.period, \
                (SELECT count(*) FROM budget_categories bc WHERE bc.budget_id=b.id) \
         FROM budgets b WHERE b.active=1 ORDER BY b.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (n, l, c, p, links) = row?;
        data.push(vec![n, l, c, p, links.to_string()]);
    }
    println!(
        "{}",
        pretty_table(&["Name", "Limit", "Currency", "Period", "Categories"], data)
    );
    Ok(())
}

fn link(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budget_name = sub.get_one::<String>("budget").unwrap();
    let category_name = sub.get_one::<String>("category").unwrap();
    let budget_id = id_for_budget(conn, budget_name)?;
    let category_id = id_for_category(conn, category_name)?;
    link_category(conn, budget_id, category_id)?;
    println!("Linked '{}' to budget '{}'", category_name, budget_name);
    Ok(())
}

fn progress_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budget_name = sub.get_one::<String>("budget").unwrap();
    let budget_id = id_for_budget(conn, budget_name)?;
    let today = Utc::now().date_naive();
    let p = progress(conn, budget_id, today)?;
    if !maybe_print_json(json_flag, jsonl_flag, &p)? {
        let rows = vec![vec![
            budget_name.clone(),
            format!("{} .. {}", p.window_start, p.window_end),
            format!("{:.2}", p.spent),
            format!("{:.2}", p.remaining),
            format!("{}%", p.percentage),
            format!("{:?}", p.status).to_uppercase(),
        ]];
        println!(
            "{}",
            pretty_table(
                &["Budget", "Window", "Spent", "Remaining", "Used", "Status"],
                rows
            )
        );
    }
    Ok(())
}
