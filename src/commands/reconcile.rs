// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::reconcile::{validate, Scope};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let fix = m.get_flag("fix");
    let scope = match m.get_one::<String>("owner") {
        Some(o) => Scope::Owner(o.clone()),
        None => Scope::All,
    };

    let report = validate(conn, &scope, fix)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    if report.is_clean() {
        println!("reconcile: {} account(s) checked, no drift", report.checked);
        return Ok(());
    }

    if !report.mismatches.is_empty() {
        let rows: Vec<Vec<String>> = report
            .mismatches
            .iter()
            .map(|mm| {
                vec![
                    mm.account_id.to_string(),
                    mm.name.clone(),
                    format!("{:.2}", mm.cached),
                    format!("{:.2}", mm.computed),
                    format!("{:.2}", mm.delta),
                    if report.fixed.contains(&mm.account_id) {
                        "fixed".into()
                    } else {
                        "drift".into()
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Account", "Name", "Cached", "Computed", "Delta", "State"],
                rows
            )
        );
    }

    if !report.orphans.is_empty() {
        let rows: Vec<Vec<String>> = report
            .orphans
            .iter()
            .map(|o| {
                vec![
                    o.transaction_id.to_string(),
                    o.leg.to_string(),
                    o.missing_account_id.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Transaction", "Leg", "Missing account"], rows)
        );
    }

    if fix {
        println!("reconcile: fixed {} account(s)", report.fixed.len());
    } else {
        println!(
            "reconcile: {} mismatch(es), {} orphan(s); re-run with --fix to repair balances",
            report.mismatches.len(),
            report.orphans.len()
        );
    }
    Ok(())
}
