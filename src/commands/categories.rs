// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CategoryKind;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = CategoryKind::parse(sub.get_one::<String>("kind").unwrap())?;
            // No --owner means a shared category, visible to everyone.
            let owner = sub.get_one::<String>("owner");
            let icon = sub.get_one::<String>("icon");
            let color = sub.get_one::<String>("color");
            conn.execute(
                "INSERT INTO categories(owner, kind, name, icon, color) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![owner, kind.as_str(), name, icon, color],
            )?;
            println!("Added {} category '{}'", kind.as_str(), name);
        }
        Some(("list", _)) => {
            let mut stmt = conn
                .prepare("SELECT name, kind, owner FROM categories ORDER BY kind, name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<String>>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, k, o) = row?;
                data.push(vec![n, k, o.unwrap_or_else(|| "(shared)".into())]);
            }
            println!("{}", pretty_table(&["Name", "Kind", "Owner"], data));
        }
        _ => {}
    }
    Ok(())
}
