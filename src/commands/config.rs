// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_default_owner, set_default_owner};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-owner", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            set_default_owner(conn, name)?;
            println!("Default owner set to '{}'", name);
        }
        Some(("show", _)) => {
            println!("default_owner = {}", get_default_owner(conn)?);
        }
        _ => {}
    }
    Ok(())
}
