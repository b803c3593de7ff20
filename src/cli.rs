// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn owner_flag() -> Arg {
    Arg::new("owner")
        .long("owner")
        .help("Owner id (defaults to the configured default owner)")
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Account-balance ledger with scheduled transactions, reconciliation, and budgets")
        .version(crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(
                    Command::new("set-owner")
                        .about("Set the default owner id")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("show").about("Show current settings")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("cash|debit_card|credit_card|bank_account|digital_wallet"),
                        )
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(owner_flag()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List accounts")
                        .arg(owner_flag())
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include deactivated accounts"),
                        ),
                )
                .subcommand(
                    Command::new("deactivate")
                        .about("Soft-deactivate an account (history is kept)")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("balance")
                        .about("Show the cached balance of an account")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("color").long("color"))
                        .arg(owner_flag()),
                )
                .subcommand(Command::new("list").about("List categories")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Append a transaction")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense|transfer"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("target")
                                .long("target")
                                .help("Target account (transfers only)"),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("posted")
                                .help("posted|scheduled"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(owner_flag()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("status").long("status").help("posted|scheduled"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("confirm")
                        .about("Post a scheduled transaction")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets over expense categories")
                .subcommand(
                    Command::new("add")
                        .about("Create a budget")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("month")
                                .help("month|week|custom"),
                        )
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD (custom)"))
                        .arg(Arg::new("end").long("end").help("YYYY-MM-DD (custom)"))
                        .arg(
                            Arg::new("rollover")
                                .long("rollover")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(owner_flag()),
                )
                .subcommand(Command::new("list").about("List budgets"))
                .subcommand(
                    Command::new("link")
                        .about("Link an expense category to a budget")
                        .arg(Arg::new("budget").long("budget").required(true))
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("progress")
                        .about("Spent/remaining/percentage for the current window")
                        .arg(Arg::new("budget").long("budget").required(true)),
                )),
        )
        .subcommand(json_flags(
            Command::new("reconcile")
                .about("Compare cached balances against the posted log")
                .arg(owner_flag())
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite drifted cached balances with recomputed values"),
                ),
        ))
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export the transaction log")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}
