// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn kind_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .value_parser(["income", "expense"])
        .help("Transaction type")
}

pub fn build_cli() -> Command {
    Command::new("moneycare")
        .version(crate_version!())
        .about("Local-first personal finance: transactions, wallets and dashboard")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("login")
                .about("Sign in and sync your data")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("logout").about("Sign out").arg(
                Arg::new("purge")
                    .long("purge")
                    .action(ArgAction::SetTrue)
                    .help("Also delete this user's local data"),
            ),
        )
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(kind_arg().default_value("expense"))
                        .arg(Arg::new("description").long("description").short('d').required(true))
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .short('c')
                                .required(true)
                                .help("Category id or name"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD or RFC 3339; defaults to now"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List transactions, newest first").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(Command::new("sync").about("Sync transactions with the server")),
        )
        .subcommand(
            Command::new("wallet")
                .about("Savings wallets")
                .subcommand(
                    Command::new("add")
                        .about("Create a wallet")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("wallet"))
                        .arg(Arg::new("goal").long("goal").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List wallets")))
                .subcommand(Command::new("sync").about("Sync wallets with the server")),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Income, expenses and charts for a period")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .short('p')
                        .value_parser(["7d", "30d", "3m", "1y"])
                        .default_value("30d"),
                ),
        ))
        .subcommand(
            Command::new("category")
                .about("Built-in categories")
                .subcommand(json_flags(Command::new("list").arg(kind_arg()))),
        )
        .subcommand(
            Command::new("scan")
                .about("Read a receipt QR code through the server")
                .arg(Arg::new("qr").long("qr").required(true).help("Decoded QR payload (URL)"))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .help("Expense category; when given the receipt is saved"),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Currency rates")
                .subcommand(
                    Command::new("set-base")
                        .about("Set the base currency")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("fetch").about("Fetch today's rates").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Every published currency, not just USD/EUR/GBP/JPY"),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("Show the latest stored rates")
                        .arg(Arg::new("filter").long("filter").help("Currency code contains")),
                )),
        )
}
