// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use moneycare::commands::{self, AppContext};
use moneycare::config::Config;
use moneycare::{cli, db};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::from_env();
    let ctx = AppContext::open(cfg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&ctx.cfg)?.display());
        }
        Some(("login", sub)) => commands::auth::login(&ctx, sub)?,
        Some(("register", sub)) => commands::auth::register(&ctx, sub)?,
        Some(("logout", sub)) => commands::auth::logout(&ctx, sub)?,
        Some(("whoami", _)) => commands::auth::whoami(&ctx)?,
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("wallet", sub)) => commands::wallets::handle(&ctx, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&ctx, sub)?,
        Some(("category", sub)) => commands::categories::handle(sub)?,
        Some(("scan", sub)) => commands::scan::handle(&ctx, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
