// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::AppContext;
use super::auth::describe;
use crate::models::NewWallet;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let s = ctx.require_session()?;
            let wallet = NewWallet {
                name: sub
                    .get_one::<String>("name")
                    .map(|n| n.trim().to_string())
                    .unwrap_or_default(),
                icon: sub
                    .get_one::<String>("icon")
                    .map(|i| i.trim().to_string())
                    .unwrap_or_default(),
                goal_amount: parse_decimal(
                    sub.get_one::<String>("goal").map(|g| g.as_str()).unwrap_or(""),
                )?,
            };
            let outcome = s.wallets.create(wallet)?;
            println!("Wallet created ({})", describe(outcome));
        }
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("sync", _)) => {
            let s = ctx.require_session()?;
            println!("Wallets: {}", describe(s.wallets.sync()));
        }
        _ => {}
    }
    Ok(())
}

fn list(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let s = ctx.require_session()?;
    let wallets = s.wallets.items();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &*wallets)? {
        let rows: Vec<Vec<String>> = wallets
            .iter()
            .map(|w| {
                vec![
                    w.name.clone(),
                    format!("{:.2}", w.current_amount),
                    format!("{:.2}", w.goal_amount),
                    format!("{:.0}%", w.progress() * rust_decimal::Decimal::ONE_HUNDRED),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Wallet", "Saved", "Goal", "Progress"], rows)
        );
    }
    Ok(())
}
