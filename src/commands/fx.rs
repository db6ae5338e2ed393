// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::AppContext;
use crate::fx::{fetch_all, fetch_latest, latest_rates, store_rates, DASHBOARD_QUOTES};
use crate::utils::{get_base_currency, http_client, maybe_print_json, pretty_table, set_base_currency};
use anyhow::Result;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-base", sub)) => {
            let ccy = sub
                .get_one::<String>("currency")
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_default();
            ctx.kv.with_conn(|conn| set_base_currency(conn, &ccy))?;
            println!("Base currency set to {}", ccy);
        }
        Some(("fetch", sub)) => fetch(ctx, sub.get_flag("all"))?,
        Some(("list", sub)) => list(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn fetch(ctx: &AppContext, all: bool) -> Result<()> {
    let base = ctx.kv.with_conn(get_base_currency)?;
    let client = http_client(ctx.cfg.timeout)?;
    let rates = if all {
        fetch_all(&client, &ctx.cfg.fx_url, &base)?
    } else {
        fetch_latest(&client, &ctx.cfg.fx_url, &base, &DASHBOARD_QUOTES)?
    };
    if rates.is_empty() {
        println!("No quotes other than the base currency; nothing to fetch.");
        return Ok(());
    }
    let n = ctx.kv.with_conn(|conn| store_rates(conn, &rates))?;
    println!("Stored {} FX rate(s) against {} via Frankfurter (ECB).", n, base);
    Ok(())
}

fn list(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let filter = sub.get_one::<String>("filter").map(|s| s.as_str());
    let rates = ctx.kv.with_conn(|conn| {
        let base = get_base_currency(conn)?;
        latest_rates(conn, &base, filter)
    })?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rates)? {
        let data = rates
            .into_iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.quote,
                    format!("{} {:.4}", r.base, r.rate),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Currency", "Value"], data));
    }
    Ok(())
}
