// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Local;

use super::AppContext;
use crate::analytics::{DashboardSummary, Period};
use crate::utils::{fmt_money, get_base_currency, maybe_print_json, pretty_table};

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    let period: Period = m
        .get_one::<String>("period")
        .map(|s| s.as_str())
        .unwrap_or("30d")
        .parse()?;
    let s = ctx.require_session()?;
    let summary = s.dashboard(period, &Local::now());
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &*summary)? {
        return Ok(());
    }
    let ccy = ctx.kv.with_conn(get_base_currency)?;
    render(&summary, &ccy);
    Ok(())
}

fn render(d: &DashboardSummary, ccy: &str) {
    println!(
        "{}",
        pretty_table(
            &["Period", "Income", "Expenses", "Balance", "Transactions"],
            vec![vec![
                d.period.to_string(),
                fmt_money(&d.total_income, ccy),
                fmt_money(&d.total_expenses, ccy),
                fmt_money(&d.balance, ccy),
                d.transaction_count.to_string(),
            ]],
        )
    );

    if !d.category_breakdown.is_empty() {
        let rows = d
            .category_breakdown
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    fmt_money(&c.value, ccy),
                    format!("{:.1}%", c.percent),
                    c.color.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Share", "Color"], rows)
        );
    }

    let series = d
        .daily_series
        .iter()
        .map(|p| vec![p.label.clone(), format!("{:.2}", p.value)])
        .collect();
    println!("{}", pretty_table(&["Day", "Net"], series));

    let recent = d
        .recent
        .iter()
        .map(|t| {
            vec![
                t.date.format("%d/%m").to_string(),
                t.description.clone(),
                format!("{:.2}", t.signed_amount()),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Recent", "Description", "Amount"], recent));
}
