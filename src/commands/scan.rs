// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;

use super::AppContext;
use crate::categories;
use crate::models::TransactionKind;
use crate::receipts;
use crate::utils::pretty_table;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    let qr = m.get_one::<String>("qr").map(|s| s.as_str()).unwrap_or("");
    let s = ctx.require_session()?;
    let api = s
        .api()
        .context("No remote service configured; set MONEYCARE_API_URL")?;
    let draft = receipts::scan(api, s.token(), qr, Utc::now())?;

    if let Some(items) = &draft.items {
        let rows = items
            .iter()
            .map(|i| {
                vec![
                    i.description.clone(),
                    i.quantity.to_string(),
                    format!("{:.2}", i.unit_price),
                    format!("{:.2}", i.total_price),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Item", "Qty", "Unit", "Total"], rows));
    }
    println!(
        "Receipt '{}' on {}: {:.2}",
        draft.description,
        draft.date.format("%Y-%m-%d"),
        draft.amount
    );

    match m.get_one::<String>("category") {
        Some(cat) => {
            let category = categories::find(TransactionKind::Expense, cat)?;
            let t = s
                .transactions
                .create(receipts::with_category(draft, category))?;
            println!("Saved as {}", t.id);
        }
        None => println!("Not saved; pass --category to record it"),
    }
    Ok(())
}
