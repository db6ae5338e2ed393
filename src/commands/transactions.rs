// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use super::AppContext;
use super::auth::describe;
use crate::categories;
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("sync", _)) => {
            let s = ctx.require_session()?;
            println!("Transactions: {}", describe(s.transactions.sync()));
        }
        _ => {}
    }
    Ok(())
}

/// Builds the unsaved transaction described by `tx add` arguments.
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let kind: TransactionKind = sub
        .get_one::<String>("type")
        .map(|s| s.as_str())
        .unwrap_or("expense")
        .parse()?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let amount = parse_decimal(sub.get_one::<String>("amount").map(|s| s.as_str()).unwrap_or(""))?;
    let category = match sub.get_one::<String>("category") {
        Some(c) => Some(categories::find(kind, c)?),
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now(),
    };
    let notes = sub
        .get_one::<String>("notes")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(NewTransaction {
        description,
        amount,
        kind,
        category,
        date,
        notes,
        items: None,
    })
}

fn add(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let s = ctx.require_session()?;
    let draft = draft_from_args(sub)?;
    let t = s.transactions.create(draft)?;
    println!(
        "Recorded {} {} '{}' ({}) as {}",
        t.kind,
        t.amount,
        t.description,
        t.category_name(),
        t.id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub notes: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            kind: t.kind.to_string(),
            description: t.description.clone(),
            amount: format!("{:.2}", t.signed_amount()),
            category: t.category_name().to_string(),
            notes: t.notes.clone().unwrap_or_default(),
        }
    }
}

/// Rows newest first, optionally capped at `limit`.
pub fn query_rows(records: &[Transaction], limit: Option<usize>) -> Vec<TransactionRow> {
    let mut sorted: Vec<&Transaction> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    sorted
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(TransactionRow::from)
        .collect()
}

fn list(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = ctx.require_session()?;
    let items = s.transactions.items();
    let data = query_rows(&items, sub.get_one::<usize>("limit").copied());
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| vec![r.date, r.kind, r.description, r.amount, r.category, r.notes, r.id])
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Amount", "Category", "Notes", "Id"],
                rows,
            )
        );
    }
    Ok(())
}
