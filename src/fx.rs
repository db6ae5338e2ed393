// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Exchange rates for the dashboard, fetched from Frankfurter (ECB).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DASHBOARD_QUOTES: [&str; 4] = ["USD", "EUR", "GBP", "JPY"];

#[derive(Debug, Deserialize)]
struct Latest {
    date: NaiveDate,
    #[serde(rename = "base")]
    _base: String,
    rates: HashMap<String, f64>,
}

/// Value of one unit of `quote` in `base` on `date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rate {
    pub date: NaiveDate,
    pub base: String,
    pub quote: String,
    pub rate: Decimal,
}

/// Turns a `latest?from=<base>` response (1 base = x quote) into per-quote
/// prices in the base currency. Zero rates are dropped.
pub fn invert_latest(body: &str, base: &str) -> Result<Vec<Rate>> {
    let latest: Latest = serde_json::from_str(body).context("Invalid FX response")?;
    let mut out = Vec::new();
    for (quote, rate) in latest.rates {
        let r = Decimal::try_from(rate)
            .with_context(|| format!("Invalid rate {} for {}", rate, quote))?;
        if quote == base {
            continue;
        }
        if r.is_zero() {
            log::warn!("Skipping zero rate for {}/{}", base, quote);
            continue;
        }
        out.push(Rate {
            date: latest.date,
            base: base.to_string(),
            quote,
            rate: (Decimal::ONE / r).round_dp(6),
        });
    }
    out.sort_by(|a, b| a.quote.cmp(&b.quote));
    Ok(out)
}

/// Rates for the given quotes. The base itself is never requested.
pub fn fetch_latest(
    client: &reqwest::blocking::Client,
    fx_url: &str,
    base: &str,
    quotes: &[&str],
) -> Result<Vec<Rate>> {
    let targets: Vec<&str> = quotes.iter().copied().filter(|q| *q != base).collect();
    if targets.is_empty() {
        return Ok(Vec::new());
    }
    let url = format!("{}/latest?from={}&to={}", fx_url, base, targets.join(","));
    get_latest(client, &url, base)
}

/// Rates for every currency the provider publishes against `base`.
pub fn fetch_all(
    client: &reqwest::blocking::Client,
    fx_url: &str,
    base: &str,
) -> Result<Vec<Rate>> {
    let url = format!("{}/latest?from={}", fx_url, base);
    get_latest(client, &url, base)
}

fn get_latest(client: &reqwest::blocking::Client, url: &str, base: &str) -> Result<Vec<Rate>> {
    log::debug!("GET {}", url);
    let resp = client.get(url).send()?.error_for_status()?;
    invert_latest(&resp.text()?, base)
}

pub fn store_rates(conn: &Connection, rates: &[Rate]) -> Result<usize> {
    let mut n = 0;
    for r in rates {
        n += conn.execute(
            "INSERT INTO fx_rates(date, base, quote, rate) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date, base, quote) DO UPDATE SET rate=excluded.rate",
            params![r.date.to_string(), r.base, r.quote, r.rate.to_string()],
        )?;
    }
    Ok(n)
}

/// Most recent stored rate per quote for `base`, optionally filtered by a
/// case-insensitive substring of the currency code.
pub fn latest_rates(conn: &Connection, base: &str, filter: Option<&str>) -> Result<Vec<Rate>> {
    let mut stmt = conn.prepare(
        "SELECT f.date, f.quote, f.rate FROM fx_rates f
         WHERE f.base=?1 AND f.date=(SELECT MAX(date) FROM fx_rates g WHERE g.base=f.base AND g.quote=f.quote)
         ORDER BY f.quote",
    )?;
    let rows = stmt.query_map(params![base], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let needle = filter.map(|f| f.trim().to_uppercase()).filter(|f| !f.is_empty());
    let mut out = Vec::new();
    for row in rows {
        let (d, quote, rate) = row?;
        if let Some(n) = &needle {
            if !quote.contains(n.as_str()) {
                continue;
            }
        }
        out.push(Rate {
            date: NaiveDate::parse_from_str(&d, "%Y-%m-%d")?,
            base: base.to_string(),
            rate: rate
                .parse::<Decimal>()
                .with_context(|| format!("Invalid rate '{}' for {}/{}", rate, base, quote))?,
            quote,
        });
    }
    Ok(out)
}
