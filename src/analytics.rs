// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard figures derived from a transaction list and a trailing period.

use anyhow::anyhow;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::models::{Transaction, TransactionKind};

pub const CHART_COLORS: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40",
];
pub const BREAKDOWN_LIMIT: usize = 5;
pub const RECENT_LIMIT: usize = 5;
pub const SERIES_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "3m")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Week, Period::Month, Period::Quarter, Period::Year];

    pub fn window(&self) -> Duration {
        match self {
            Period::Week => Duration::days(7),
            Period::Month => Duration::days(30),
            Period::Quarter => Duration::days(90),
            Period::Year => Duration::days(365),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "7d",
            Period::Month => "30d",
            Period::Quarter => "3m",
            Period::Year => "1y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Invalid period '{}', expected 7d|30d|3m|1y", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: Decimal,
    pub color: &'static str,
    /// Share of the period's expenses, 0..=100.
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// `dd/mm`
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub period: Period,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub transaction_count: usize,
    pub category_breakdown: Vec<CategorySlice>,
    pub daily_series: Vec<DailyPoint>,
    pub recent: Vec<Transaction>,
}

/// Computes the dashboard for `period` as seen at `now`. Calendar days for
/// the seven-day series are taken in the time zone of `now`.
pub fn compute<Tz: TimeZone>(
    records: &[Transaction],
    period: Period,
    now: &DateTime<Tz>,
) -> DashboardSummary {
    let now_utc = now.with_timezone(&Utc);
    let start = now_utc - period.window();
    let in_period: Vec<&Transaction> = records.iter().filter(|t| t.date >= start).collect();

    let total_income = sum_kind(&in_period, TransactionKind::Income);
    let total_expenses = sum_kind(&in_period, TransactionKind::Expense);

    DashboardSummary {
        period,
        total_income,
        total_expenses,
        balance: total_income.saturating_sub(total_expenses),
        transaction_count: in_period.len(),
        category_breakdown: category_breakdown(&in_period, total_expenses),
        daily_series: daily_series(records, now),
        recent: recent(records),
    }
}

fn sum_kind(records: &[&Transaction], kind: TransactionKind) -> Decimal {
    records
        .iter()
        .filter(|t| t.kind == kind)
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

fn category_breakdown(records: &[&Transaction], total_expenses: Decimal) -> Vec<CategorySlice> {
    let mut groups: HashMap<&str, Decimal> = HashMap::new();
    for t in records.iter().filter(|t| t.kind == TransactionKind::Expense) {
        let total = groups.entry(t.category_name()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(t.amount);
    }
    let mut items: Vec<(&str, Decimal)> = groups.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    items
        .into_iter()
        .take(BREAKDOWN_LIMIT)
        .enumerate()
        .map(|(rank, (name, value))| CategorySlice {
            name: name.to_string(),
            value,
            color: CHART_COLORS[rank % CHART_COLORS.len()],
            percent: percent_of(value, total_expenses),
        })
        .collect()
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    // sums saturate, so divide first to stay in range
    part.checked_div(whole)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

fn daily_series<Tz: TimeZone>(records: &[Transaction], now: &DateTime<Tz>) -> Vec<DailyPoint> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut by_day: HashMap<NaiveDate, Decimal> = HashMap::new();
    for t in records {
        let day = t.date.with_timezone(&tz).date_naive();
        let net = by_day.entry(day).or_insert(Decimal::ZERO);
        *net = net.saturating_add(t.signed_amount());
    }

    (0..SERIES_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DailyPoint {
                date,
                label: date.format("%d/%m").to_string(),
                value: by_day.get(&date).copied().unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

fn recent(records: &[Transaction]) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.into_iter().take(RECENT_LIMIT).cloned().collect()
}

/// Memo over `compute`: recomputes only when the store revision, the period
/// or `now` changes.
#[derive(Default)]
pub struct DashboardCache {
    entry: Option<((u64, Period, DateTime<Utc>), Arc<DashboardSummary>)>,
}

impl DashboardCache {
    pub fn get_or_compute<Tz: TimeZone>(
        &mut self,
        revision: u64,
        records: &[Transaction],
        period: Period,
        now: &DateTime<Tz>,
    ) -> Arc<DashboardSummary> {
        let key = (revision, period, now.with_timezone(&Utc));
        if let Some((cached_key, summary)) = &self.entry {
            if *cached_key == key {
                return Arc::clone(summary);
            }
        }
        let summary = Arc::new(compute(records, period, now));
        self.entry = Some((key, Arc::clone(&summary)));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parses_its_labels() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
        assert!("2w".parse::<Period>().is_err());
    }

    #[test]
    fn huge_amounts_saturate_instead_of_panicking() {
        let now = Utc::now();
        let big = |id: &str, kind| Transaction {
            id: id.to_string(),
            description: "big".to_string(),
            amount: Decimal::MAX,
            kind,
            date: now,
            category: None,
            notes: None,
            items: None,
        };
        let records = vec![
            big("1", TransactionKind::Expense),
            big("2", TransactionKind::Expense),
            big("3", TransactionKind::Income),
        ];
        let s = compute(&records, Period::Week, &now);
        assert_eq!(s.total_expenses, Decimal::MAX);
        assert_eq!(s.balance, Decimal::ZERO);
        assert_eq!(s.category_breakdown[0].value, Decimal::MAX);
        assert_eq!(s.category_breakdown[0].percent, Decimal::ONE_HUNDRED);
        assert_eq!(s.daily_series[6].value, Decimal::ZERO);
    }

    #[test]
    fn percent_guards_zero_total() {
        assert_eq!(percent_of(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            percent_of(Decimal::new(40, 0), Decimal::new(160, 0)),
            Decimal::new(25, 0)
        );
    }
}
