// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

pub mod fake_api;

use chrono::{DateTime, Utc};
use moneycare::categories;
use moneycare::kv::SqliteKv;
use moneycare::models::{Category, NewTransaction, Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn kv() -> Arc<SqliteKv> {
    Arc::new(SqliteKv::in_memory().unwrap())
}

pub fn category(kind: TransactionKind, name: &str) -> Category {
    categories::find(kind, name).unwrap()
}

pub fn named_expense_category(name: &str) -> Category {
    Category {
        id: format!("cat-{}", name.to_lowercase()),
        name: name.to_string(),
        icon: "shape".to_string(),
        kind: Some(TransactionKind::Expense),
    }
}

pub fn record(
    id: &str,
    amount: i64,
    kind: TransactionKind,
    category: Option<Category>,
    date: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        description: format!("tx {}", id),
        amount: Decimal::new(amount, 0),
        kind,
        date,
        category,
        notes: None,
        items: None,
    }
}

pub fn coffee(date: DateTime<Utc>) -> NewTransaction {
    NewTransaction {
        description: "Coffee".to_string(),
        amount: Decimal::new(5, 0),
        kind: TransactionKind::Expense,
        category: Some(category(TransactionKind::Expense, "Shopping")),
        date,
        notes: None,
        items: None,
    }
}
