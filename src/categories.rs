// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::models::{Category, TransactionKind};

/// Name used for records that carry no category.
pub const FALLBACK_NAME: &str = "Other";

const EXPENSE: &[(&str, &str, &str)] = &[
    ("1", "Shopping", "cart"),
    ("2", "Car", "car"),
    ("3", "Fuel", "gas-station"),
    ("4", "Education", "school"),
    ("5", "Taxes", "bank"),
    ("6", "Leisure", "ferris-wheel"),
    ("7", "Health", "hospital-box"),
    ("8", "Other", "shape"),
];

const INCOME: &[(&str, &str, &str)] = &[
    ("9", "Salary", "cash"),
    ("10", "Freelance", "laptop"),
    ("11", "Investments", "chart-line"),
    ("12", "Gifts", "gift"),
    ("13", "Other income", "plus-circle"),
];

fn build(rows: &[(&str, &str, &str)], kind: TransactionKind) -> impl Iterator<Item = Category> {
    rows.iter().map(move |(id, name, icon)| Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        kind: Some(kind),
    })
}

pub fn all() -> Vec<Category> {
    build(EXPENSE, TransactionKind::Expense)
        .chain(build(INCOME, TransactionKind::Income))
        .collect()
}

/// Categories offered for a transaction of the given kind.
pub fn for_kind(kind: TransactionKind) -> Vec<Category> {
    match kind {
        TransactionKind::Expense => build(EXPENSE, kind).collect(),
        TransactionKind::Income => build(INCOME, kind).collect(),
    }
}

/// Looks a category up by id or case-insensitive name within one kind.
pub fn find(kind: TransactionKind, needle: &str) -> Result<Category> {
    let needle = needle.trim();
    for_kind(kind)
        .into_iter()
        .find(|c| c.id == needle || c.name.eq_ignore_ascii_case(needle))
        .with_context(|| format!("No {} category matches '{}'", kind, needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_do_not_overlap() {
        assert!(for_kind(TransactionKind::Expense)
            .iter()
            .all(|c| c.kind == Some(TransactionKind::Expense)));
        assert_eq!(all().len(), EXPENSE.len() + INCOME.len());
    }

    #[test]
    fn find_by_id_or_name() {
        assert_eq!(find(TransactionKind::Expense, "fuel").unwrap().id, "3");
        assert_eq!(find(TransactionKind::Income, "9").unwrap().name, "Salary");
        assert!(find(TransactionKind::Income, "Fuel").is_err());
    }
}
