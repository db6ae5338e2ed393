// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "entrada")]
    Income,
    #[serde(alias = "saida")]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "entrada" => Ok(TransactionKind::Income),
            "expense" | "saida" => Ok(TransactionKind::Expense),
            other => Err(anyhow::anyhow!(
                "Invalid transaction type '{}', expected income|expense",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawLineItem")]
pub struct LineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub quantity: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_price: Decimal,
}

/// Wire shape of a line item; `totalPrice` is derived when absent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLineItem {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    #[serde(default)]
    total_price: Option<Decimal>,
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        Self {
            id: raw.id,
            total_price: raw.total_price.unwrap_or(raw.quantity * raw.unit_price),
            description: raw.description,
            quantity: raw.quantity,
            unit_price: raw.unit_price,
        }
    }
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: None,
            description: description.into(),
            quantity,
            unit_price,
            total_price: quantity * unit_price,
        }
    }
}

/// A single income or expense entry as held on the device and on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(deserialize_with = "lenient_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

impl Transaction {
    pub fn is_local(&self) -> bool {
        self.id.starts_with(crate::store::LOCAL_ID_PREFIX)
    }

    /// Amount with the sign implied by the kind.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(crate::categories::FALLBACK_NAME)
    }
}

/// User input for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: Option<Category>,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub items: Option<Vec<LineItem>>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.description.trim().is_empty() {
            errors.push("description", "description is required");
        }
        if self.amount <= Decimal::ZERO {
            errors.push("amount", "amount must be positive");
        }
        match &self.category {
            None => errors.push("category", "category is required"),
            Some(cat) if cat.kind != Some(self.kind) => errors.push(
                "category",
                format!(
                    "category '{}' cannot be used for a {} transaction",
                    cat.name, self.kind
                ),
            ),
            Some(_) => {}
        }
        if let Some(items) = &self.items {
            if items.iter().any(|i| i.quantity <= Decimal::ZERO) {
                errors.push("items", "line item quantity must be positive");
            }
            if items.iter().any(|i| i.unit_price < Decimal::ZERO) {
                errors.push("items", "line item price cannot be negative");
            }
        }
        errors.into_result()
    }

    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Transaction {
            id,
            description: self.description.trim().to_string(),
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            category: self.category,
            notes,
            items: self.items,
        }
    }
}

/// Body of `POST /transactions`: the category travels as a bare id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

impl From<&Transaction> for TransactionPayload {
    fn from(t: &Transaction) -> Self {
        Self {
            description: t.description.clone(),
            amount: t.amount,
            kind: t.kind,
            date: t.date,
            category_id: t.category.as_ref().map(|c| c.id.clone()),
            notes: t.notes.clone(),
            items: t.items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize")]
    pub current_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub goal_amount: Decimal,
}

impl Wallet {
    /// Fraction of the goal reached, clamped to `0..=1`.
    pub fn progress(&self) -> Decimal {
        if self.goal_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.current_amount / self.goal_amount).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub name: String,
    pub icon: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub goal_amount: Decimal,
}

impl NewWallet {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "wallet name is required");
        }
        if self.goal_amount <= Decimal::ZERO {
            errors.push("goalAmount", "goal amount must be positive");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(v: StringOrNumber) -> Self {
        match v {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

// Servers hand out numeric ids while locally created rows use strings.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(d).map(String::from)
}

// Server rows may carry a bare day or a timestamp without offset.
fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    crate::utils::parse_date(&raw).map_err(|e| serde::de::Error::custom(format!("{:#}", e)))
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn food() -> Category {
        Category {
            id: "1".into(),
            name: "Food".into(),
            icon: "cart".into(),
            kind: Some(TransactionKind::Expense),
        }
    }

    fn draft() -> NewTransaction {
        NewTransaction {
            description: "Coffee".into(),
            amount: Decimal::new(5, 0),
            kind: TransactionKind::Expense,
            category: Some(food()),
            date: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            notes: None,
            items: None,
        }
    }

    #[test]
    fn server_rows_with_numeric_ids_and_legacy_kinds_decode() {
        let raw = r#"{"id":42,"description":"Salary","amount":2500.5,"type":"entrada",
            "date":"2025-03-01T12:00:00.000Z","category":{"id":9,"name":"Salary","icon":"cash","type":"income"}}"#;
        let t: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, "42");
        assert_eq!(t.kind, TransactionKind::Income);
        assert_eq!(t.amount, Decimal::new(25005, 1));
        assert_eq!(t.category.unwrap().id, "9");
    }

    #[test]
    fn server_dates_without_offset_decode_as_utc() {
        let row = |date: &str| {
            format!(
                r#"{{"id":1,"description":"Bus","amount":4.5,"type":"saida","date":"{}"}}"#,
                date
            )
        };
        let day: Transaction = serde_json::from_str(&row("2025-03-01")).unwrap();
        assert_eq!(day.date, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        let naive: Transaction = serde_json::from_str(&row("2025-03-01T12:00:00")).unwrap();
        assert_eq!(naive.date, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let offset: Transaction = serde_json::from_str(&row("2025-03-01T09:00:00-03:00")).unwrap();
        assert_eq!(offset.date, naive.date);
        assert!(serde_json::from_str::<Transaction>(&row("yesterday")).is_err());
    }

    #[test]
    fn missing_line_item_total_is_computed() {
        let raw = r#"{"description":"Milk","quantity":3,"unitPrice":"4.50"}"#;
        let item: LineItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.total_price, Decimal::new(1350, 2));
        assert!(item.id.is_none());

        let given = r#"{"id":7,"description":"Milk","quantity":3,"unitPrice":4.5,"totalPrice":12}"#;
        let item: LineItem = serde_json::from_str(given).unwrap();
        assert_eq!(item.total_price, Decimal::new(12, 0));
        assert_eq!(item.id.as_deref(), Some("7"));
    }

    #[test]
    fn payload_carries_category_id_only() {
        let t = draft().into_transaction("local_1".into());
        let v = serde_json::to_value(TransactionPayload::from(&t)).unwrap();
        assert_eq!(v["categoryId"], "1");
        assert_eq!(v["type"], "expense");
        assert!(v.get("category").is_none());
        assert!(v.get("id").is_none());
    }

    #[test]
    fn validation_collects_every_field_error() {
        let mut d = draft();
        d.description = "   ".into();
        d.amount = Decimal::ZERO;
        d.category = None;
        let errs = d.validate().unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["description", "amount", "category"]);
    }

    #[test]
    fn validation_rejects_category_of_the_other_kind() {
        let mut d = draft();
        d.kind = TransactionKind::Income;
        let errs = d.validate().unwrap_err();
        assert_eq!(errs.iter().next().unwrap().field, "category");
    }

    #[test]
    fn line_item_total_is_quantity_times_price() {
        let item = LineItem::new("Milk", Decimal::new(3, 0), Decimal::new(450, 2));
        assert_eq!(item.total_price, Decimal::new(1350, 2));
    }

    #[test]
    fn wallet_progress_guards_zero_goal() {
        let mut w = Wallet {
            id: "1".into(),
            name: "Trip".into(),
            icon: "airplane".into(),
            current_amount: Decimal::new(4500, 0),
            goal_amount: Decimal::new(15000, 0),
        };
        assert_eq!(w.progress(), Decimal::new(3, 1));
        w.goal_amount = Decimal::ZERO;
        assert_eq!(w.progress(), Decimal::ZERO);
    }
}
