// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::RemoteApi;
use crate::error::{StoreError, ValidationErrors};
use crate::models::{Category, LineItem, NewTransaction, TransactionKind};

/// Receipt contents extracted server-side from a fiscal QR code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedReceipt {
    #[serde(default, alias = "storeName", alias = "establishment")]
    pub description: Option<String>,
    #[serde(alias = "amount", alias = "total")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl ScannedReceipt {
    /// Expense pre-filled from the receipt. The caller still picks a category.
    pub fn into_draft(self, now: DateTime<Utc>) -> NewTransaction {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Receipt".to_string());
        NewTransaction {
            description,
            amount: self.total_amount,
            kind: TransactionKind::Expense,
            category: None,
            date: self.date.unwrap_or(now),
            notes: None,
            items: if self.items.is_empty() {
                None
            } else {
                Some(self.items)
            },
        }
    }
}

pub fn scan(
    api: &dyn RemoteApi,
    token: &str,
    qr_payload: &str,
    now: DateTime<Utc>,
) -> Result<NewTransaction, StoreError> {
    let qr = qr_payload.trim();
    if qr.is_empty() {
        let mut errors = ValidationErrors::default();
        errors.push("qr", "QR code payload is empty");
        return Err(errors.into());
    }
    let receipt = api.scan_receipt(token, qr)?;
    log::info!(
        "Scanned receipt: {} item(s), total {}",
        receipt.items.len(),
        receipt.total_amount
    );
    Ok(receipt.into_draft(now))
}

/// Completes a scanned draft with the chosen category.
pub fn with_category(mut draft: NewTransaction, category: Category) -> NewTransaction {
    draft.category = Some(category);
    draft
}
