// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneycare::api::RemoteApi;
use moneycare::categories;
use moneycare::error::ApiError;
use moneycare::models::{
    Credentials, LoginResponse, NewUser, NewWallet, Transaction, TransactionPayload, User, Wallet,
};
use moneycare::receipts::ScannedReceipt;
use rust_decimal::Decimal;
use std::sync::{Mutex, MutexGuard};

/// In-process stand-in for the remote service.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub struct FakeState {
    pub transactions: Vec<Transaction>,
    pub wallets: Vec<Wallet>,
    pub fail_list: bool,
    pub fail_create: bool,
    pub posted: Vec<TransactionPayload>,
    pub posted_wallets: Vec<NewWallet>,
    pub list_calls: usize,
    pub tokens_seen: Vec<String>,
    pub next_id: u64,
    pub user: Option<User>,
    pub password: String,
    pub receipt: Option<ScannedReceipt>,
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: Some(message.to_string()),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User, password: &str) -> Self {
        let api = Self::default();
        {
            let mut s = api.state();
            s.user = Some(user);
            s.password = password.to_string();
        }
        api
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn next_id(&self) -> String {
        let mut s = self.state();
        s.next_id += 1;
        format!("srv_{}", s.next_id)
    }
}

impl RemoteApi for FakeApi {
    fn list_transactions(&self, token: &str) -> Result<Vec<Transaction>, ApiError> {
        let mut s = self.state();
        s.list_calls += 1;
        s.tokens_seen.push(token.to_string());
        if s.fail_list {
            return Err(rejected(503, "maintenance"));
        }
        Ok(s.transactions.clone())
    }

    fn create_transaction(
        &self,
        token: &str,
        payload: &TransactionPayload,
    ) -> Result<(), ApiError> {
        let id = self.next_id();
        let mut s = self.state();
        s.tokens_seen.push(token.to_string());
        s.posted.push(payload.clone());
        if s.fail_create {
            return Err(rejected(500, "boom"));
        }
        let category = payload
            .category_id
            .as_deref()
            .and_then(|cid| categories::all().into_iter().find(|c| c.id == cid));
        s.transactions.push(Transaction {
            id,
            description: payload.description.clone(),
            amount: payload.amount,
            kind: payload.kind,
            date: payload.date,
            category,
            notes: payload.notes.clone(),
            items: payload.items.clone(),
        });
        Ok(())
    }

    fn list_wallets(&self, token: &str) -> Result<Vec<Wallet>, ApiError> {
        let mut s = self.state();
        s.tokens_seen.push(token.to_string());
        if s.fail_list {
            return Err(rejected(503, "maintenance"));
        }
        Ok(s.wallets.clone())
    }

    fn create_wallet(&self, token: &str, wallet: &NewWallet) -> Result<(), ApiError> {
        let id = self.next_id();
        let mut s = self.state();
        s.tokens_seen.push(token.to_string());
        if s.fail_create {
            return Err(rejected(500, "boom"));
        }
        s.posted_wallets.push(wallet.clone());
        s.wallets.push(Wallet {
            id,
            name: wallet.name.clone(),
            icon: wallet.icon.clone(),
            current_amount: Decimal::ZERO,
            goal_amount: wallet.goal_amount,
        });
        Ok(())
    }

    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let s = self.state();
        match &s.user {
            Some(u) if u.email == credentials.email && s.password == credentials.password => {
                Ok(LoginResponse {
                    access_token: Some(format!("token-{}", u.id)),
                    user: Some(u.clone()),
                })
            }
            _ => Err(rejected(401, "Invalid credentials")),
        }
    }

    fn register(&self, user: &NewUser) -> Result<Option<String>, ApiError> {
        if user.email.is_empty() {
            return Err(rejected(400, "email is required"));
        }
        Ok(Some(format!("Welcome, {}", user.name)))
    }

    fn scan_receipt(&self, token: &str, _qr_payload: &str) -> Result<ScannedReceipt, ApiError> {
        let mut s = self.state();
        s.tokens_seen.push(token.to_string());
        s.receipt
            .clone()
            .ok_or_else(|| rejected(422, "Could not read receipt"))
    }
}
