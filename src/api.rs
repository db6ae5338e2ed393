// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client for the MoneyCare remote service.

use anyhow::Result;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::{
    Credentials, LoginResponse, NewUser, NewWallet, Transaction, TransactionPayload, Wallet,
};
use crate::receipts::ScannedReceipt;

/// Operations the client needs from the remote service. Everything except
/// `login` and `register` is bearer-authenticated.
pub trait RemoteApi: Send + Sync {
    fn list_transactions(&self, token: &str) -> Result<Vec<Transaction>, ApiError>;
    fn create_transaction(&self, token: &str, payload: &TransactionPayload)
    -> Result<(), ApiError>;
    fn list_wallets(&self, token: &str) -> Result<Vec<Wallet>, ApiError>;
    fn create_wallet(&self, token: &str, wallet: &NewWallet) -> Result<(), ApiError>;
    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    fn register(&self, user: &NewUser) -> Result<Option<String>, ApiError>;
    fn scan_receipt(&self, token: &str, qr_payload: &str) -> Result<ScannedReceipt, ApiError>;
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScanEnvelope {
    data: ScannedReceipt,
}

pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: crate::utils::http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<MessageBody>()
            .ok()
            .and_then(|b| b.message);
        log::debug!("Remote call failed with {}: {:?}", status, message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", path);
        let resp = self.send(self.client.get(self.url(path)).bearer_auth(token))?;
        decode(resp, path)
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Response, ApiError> {
        log::debug!("POST {}", path);
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        self.send(req)
    }
}

fn decode<T: DeserializeOwned>(resp: Response, path: &str) -> Result<T, ApiError> {
    let text = resp.text()?;
    serde_json::from_str(&text)
        .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
}

impl RemoteApi for HttpApi {
    fn list_transactions(&self, token: &str) -> Result<Vec<Transaction>, ApiError> {
        self.get_json("/transactions", token)
    }

    fn create_transaction(
        &self,
        token: &str,
        payload: &TransactionPayload,
    ) -> Result<(), ApiError> {
        self.post("/transactions", Some(token), payload)?;
        Ok(())
    }

    fn list_wallets(&self, token: &str) -> Result<Vec<Wallet>, ApiError> {
        self.get_json("/wallets", token)
    }

    fn create_wallet(&self, token: &str, wallet: &NewWallet) -> Result<(), ApiError> {
        self.post("/wallets", Some(token), wallet)?;
        Ok(())
    }

    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let resp = self.post("/auth/login", None, credentials)?;
        decode(resp, "/auth/login")
    }

    fn register(&self, user: &NewUser) -> Result<Option<String>, ApiError> {
        let resp = self.post("/auth/register", None, user)?;
        let body: MessageBody = resp.json().unwrap_or(MessageBody { message: None });
        Ok(body.message)
    }

    fn scan_receipt(&self, token: &str, qr_payload: &str) -> Result<ScannedReceipt, ApiError> {
        let resp = self.post(
            "/receipts/scan-qrcode",
            Some(token),
            &json!({ "sefaz_url": qr_payload }),
        )?;
        let env: ScanEnvelope = decode(resp, "/receipts/scan-qrcode")?;
        Ok(env.data)
    }
}
