// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod fx;
pub mod scan;
pub mod transactions;
pub mod wallets;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::api::{HttpApi, RemoteApi};
use crate::config::Config;
use crate::kv::{KeyValueStore, SqliteKv};
use crate::session::{self, Session};

/// Everything a command handler needs: settings, local storage and, when
/// configured, the remote service.
pub struct AppContext {
    pub cfg: Config,
    pub kv: Arc<SqliteKv>,
    pub api: Option<Arc<dyn RemoteApi>>,
}

impl AppContext {
    pub fn open(cfg: Config) -> Result<Self> {
        let conn = crate::db::open_or_init(&cfg)?;
        let api: Option<Arc<dyn RemoteApi>> = match &cfg.api_url {
            Some(url) => Some(Arc::new(HttpApi::new(url, cfg.timeout)?)),
            None => None,
        };
        Ok(Self {
            kv: Arc::new(SqliteKv::new(conn)?),
            cfg,
            api,
        })
    }

    pub fn new(cfg: Config, kv: Arc<SqliteKv>, api: Option<Arc<dyn RemoteApi>>) -> Self {
        Self { cfg, kv, api }
    }

    pub fn kv(&self) -> Arc<dyn KeyValueStore> {
        self.kv.clone()
    }

    pub fn require_api(&self) -> Result<Arc<dyn RemoteApi>> {
        self.api
            .clone()
            .context("No remote service configured; set MONEYCARE_API_URL")
    }

    /// The saved session with its local data loaded.
    pub fn require_session(&self) -> Result<Session> {
        let s = session::restore(self.kv(), self.api.clone())
            .context("Not signed in; run `moneycare login` first")?;
        s.load_local();
        Ok(s)
    }
}
