// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Signed-in user context.
//!
//! A [`Session`] is created on sign-in (or restored from the persisted
//! credential) and owns the user's stores. Signing out consumes it.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::sync::{Arc, Mutex, PoisonError};

use crate::analytics::{DashboardCache, DashboardSummary, Period};
use crate::api::RemoteApi;
use crate::error::AuthError;
use crate::kv::{self, KeyValueStore};
use crate::models::{Credentials, NewUser, User};
use crate::store::{Identity, RecordStore, SyncOutcome, WalletStore};

const AUTH_TOKEN: &str = "auth_token";
const USER_DATA: &str = "user_data";

pub struct Session {
    user: User,
    token: String,
    kv: Arc<dyn KeyValueStore>,
    api: Option<Arc<dyn RemoteApi>>,
    pub transactions: RecordStore,
    pub wallets: WalletStore,
    dashboard: Mutex<DashboardCache>,
}

impl Session {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        api: Option<Arc<dyn RemoteApi>>,
        user: User,
        token: String,
    ) -> Self {
        let identity = Identity::signed_in(user.id.clone(), token.clone());
        Self {
            transactions: RecordStore::new(Arc::clone(&kv), api.clone(), identity.clone()),
            wallets: WalletStore::new(Arc::clone(&kv), api.clone(), identity),
            user,
            token,
            kv,
            api,
            dashboard: Mutex::new(DashboardCache::default()),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn api(&self) -> Option<&dyn RemoteApi> {
        self.api.as_deref()
    }

    /// Loads both collections from local storage, then tries to sync them.
    pub fn initialize(&self) -> (SyncOutcome, SyncOutcome) {
        self.transactions.load();
        let tx = self.transactions.sync();
        self.wallets.load();
        let wallets = self.wallets.sync();
        (tx, wallets)
    }

    /// Loads both collections without contacting the server.
    pub fn load_local(&self) {
        self.transactions.load();
        self.wallets.load();
    }

    pub fn dashboard<Tz: TimeZone>(&self, period: Period, now: &DateTime<Tz>) -> Arc<DashboardSummary> {
        let snap = self.transactions.snapshot();
        let mut cache = self.dashboard.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_compute(snap.revision, &snap.items, period, now)
    }

    /// Forgets the persisted credential and drops in-memory state. With
    /// `purge_local` the user's stored collections are deleted as well.
    /// Every step runs even if an earlier one fails; the first error wins.
    pub fn sign_out(self, purge_local: bool) -> Result<()> {
        let mut first_err: Option<anyhow::Error> = None;
        let mut note = |step: Result<()>| {
            if let Err(e) = step {
                log::error!("Sign-out step failed: {:#}", e);
                first_err.get_or_insert(e);
            }
        };
        note(self.kv.remove(&kv::key(AUTH_TOKEN)));
        note(self.kv.remove(&kv::key(USER_DATA)));
        if purge_local {
            note(self.transactions.purge());
            note(self.wallets.purge());
        }
        // purge resets too, but a failed purge must still clear memory
        self.transactions.reset();
        self.wallets.reset();
        log::info!("Signed out user {}", self.user.id);
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Authenticates, persists the credential and returns an initialized session.
pub fn sign_in(
    kv: Arc<dyn KeyValueStore>,
    api: Arc<dyn RemoteApi>,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    let resp = api.login(credentials)?;
    let (Some(token), Some(user)) = (resp.access_token.filter(|t| !t.is_empty()), resp.user)
    else {
        return Err(AuthError::InvalidResponse);
    };
    persist(kv.as_ref(), &token, &user).map_err(AuthError::Storage)?;
    log::info!("Signed in as {} ({})", user.email, user.id);

    let session = Session::new(kv, Some(api), user, token);
    session.initialize();
    Ok(session)
}

/// Creates an account. Returns the server's message.
pub fn sign_up(api: &dyn RemoteApi, user: &NewUser) -> Result<String, AuthError> {
    let message = api.register(user)?;
    Ok(message.unwrap_or_else(|| "Account created".to_string()))
}

/// Rebuilds the session saved by a previous sign-in, if any. Does not touch
/// the network; call [`Session::initialize`] to load and sync.
pub fn restore(kv: Arc<dyn KeyValueStore>, api: Option<Arc<dyn RemoteApi>>) -> Option<Session> {
    match read_persisted(kv.as_ref()) {
        Ok(Some((token, user))) => Some(Session::new(kv, api, user, token)),
        Ok(None) => None,
        Err(e) => {
            log::error!("Failed to restore the saved session: {:#}", e);
            None
        }
    }
}

fn persist(kv: &dyn KeyValueStore, token: &str, user: &User) -> Result<()> {
    kv.set(&kv::key(AUTH_TOKEN), token)?;
    kv.set(&kv::key(USER_DATA), &serde_json::to_string(user)?)?;
    Ok(())
}

fn read_persisted(kv: &dyn KeyValueStore) -> Result<Option<(String, User)>> {
    let token = kv.get(&kv::key(AUTH_TOKEN))?;
    let user = kv.get(&kv::key(USER_DATA))?;
    match (token, user) {
        (Some(token), Some(raw)) => {
            let user: User = serde_json::from_str(&raw).context("Corrupt saved user")?;
            Ok(Some((token, user)))
        }
        _ => Ok(None),
    }
}
