// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local-first storage of a user's transactions and wallets.
//!
//! Each store keeps the authoritative on-device copy of one collection,
//! persisted as a JSON array under `@MoneyCare:<collection>_<user id>`, and
//! reconciles it with the remote service when it can. A successful sync
//! replaces the local collection wholesale with the server's answer; a failed
//! one leaves it untouched.
//!
//! All operations on one store are serialised behind a single mutex that is
//! held across the remote calls, so a create's append cannot be lost to a
//! sync running at the same time.

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::RemoteApi;
use crate::error::{ApiError, StoreError};
use crate::kv::{self, KeyValueStore};
use crate::models::{NewTransaction, NewWallet, Transaction, TransactionPayload, Wallet};

pub const LOCAL_ID_PREFIX: &str = "local_";

/// A collection that lives both on the device and on the remote service.
pub trait RemoteCollection: Send + Sync + 'static {
    type Item: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Key name inside the `@MoneyCare` namespace, without the user suffix.
    const NAME: &'static str;

    fn fetch(api: &dyn RemoteApi, token: &str) -> Result<Vec<Self::Item>, ApiError>;
}

pub struct Transactions;

impl RemoteCollection for Transactions {
    type Item = Transaction;
    const NAME: &'static str = "transactions";

    fn fetch(api: &dyn RemoteApi, token: &str) -> Result<Vec<Transaction>, ApiError> {
        api.list_transactions(token)
    }
}

pub struct Wallets;

impl RemoteCollection for Wallets {
    type Item = Wallet;
    const NAME: &'static str = "wallets";

    fn fetch(api: &dyn RemoteApi, token: &str) -> Result<Vec<Wallet>, ApiError> {
        api.list_wallets(token)
    }
}

pub type RecordStore = LocalFirstStore<Transactions>;
pub type WalletStore = LocalFirstStore<Wallets>;

/// Who the store belongs to. Both parts are optional: without a user id the
/// store holds nothing, without a token it never talks to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            token: Some(token.into()),
        }
    }

    pub fn local_only(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Loading,
    LocalOnly,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No user, token or endpoint: nothing was attempted.
    Offline,
    Synced { count: usize },
    /// The remote call or the local write failed; local state is unchanged.
    Failed,
}

/// Immutable view of a store at one revision.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub revision: u64,
    pub items: Arc<Vec<T>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            items: Arc::clone(&self.items),
        }
    }
}

struct Inner<T> {
    state: SyncState,
    items: Arc<Vec<T>>,
    revision: u64,
    last_local_stamp: i64,
}

impl<T> Inner<T> {
    fn publish(&mut self, items: Vec<T>) {
        self.items = Arc::new(items);
        self.revision += 1;
    }
}

pub struct LocalFirstStore<C: RemoteCollection> {
    kv: Arc<dyn KeyValueStore>,
    api: Option<Arc<dyn RemoteApi>>,
    identity: Identity,
    inner: Mutex<Inner<C::Item>>,
    _collection: PhantomData<C>,
}

impl<C: RemoteCollection> LocalFirstStore<C> {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        api: Option<Arc<dyn RemoteApi>>,
        identity: Identity,
    ) -> Self {
        Self {
            kv,
            api,
            identity,
            inner: Mutex::new(Inner {
                state: SyncState::Uninitialized,
                items: Arc::new(Vec::new()),
                revision: 0,
                last_local_stamp: 0,
            }),
            _collection: PhantomData,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn storage_key(&self) -> Option<String> {
        self.identity
            .user_id
            .as_deref()
            .map(|id| kv::key(&format!("{}_{}", C::NAME, id)))
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C::Item>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SyncState {
        self.lock().state
    }

    pub fn snapshot(&self) -> Snapshot<C::Item> {
        let inner = self.lock();
        Snapshot {
            revision: inner.revision,
            items: Arc::clone(&inner.items),
        }
    }

    pub fn items(&self) -> Arc<Vec<C::Item>> {
        Arc::clone(&self.lock().items)
    }

    /// Reads the persisted collection into memory. Unreadable data counts as
    /// an empty collection.
    pub fn load(&self) -> Arc<Vec<C::Item>> {
        let mut inner = self.lock();
        self.load_locked(&mut inner);
        Arc::clone(&inner.items)
    }

    fn load_locked(&self, inner: &mut Inner<C::Item>) {
        let Some(key) = self.storage_key() else {
            return;
        };
        inner.state = SyncState::Loading;
        let items = match self.read_persisted(&key) {
            Ok(items) => items,
            Err(e) => {
                log::error!("Failed to load {} from local storage: {:#}", C::NAME, e);
                Vec::new()
            }
        };
        log::debug!("Loaded {} local {} from '{}'", items.len(), C::NAME, key);
        inner.publish(items);
        inner.state = SyncState::LocalOnly;
    }

    fn read_persisted(&self, key: &str) -> anyhow::Result<Vec<C::Item>> {
        match self.kv.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt {} document under '{}'", C::NAME, key)),
            None => Ok(Vec::new()),
        }
    }

    fn write_persisted(&self, key: &str, items: &[C::Item]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(items)?;
        self.kv.set(key, &raw)
    }

    /// Replaces the local collection with the server's copy.
    pub fn sync(&self) -> SyncOutcome {
        let mut inner = self.lock();
        self.sync_locked(&mut inner)
    }

    fn sync_locked(&self, inner: &mut Inner<C::Item>) -> SyncOutcome {
        let (Some(key), Some(token), Some(api)) =
            (self.storage_key(), self.identity.token.as_deref(), self.api.as_deref())
        else {
            log::info!("No signed-in user or remote service; using local {}", C::NAME);
            return SyncOutcome::Offline;
        };

        log::info!("Syncing {} with the remote service", C::NAME);
        let remote = match C::fetch(api, token) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("Failed to sync {}, keeping local data: {}", C::NAME, e);
                return SyncOutcome::Failed;
            }
        };
        if let Err(e) = self.write_persisted(&key, &remote) {
            log::error!("Failed to persist synced {}: {:#}", C::NAME, e);
            return SyncOutcome::Failed;
        }
        let count = remote.len();
        inner.publish(remote);
        inner.state = SyncState::Synced;
        log::info!(
            "{} {} synced for user {}",
            count,
            C::NAME,
            self.identity.user_id.as_deref().unwrap_or_default()
        );
        SyncOutcome::Synced { count }
    }

    /// Drops in-memory state. Persisted data stays for the next sign-in.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.publish(Vec::new());
        inner.state = SyncState::Uninitialized;
    }

    /// Deletes the persisted collection and drops in-memory state.
    pub fn purge(&self) -> anyhow::Result<()> {
        if let Some(key) = self.storage_key() {
            self.kv.remove(&key)?;
        }
        self.reset();
        Ok(())
    }

    fn remote(&self) -> Option<(&dyn RemoteApi, &str)> {
        Some((self.api.as_deref()?, self.identity.token.as_deref()?))
    }
}

impl LocalFirstStore<Transactions> {
    /// Records a transaction locally, then pushes it to the server and
    /// re-syncs when a session is available. Only validation and the local
    /// write can fail the call.
    pub fn create(&self, new: NewTransaction) -> Result<Transaction, StoreError> {
        let key = self.storage_key().ok_or(StoreError::NotAuthenticated)?;
        new.validate()?;

        let mut inner = self.lock();
        // appending to a never-loaded store would overwrite what is on disk
        if inner.state == SyncState::Uninitialized {
            self.load_locked(&mut inner);
        }
        let stamp = Utc::now().timestamp_millis().max(inner.last_local_stamp + 1);
        let record = new.into_transaction(format!("{}{}", LOCAL_ID_PREFIX, stamp));

        let mut next = Vec::with_capacity(inner.items.len() + 1);
        next.extend(inner.items.iter().cloned());
        next.push(record.clone());
        self.write_persisted(&key, &next)
            .map_err(StoreError::Storage)?;
        inner.last_local_stamp = stamp;
        inner.publish(next);
        log::info!("Saved transaction {} locally", record.id);

        if let Some((api, token)) = self.remote() {
            let payload = TransactionPayload::from(&record);
            if let Err(e) = api.create_transaction(token, &payload) {
                log::warn!("Failed to send transaction {} to the server: {}", record.id, e);
            }
            self.sync_locked(&mut inner);
        }
        Ok(record)
    }
}

impl LocalFirstStore<Wallets> {
    /// Creates a wallet on the server and re-syncs. Wallets have no
    /// optimistic local write.
    pub fn create(&self, new: NewWallet) -> Result<SyncOutcome, StoreError> {
        new.validate()?;
        if self.storage_key().is_none() {
            return Err(StoreError::NotAuthenticated);
        }
        let (api, token) = self.remote().ok_or(StoreError::Offline)?;

        let mut inner = self.lock();
        api.create_wallet(token, &new).map_err(|e| {
            log::warn!("Failed to create wallet '{}': {}", new.name, e);
            StoreError::Remote(e)
        })?;
        Ok(self.sync_locked(&mut inner))
    }
}
