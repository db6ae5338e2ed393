// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod support;

use chrono::{Duration, TimeZone, Utc};
use moneycare::analytics::Period;
use moneycare::api::RemoteApi;
use moneycare::error::AuthError;
use moneycare::kv::{KeyValueStore, SqliteKv};
use moneycare::models::{Credentials, NewUser, TransactionKind, User};
use moneycare::session;
use moneycare::store::{SyncOutcome, SyncState};
use std::sync::Arc;
use support::fake_api::FakeApi;
use support::{coffee, kv, record};

fn ana() -> User {
    User {
        id: "42".to_string(),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
    }
}

fn creds(password: &str) -> Credentials {
    Credentials {
        email: "ana@example.com".to_string(),
        password: password.to_string(),
    }
}

fn api_with_ana() -> Arc<FakeApi> {
    Arc::new(FakeApi::with_user(ana(), "s3cret"))
}

#[test]
fn sign_in_persists_credential_and_syncs() {
    let kv = kv();
    let api = api_with_ana();
    let day = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    api.state().transactions = vec![record("7", 120, TransactionKind::Income, None, day)];

    let s = session::sign_in(kv.clone(), api.clone(), &creds("s3cret")).unwrap();
    assert_eq!(s.user(), &ana());
    assert_eq!(s.token(), "token-42");
    assert_eq!(s.transactions.state(), SyncState::Synced);
    assert_eq!(s.transactions.items().len(), 1);
    assert!(api.state().tokens_seen.iter().all(|t| t == "token-42"));

    assert_eq!(kv.get("@MoneyCare:auth_token").unwrap().as_deref(), Some("token-42"));
    let saved = kv.get("@MoneyCare:user_data").unwrap().unwrap();
    assert!(saved.contains("ana@example.com"));
    assert!(kv.get("@MoneyCare:transactions_42").unwrap().is_some());
}

#[test]
fn rejected_login_persists_nothing() {
    let kv = kv();
    let err = session::sign_in(kv.clone(), api_with_ana(), &creds("wrong"))
        .err()
        .unwrap();
    match err {
        AuthError::Rejected(msg) => assert_eq!(msg, "Invalid credentials"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(kv.get("@MoneyCare:auth_token").unwrap().is_none());
}

#[test]
fn restore_rebuilds_saved_session_without_network() {
    let kv = kv();
    let api = api_with_ana();
    session::sign_in(kv.clone(), api.clone(), &creds("s3cret")).unwrap();
    let calls = api.state().list_calls;

    let restored = session::restore(kv.clone(), Some(api.clone() as Arc<dyn RemoteApi>)).unwrap();
    assert_eq!(restored.user().id, "42");
    assert_eq!(restored.token(), "token-42");
    assert_eq!(restored.transactions.state(), SyncState::Uninitialized);
    assert_eq!(api.state().list_calls, calls);

    let (tx, wallets) = restored.initialize();
    assert_eq!(tx, SyncOutcome::Synced { count: 0 });
    assert_eq!(wallets, SyncOutcome::Synced { count: 0 });
}

#[test]
fn restore_without_saved_session_is_none() {
    assert!(session::restore(kv(), None).is_none());
}

#[test]
fn restored_session_works_offline() {
    let kv = kv();
    session::sign_in(kv.clone(), api_with_ana(), &creds("s3cret")).unwrap();

    let offline = session::restore(kv.clone(), None).unwrap();
    assert_eq!(offline.initialize(), (SyncOutcome::Offline, SyncOutcome::Offline));
    offline.transactions.create(coffee(Utc::now())).unwrap();

    let again = session::restore(kv, None).unwrap();
    again.load_local();
    assert_eq!(again.transactions.items().len(), 1);
}

#[test]
fn sign_out_keeps_local_data_unless_purged() {
    let kv = kv();
    let api = api_with_ana();
    let s = session::sign_in(kv.clone(), api.clone(), &creds("s3cret")).unwrap();
    s.sign_out(false).unwrap();
    assert!(kv.get("@MoneyCare:auth_token").unwrap().is_none());
    assert!(kv.get("@MoneyCare:user_data").unwrap().is_none());
    assert!(kv.get("@MoneyCare:transactions_42").unwrap().is_some());
    assert!(session::restore(kv.clone(), None).is_none());

    let s = session::sign_in(kv.clone(), api, &creds("s3cret")).unwrap();
    s.sign_out(true).unwrap();
    assert!(kv.get("@MoneyCare:transactions_42").unwrap().is_none());
    assert!(kv.get("@MoneyCare:wallets_42").unwrap().is_none());
}

/// Key/value store that refuses to forget the credential.
struct StickyTokenKv(SqliteKv);

impl KeyValueStore for StickyTokenKv {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.get(key)
    }
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0.set(key, value)
    }
    fn remove(&self, key: &str) -> anyhow::Result<()> {
        if key.ends_with("auth_token") {
            anyhow::bail!("database is locked");
        }
        self.0.remove(key)
    }
}

#[test]
fn sign_out_still_purges_when_forgetting_the_token_fails() {
    let kv = Arc::new(StickyTokenKv(SqliteKv::in_memory().unwrap()));
    let s = session::Session::new(kv.clone(), None, ana(), "token-42".to_string());
    s.load_local();
    s.transactions.create(coffee(Utc::now())).unwrap();
    assert!(kv.get("@MoneyCare:transactions_42").unwrap().is_some());

    let err = s.sign_out(true).unwrap_err();
    assert!(format!("{:#}", err).contains("database is locked"));
    assert!(kv.get("@MoneyCare:transactions_42").unwrap().is_none());
}

#[test]
fn dashboard_follows_store_revisions() {
    let kv = kv();
    let s = session::sign_in(kv, api_with_ana(), &creds("s3cret")).unwrap();
    let now = Utc::now();

    let before = s.dashboard(Period::Week, &now);
    assert_eq!(before.transaction_count, 0);
    assert!(Arc::ptr_eq(&before, &s.dashboard(Period::Week, &now)));

    s.transactions.create(coffee(now - Duration::hours(1))).unwrap();
    let after = s.dashboard(Period::Week, &now);
    assert_eq!(after.transaction_count, 1);
    assert_eq!(after.total_expenses, rust_decimal::Decimal::new(5, 0));
}

#[test]
fn sign_up_returns_server_message() {
    let api = FakeApi::new();
    let user = NewUser {
        name: "Bia".to_string(),
        email: "bia@example.com".to_string(),
        password: "pw".to_string(),
    };
    assert_eq!(session::sign_up(&api, &user).unwrap(), "Welcome, Bia");

    let nameless = NewUser {
        email: String::new(),
        ..user
    };
    assert!(matches!(
        session::sign_up(&api, &nameless),
        Err(AuthError::Rejected(_))
    ));
}
