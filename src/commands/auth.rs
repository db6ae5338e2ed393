// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::AppContext;
use crate::models::{Credentials, NewUser};
use crate::session;
use crate::store::SyncOutcome;

fn arg(m: &clap::ArgMatches, name: &str) -> String {
    m.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub fn login(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let api = ctx.require_api()?;
    let creds = Credentials {
        email: arg(sub, "email"),
        password: sub.get_one::<String>("password").cloned().unwrap_or_default(),
    };
    let s = session::sign_in(ctx.kv(), api, &creds)?;
    println!(
        "Signed in as {} <{}>: {} transaction(s), {} wallet(s)",
        s.user().name,
        s.user().email,
        s.transactions.items().len(),
        s.wallets.items().len()
    );
    Ok(())
}

pub fn register(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let api = ctx.require_api()?;
    let user = NewUser {
        name: arg(sub, "name"),
        email: arg(sub, "email"),
        password: sub.get_one::<String>("password").cloned().unwrap_or_default(),
    };
    let msg = session::sign_up(api.as_ref(), &user)?;
    println!("{}", msg);
    Ok(())
}

pub fn logout(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let purge = sub.get_flag("purge") || ctx.cfg.purge_on_sign_out;
    match session::restore(ctx.kv(), ctx.api.clone()) {
        Some(s) => {
            s.sign_out(purge)?;
            if purge {
                println!("Signed out; local data removed");
            } else {
                println!("Signed out");
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    let s = ctx.require_session()?;
    let mode = match ctx.api {
        Some(_) => "online",
        None => "local-only",
    };
    println!(
        "{} <{}> (id {}, {})",
        s.user().name,
        s.user().email,
        s.user().id,
        mode
    );
    Ok(())
}

pub(crate) fn describe(outcome: SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Offline => "offline, using local data".to_string(),
        SyncOutcome::Synced { count } => format!("synced {} item(s)", count),
        SyncOutcome::Failed => "sync failed, local data kept".to_string(),
    }
}
