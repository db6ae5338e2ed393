// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categories;
use crate::models::TransactionKind;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let cats = match sub.get_one::<String>("type") {
            Some(t) => categories::for_kind(t.parse::<TransactionKind>()?),
            None => categories::all(),
        };
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
            let rows = cats
                .into_iter()
                .map(|c| {
                    vec![
                        c.id,
                        c.name,
                        c.icon,
                        c.kind.map(|k| k.to_string()).unwrap_or_default(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Id", "Category", "Icon", "Type"], rows));
        }
    }
    Ok(())
}
