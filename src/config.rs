// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FX_URL: &str = "https://api.frankfurter.app";

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote service base URL. `None` keeps the client in local-only mode.
    pub api_url: Option<String>,
    pub timeout: Duration,
    pub fx_url: String,
    pub db_path: Option<PathBuf>,
    pub purge_on_sign_out: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fx_url: DEFAULT_FX_URL.to_string(),
            db_path: None,
            purge_on_sign_out: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Config::default();

        cfg.api_url = get("MONEYCARE_API_URL").map(|u| u.trim_end_matches('/').to_string());
        if let Some(raw) = get("MONEYCARE_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "Ignoring MONEYCARE_HTTP_TIMEOUT_SECS='{}', using {}s",
                    raw,
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }
        if let Some(url) = get("MONEYCARE_FX_URL") {
            cfg.fx_url = url.trim_end_matches('/').to_string();
        }
        cfg.db_path = get("MONEYCARE_DB").map(PathBuf::from);
        if let Some(raw) = get("MONEYCARE_PURGE_ON_SIGN_OUT") {
            cfg.purge_on_sign_out = match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    log::warn!("Ignoring MONEYCARE_PURGE_ON_SIGN_OUT='{}'", raw);
                    false
                }
            };
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn empty_environment_is_offline_with_defaults() {
        let c = cfg(&[]);
        assert_eq!(c, Config::default());
        assert!(c.api_url.is_none());
    }

    #[test]
    fn values_are_trimmed_and_parsed() {
        let c = cfg(&[
            ("MONEYCARE_API_URL", " http://10.0.0.2:3000/ "),
            ("MONEYCARE_HTTP_TIMEOUT_SECS", "3"),
            ("MONEYCARE_PURGE_ON_SIGN_OUT", "Yes"),
        ]);
        assert_eq!(c.api_url.as_deref(), Some("http://10.0.0.2:3000"));
        assert_eq!(c.timeout, Duration::from_secs(3));
        assert!(c.purge_on_sign_out);
    }

    #[test]
    fn bad_timeout_falls_back() {
        let c = cfg(&[("MONEYCARE_HTTP_TIMEOUT_SECS", "0")]);
        assert_eq!(c.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
