// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pawtap.toml` > `~/.config/pawtap/pawtap.toml` > `/etc/pawtap/pawtap.toml`
//! with environment variable overrides via `PAWTAP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TapperConfig;

/// Sections whose keys may be overridden from the environment.
const ENV_SECTIONS: &[&str] = &[
    "agent", "telegram", "api", "schedule", "features", "referral", "tasks", "storage",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pawtap/pawtap.toml` (system-wide)
/// 3. `~/.config/pawtap/pawtap.toml` (user XDG config)
/// 4. `./pawtap.toml` (local directory)
/// 5. `PAWTAP_*` environment variables
pub fn load_config() -> Result<TapperConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TapperConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TapperConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TapperConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TapperConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TapperConfig::default()))
        .merge(Toml::file("/etc/pawtap/pawtap.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pawtap/pawtap.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pawtap.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that underscore-containing
/// keys survive: `PAWTAP_TELEGRAM_API_HASH` maps to `telegram.api_hash`, and
/// `PAWTAP_FEATURES_AUTO_ADD_WALLET` to `features.auto_add_wallet`.
fn env_provider() -> Env {
    Env::prefixed("PAWTAP_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
