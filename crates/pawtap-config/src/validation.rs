// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as ordered ranges, unique session names, and parsable proxy URLs.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::TapperConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TapperConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Credentials are only needed once there is something to run.
    if !config.sessions.is_empty() {
        if config.telegram.api_id <= 0 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "telegram.api_id must be a positive integer, got {}",
                    config.telegram.api_id
                ),
            });
        }
        if config.telegram.api_hash.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "telegram.api_hash must not be empty".to_string(),
            });
        }
    }

    if config.telegram.gateway_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "telegram.gateway_url must not be empty".to_string(),
        });
    }

    check_range(&mut errors, "schedule.sleep_time", config.schedule.sleep_time);
    check_range(&mut errors, "schedule.start_delay", config.schedule.start_delay);

    if config.api.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be greater than zero".to_string(),
        });
    }

    if config.storage.wallet_db_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.wallet_db_path must not be empty".to_string(),
        });
    }

    let mut seen_names = HashSet::new();
    for (i, session) in config.sessions.iter().enumerate() {
        if session.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("sessions[{i}].name must not be empty"),
            });
        } else if !seen_names.insert(&session.name) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate session name `{}` in [[sessions]] array",
                    session.name
                ),
            });
        }

        if let Some(proxy) = session.proxy.as_deref().filter(|p| !p.trim().is_empty())
            && let Err(e) = reqwest::Proxy::all(proxy)
        {
            errors.push(ConfigError::Validation {
                message: format!("sessions[{i}].proxy `{proxy}` is not a valid proxy URL: {e}"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_range(errors: &mut Vec<ConfigError>, key: &str, [min, max]: [u64; 2]) {
    if min > max {
        errors.push(ConfigError::Validation {
            message: format!("{key} must be [min, max] with min <= max, got [{min}, {max}]"),
        });
    }
}
