// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable per-agent settings derived from the loaded configuration.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use pawtap_config::TapperConfig;

/// Behaviour switches and schedule handed to every session at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub auto_task: bool,
    pub join_channels: bool,
    pub auto_add_wallet: bool,
    /// Primary referral code; see [`crate::referral`].
    pub referral_code: String,
    /// Quest codes that are never attempted.
    pub disabled_tasks: HashSet<String>,
    /// Pause between loop iterations, in seconds.
    pub sleep_time: RangeInclusive<u64>,
    /// Delay before a session starts, in seconds.
    pub start_delay: RangeInclusive<u64>,
}

impl AgentSettings {
    pub fn from_config(config: &TapperConfig) -> Self {
        let [sleep_min, sleep_max] = config.schedule.sleep_time;
        let [start_min, start_max] = config.schedule.start_delay;
        Self {
            auto_task: config.features.auto_task,
            join_channels: config.features.join_channels,
            auto_add_wallet: config.features.auto_add_wallet,
            referral_code: config.referral.ref_id.clone(),
            disabled_tasks: config.tasks.disabled_set(),
            sleep_time: sleep_min..=sleep_max,
            start_delay: start_min..=start_max,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from_config(&TapperConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_config_defaults() {
        let settings = AgentSettings::default();
        assert!(settings.auto_task);
        assert!(!settings.join_channels);
        assert!(!settings.auto_add_wallet);
        assert_eq!(settings.referral_code, "acAO24ki");
        assert!(settings.disabled_tasks.contains("invite"));
        assert!(settings.disabled_tasks.contains("boost"));
        assert_eq!(settings.sleep_time, 41200..=43200);
        assert_eq!(settings.start_delay, 5..=25);
    }
}
