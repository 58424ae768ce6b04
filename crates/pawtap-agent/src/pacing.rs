// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Every jittered pause the agent takes, in one place.
//!
//! Ranges are inclusive and in whole seconds. Tests swap in
//! [`Pacing::immediate`] so the control flow runs without waiting.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Pause ranges, in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Between attempts of a data call (login, profile, quest list, wallet).
    pub retry_delay: RangeInclusive<u64>,
    /// Between attempts of a quest verify/claim call.
    pub quest_retry_delay: RangeInclusive<u64>,
    /// After a verify/claim response arrives.
    pub quest_settle: RangeInclusive<u64>,
    /// After a retried call gives up.
    pub give_up: RangeInclusive<u64>,
    /// After the quest list is fetched.
    pub quests_listed: RangeInclusive<u64>,
    /// After every messaging session is closed.
    pub after_disconnect: RangeInclusive<u64>,
    /// After an unexpected authorization failure.
    pub auth_backoff: RangeInclusive<u64>,
    /// Added on top of a flood wait.
    pub flood_margin: RangeInclusive<u64>,
    /// After a peer turned out not to be cached.
    pub peer_not_cached: RangeInclusive<u64>,
    /// Between joining a channel and resolving it.
    pub join_settle: RangeInclusive<u64>,
    /// Between muting and archiving a channel.
    pub archive_delay: RangeInclusive<u64>,
    /// Between a successful join and verifying the quest.
    pub verify_after_join: RangeInclusive<u64>,
    /// After each processed quest.
    pub between_quests: RangeInclusive<u64>,
    /// Between login and the quest pipeline.
    pub before_tasks: RangeInclusive<u64>,
    /// After the auth bridge produced no init-data.
    pub bridge_retry: RangeInclusive<u64>,
    /// After a failed login.
    pub login_failed: RangeInclusive<u64>,
    /// After an incomplete login or missing profile.
    pub stall: RangeInclusive<u64>,
    /// After an unclassified error in the session loop.
    pub unknown_error: RangeInclusive<u64>,
    /// How long a token is trusted before re-authenticating.
    pub token_live: RangeInclusive<u64>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            retry_delay: 5..=10,
            quest_retry_delay: 3..=3,
            quest_settle: 10..=10,
            give_up: 3..=7,
            quests_listed: 1..=3,
            after_disconnect: 5..=10,
            auth_backoff: 3..=3,
            flood_margin: 3..=3,
            peer_not_cached: 3..=3,
            join_settle: 5..=5,
            archive_delay: 3..=3,
            verify_after_join: 15..=20,
            between_quests: 5..=10,
            before_tasks: 5..=10,
            bridge_retry: 300..=300,
            login_failed: 300..=300,
            stall: 800..=1000,
            unknown_error: 60..=120,
            token_live: 3500..=3600,
        }
    }
}

impl Pacing {
    /// No pauses at all. The token live window keeps its default.
    pub fn immediate() -> Self {
        Self {
            retry_delay: 0..=0,
            quest_retry_delay: 0..=0,
            quest_settle: 0..=0,
            give_up: 0..=0,
            quests_listed: 0..=0,
            after_disconnect: 0..=0,
            auth_backoff: 0..=0,
            flood_margin: 0..=0,
            peer_not_cached: 0..=0,
            join_settle: 0..=0,
            archive_delay: 0..=0,
            verify_after_join: 0..=0,
            between_quests: 0..=0,
            before_tasks: 0..=0,
            bridge_retry: 0..=0,
            login_failed: 0..=0,
            stall: 0..=0,
            unknown_error: 0..=0,
            ..Self::default()
        }
    }
}

/// Draws a duration uniformly from `range` seconds.
pub fn jitter(range: &RangeInclusive<u64>) -> Duration {
    if range.is_empty() {
        return Duration::from_secs(*range.start());
    }
    Duration::from_secs(rand::thread_rng().gen_range(range.clone()))
}

/// Sleeps for a duration drawn from `range`.
pub async fn pause(range: &RangeInclusive<u64>) {
    let duration = jitter(range);
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_in_range() {
        for _ in 0..200 {
            let d = jitter(&(5..=10));
            assert!((5..=10).contains(&d.as_secs()));
        }
    }

    #[test]
    fn degenerate_range_is_exact() {
        assert_eq!(jitter(&(300..=300)), Duration::from_secs(300));
        assert_eq!(jitter(&(0..=0)), Duration::ZERO);
    }

    #[test]
    fn immediate_keeps_token_window() {
        let pacing = Pacing::immediate();
        assert_eq!(pacing.token_live, 3500..=3600);
        assert_eq!(pacing.stall, 0..=0);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_waits_for_drawn_duration() {
        let start = tokio::time::Instant::now();
        pause(&(4..=4)).await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
