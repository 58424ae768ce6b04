// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry for HTTP calls that fail soft.
//!
//! A call is attempted `1 + max_retries` times with a jittered pause between
//! attempts. Exhaustion logs one line, pauses briefly, and yields `None`.
//! Errors that are not transient, such as an undecodable body, end the loop
//! on the spot.

use std::future::Future;
use std::ops::RangeInclusive;

use pawtap_core::TapperError;
use tracing::{debug, error};

use crate::pacing::{pause, Pacing};

/// Retry bounds for one class of call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: RangeInclusive<u64>,
    pub give_up: RangeInclusive<u64>,
}

impl RetryPolicy {
    /// Login, profile, quest list and wallet submission.
    pub fn data(pacing: &Pacing) -> Self {
        Self {
            max_retries: 7,
            delay: pacing.retry_delay.clone(),
            give_up: pacing.give_up.clone(),
        }
    }

    /// Quest verification and claiming.
    pub fn quest(pacing: &Pacing) -> Self {
        Self {
            max_retries: 20,
            delay: pacing.quest_retry_delay.clone(),
            give_up: pacing.give_up.clone(),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Runs `call` until it succeeds or the policy is exhausted.
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    session: &str,
    operation: &str,
    mut call: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TapperError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Some(value),
            Err(e) if e.is_transient() && attempt < policy.attempts() => {
                debug!(session, operation, attempt, error = %e, "attempt failed, retrying");
                pause(&policy.delay).await;
            }
            Err(e) => {
                error!(session, operation, attempts = attempt, error = %e, "giving up");
                pause(&policy.give_up).await;
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    fn failing(msg: &str) -> TapperError {
        TapperError::Http {
            message: msg.to_string(),
            source: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_call_returns_none_after_every_attempt() {
        let policy = RetryPolicy::data(&Pacing::default());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Option<()> = retry(&policy, "s", "op", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(failing("down"))
        })
        .await;
        assert_eq!(result, None);
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_final_attempt_is_returned() {
        let policy = RetryPolicy::quest(&Pacing::default());
        let counter = AtomicU32::new(0);
        let (calls, attempts) = (&counter, policy.attempts());
        let result = retry(&policy, "s", "op", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == attempts {
                Ok(n)
            } else {
                Err(failing("flaky"))
            }
        })
        .await;
        assert_eq!(result, Some(21));
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_are_spaced_by_the_delay() {
        let policy = RetryPolicy {
            max_retries: 2,
            delay: 5..=5,
            give_up: 0..=0,
        };
        let start = tokio::time::Instant::now();
        let result: Option<()> = retry(&policy, "s", "op", || async { Err(failing("x")) }).await;
        assert!(result.is_none());
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10) && elapsed < Duration::from_secs(11));
    }

    #[tokio::test]
    async fn immediate_success_makes_one_call() {
        let policy = RetryPolicy::data(&Pacing::immediate());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry(&policy, "s", "op", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TapperError>("ok")
        })
        .await;
        assert_eq!(result, Some("ok"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn decode_failure_is_not_retried() {
        let policy = RetryPolicy::data(&Pacing::immediate());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Option<()> = retry(&policy, "s", "op", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let bad = serde_json::from_str::<u32>("{").unwrap_err();
            Err(TapperError::decode("op", bad))
        })
        .await;
        assert_eq!(result, None);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
