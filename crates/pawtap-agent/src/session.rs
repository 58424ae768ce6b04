// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-account session loop and token lifecycle.
//!
//! Each iteration checks whether the bearer token is still inside its live
//! window. A stale token triggers the web-app handshake and a fresh login;
//! a successful login optionally runs the quest pipeline. The loop then
//! sleeps for an interval chosen by the iteration's outcome.
//!
//! State transitions:
//! `NoToken -> Authenticating -> Authenticated -> Expired -> Authenticating`,
//! with `InvalidSession` terminal.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use pawtap_core::{GameApi, MessengerClient, TapperError, WalletGenerator, WalletStore};
use strum::Display;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::auth::WebAppAuthBridge;
use crate::channel::ChannelJoiner;
use crate::pacing::{jitter, pause, Pacing};
use crate::pipeline::{PipelineReport, TaskPipeline};
use crate::settings::AgentSettings;
use crate::shutdown::cancellable_sleep;
use crate::wallet::WalletQuest;

/// The bearer token and the window in which it is trusted.
#[derive(Debug, Clone)]
pub struct TokenState {
    access_token: Option<String>,
    created_at: Option<Instant>,
    live_window: Duration,
}

impl TokenState {
    /// A state with no token yet; the first check reports it stale.
    pub fn new(live_window: Duration) -> Self {
        Self {
            access_token: None,
            created_at: None,
            live_window,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    /// Stale exactly when `now - created_at >= live_window`.
    pub fn is_stale_at(&self, now: Instant) -> bool {
        match self.created_at {
            None => true,
            Some(created) => now.saturating_duration_since(created) >= self.live_window,
        }
    }

    /// Installs a freshly issued token.
    pub fn refresh(&mut self, token: String, live_window: Duration) {
        self.access_token = Some(token);
        self.created_at = Some(Instant::now());
        self.live_window = live_window;
    }

    /// Forces re-authentication on the next check.
    pub fn expire(&mut self) {
        self.live_window = Duration::ZERO;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn live_window(&self) -> Duration {
        self.live_window
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    NoToken,
    Authenticating,
    Authenticated,
    Expired,
    InvalidSession,
}

/// What one loop iteration achieved; decides how long the loop sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The token was still fresh; nothing to do.
    TokenFresh,
    /// The handshake produced no init-data.
    BridgeFailed,
    /// Login gave up after its retries.
    LoginFailed,
    /// Login answered without a token or user.
    IncompleteLogin,
    /// The profile could not be fetched or reported failure.
    ProfileUnavailable,
    /// Logged in; carries the pipeline report when quests ran.
    Authenticated(Option<PipelineReport>),
}

/// Drives one account.
pub struct SessionManager {
    session: String,
    bridge: WebAppAuthBridge,
    game: Arc<dyn GameApi>,
    pipeline: TaskPipeline,
    settings: AgentSettings,
    pacing: Pacing,
    token: TokenState,
    state: SessionState,
}

impl SessionManager {
    /// Wires the auth bridge and the quest pipeline for one session.
    pub fn new(
        session: impl Into<String>,
        messenger: Arc<dyn MessengerClient>,
        game: Arc<dyn GameApi>,
        store: Arc<dyn WalletStore>,
        generator: Arc<dyn WalletGenerator>,
        settings: AgentSettings,
        pacing: Pacing,
    ) -> Self {
        let session = session.into();
        let bridge = WebAppAuthBridge::new(
            messenger.clone(),
            session.clone(),
            settings.referral_code.clone(),
            pacing.clone(),
        );
        let channels = ChannelJoiner::new(messenger.clone(), session.clone(), pacing.clone());
        let wallet = WalletQuest::new(messenger, game.clone(), store, generator, session.clone());
        let pipeline = TaskPipeline::new(
            game.clone(),
            channels,
            wallet,
            settings.clone(),
            pacing.clone(),
            session.clone(),
        );

        Self {
            session,
            bridge,
            game,
            pipeline,
            token: TokenState::new(jitter(&pacing.token_live)),
            settings,
            pacing,
            state: SessionState::NoToken,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> &TokenState {
        &self.token
    }

    /// Runs the loop until cancelled or the session becomes invalid.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), TapperError> {
        info!(session = %self.session, "session loop started");
        loop {
            let iteration = tokio::select! {
                result = self.run_once() => result,
                _ = cancel.cancelled() => {
                    info!(session = %self.session, "shutdown signal received, stopping session loop");
                    return Ok(());
                }
            };

            let wait = match iteration {
                Ok(outcome) => jitter(self.pause_for(&outcome)),
                Err(TapperError::InvalidSession(reason)) => {
                    self.transition(SessionState::InvalidSession);
                    return Err(TapperError::InvalidSession(reason));
                }
                Err(e) => {
                    error!(session = %self.session, operation = "iteration", error = %e, "unknown error");
                    jitter(&self.pacing.unknown_error)
                }
            };

            info!(
                session = %self.session,
                minutes = %format!("{:.1}", wait.as_secs_f64() / 60.0),
                "sleeping"
            );
            if !cancellable_sleep(wait, &cancel).await {
                info!(session = %self.session, "shutdown signal received, stopping session loop");
                return Ok(());
            }
        }
    }

    /// One iteration: refresh the token if stale, then run quests.
    pub async fn run_once(&mut self) -> Result<IterationOutcome, TapperError> {
        if !self.token.is_stale() {
            debug!(session = %self.session, "token still fresh");
            return Ok(IterationOutcome::TokenFresh);
        }

        if self.state == SessionState::Authenticated {
            self.transition(SessionState::Expired);
        }
        self.transition(SessionState::Authenticating);

        let Some(auth) = self.bridge.obtain_init_data().await? else {
            self.settle_unauthenticated();
            return Ok(IterationOutcome::BridgeFailed);
        };

        let init_data = auth.init_data.to_string();
        let Some(login) = self.game.login(&init_data, &auth.referral_code).await else {
            warn!(session = %self.session, operation = "login", "failed login");
            self.invalidate_token();
            return Ok(IterationOutcome::LoginFailed);
        };

        let token = match (login.token(), login.user()) {
            (Some(token), Some(_)) => token.to_string(),
            _ => {
                warn!(session = %self.session, operation = "login", "login response has no token or user");
                self.invalidate_token();
                return Ok(IterationOutcome::IncompleteLogin);
            }
        };
        info!(session = %self.session, "logged in");
        self.game.set_access_token(&token).await;

        let Some(profile) = self.game.user_profile().await.filter(|p| p.success) else {
            warn!(session = %self.session, operation = "user_profile", "user info not found");
            self.invalidate_token();
            return Ok(IterationOutcome::ProfileUnavailable);
        };

        self.token.refresh(token, jitter(&self.pacing.token_live));
        self.transition(SessionState::Authenticated);
        info!(
            session = %self.session,
            first_name = profile.first_name().unwrap_or_default(),
            username = profile.username().unwrap_or_default(),
            balance = profile.balance().unwrap_or_default(),
            "account ready"
        );

        let report = if self.settings.auto_task {
            pause(&self.pacing.before_tasks).await;
            Some(self.pipeline.process_tasks().await)
        } else {
            None
        };
        Ok(IterationOutcome::Authenticated(report))
    }

    fn pause_for(&self, outcome: &IterationOutcome) -> &RangeInclusive<u64> {
        match outcome {
            IterationOutcome::TokenFresh | IterationOutcome::Authenticated(_) => {
                &self.settings.sleep_time
            }
            IterationOutcome::BridgeFailed => &self.pacing.bridge_retry,
            IterationOutcome::LoginFailed => &self.pacing.login_failed,
            IterationOutcome::IncompleteLogin | IterationOutcome::ProfileUnavailable => {
                &self.pacing.stall
            }
        }
    }

    fn invalidate_token(&mut self) {
        self.token.expire();
        self.settle_unauthenticated();
    }

    fn settle_unauthenticated(&mut self) {
        let next = if self.token.access_token().is_some() {
            SessionState::Expired
        } else {
            SessionState::NoToken
        };
        self.transition(next);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(session = %self.session, from = %self.state, to = %next, "session state changed");
            self.state = next;
        }
    }
}
