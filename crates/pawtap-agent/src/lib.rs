// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session loop, auth bridge, and quest pipeline for the pawtap agent.
//!
//! One [`SessionManager`] drives one account: it keeps a bearer token fresh
//! through the web-app handshake ([`WebAppAuthBridge`]) and runs the quest
//! pipeline ([`TaskPipeline`]) after every login. Many managers can run in
//! one process; they share nothing but the wallet store.

pub mod api;
pub mod auth;
pub mod channel;
pub mod init_data;
pub mod pacing;
pub mod peer;
pub mod pipeline;
pub mod referral;
pub mod retry;
pub mod session;
pub mod settings;
pub mod shutdown;
pub mod wallet;

pub use api::PawsApiClient;
pub use auth::{AuthOutcome, WebAppAuthBridge};
pub use channel::ChannelJoiner;
pub use pacing::Pacing;
pub use pipeline::{PipelineReport, TaskPipeline};
pub use session::{IterationOutcome, SessionManager, SessionState, TokenState};
pub use settings::AgentSettings;
pub use shutdown::{cancellable_sleep, install_signal_handler};
pub use wallet::WalletQuest;
