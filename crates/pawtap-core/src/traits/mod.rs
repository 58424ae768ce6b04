// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the agent.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility, so the
//! agent can hold them as `Arc<dyn Trait>` and tests can swap in mocks.

pub mod game;
pub mod messenger;
pub mod wallet;

pub use game::GameApi;
pub use messenger::MessengerClient;
pub use wallet::{WalletGenerator, WalletStore};
