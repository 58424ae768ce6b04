// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for pawtap integration tests.
//!
//! Provides scriptable mocks of the agent's collaborators so session, auth
//! and quest logic can be exercised without a gateway or the game server.
//!
//! # Components
//!
//! - [`MockMessenger`] - messaging client with scripted failures and a call log
//! - [`MockGameApi`] - game API with canned responses and recorded calls
//! - [`CountingGenerator`] - deterministic wallet generator that counts calls

pub mod mock_game;
pub mod mock_messenger;
pub mod mock_wallet;

pub use mock_game::{GameCall, MockGameApi};
pub use mock_messenger::MockMessenger;
pub use mock_wallet::CountingGenerator;
