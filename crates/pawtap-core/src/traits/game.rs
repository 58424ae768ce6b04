// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game HTTP API consumed by the session manager and the quest pipeline.

use async_trait::async_trait;

use crate::types::{AuthResponse, Quest, UserProfile};

/// Calls against the PAWS game API.
///
/// Implementations absorb transient failures with bounded retry and report
/// exhaustion through sentinel values (`None` / `false`) instead of errors.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Exchanges init-data and a referral code for a token and user info.
    async fn login(&self, init_data: &str, referral_code: &str) -> Option<AuthResponse>;

    /// Installs the bearer token used by every subsequent call.
    async fn set_access_token(&self, token: &str);

    /// Fetches the profile (name, username, balance).
    async fn user_profile(&self) -> Option<UserProfile>;

    /// Fetches the full quest list.
    async fn list_quests(&self) -> Option<Vec<Quest>>;

    /// Asks the server to verify completion of a quest.
    async fn complete_quest(&self, quest_id: &str) -> bool;

    /// Claims the reward of a completed quest.
    async fn claim_quest(&self, quest_id: &str) -> bool;

    /// Links a wallet address to the account.
    async fn submit_wallet(&self, address: &str) -> bool;
}
