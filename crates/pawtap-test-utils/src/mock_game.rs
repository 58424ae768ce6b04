// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock game API with canned responses and a call recorder.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use pawtap_core::types::{GameData, UserData, UserProfileData};
use pawtap_core::{AuthResponse, GameApi, Quest, UserProfile};
use serde_json::json;
use tokio::sync::Mutex;

/// One recorded call against [`MockGameApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCall {
    Login { init_data: String, referral: String },
    SetToken(String),
    UserProfile,
    ListQuests,
    Complete(String),
    Claim(String),
    SubmitWallet(String),
}

/// A [`GameApi`] returning canned responses.
///
/// Login and profile responses are consumed from queues; once a queue is
/// empty its fallback value is returned. Quest verification and claiming
/// succeed unless overridden per quest id.
pub struct MockGameApi {
    logins: Mutex<VecDeque<Option<AuthResponse>>>,
    login_fallback: Option<AuthResponse>,
    profiles: Mutex<VecDeque<Option<UserProfile>>>,
    profile_fallback: Option<UserProfile>,
    quests: Mutex<Option<Vec<Quest>>>,
    complete_results: Mutex<HashMap<String, bool>>,
    claim_results: Mutex<HashMap<String, bool>>,
    wallet_result: Mutex<bool>,
    calls: Mutex<Vec<GameCall>>,
}

impl MockGameApi {
    /// A mock whose login and profile calls succeed.
    pub fn new() -> Self {
        Self {
            logins: Mutex::new(VecDeque::new()),
            login_fallback: Some(Self::auth_ok("token-1")),
            profiles: Mutex::new(VecDeque::new()),
            profile_fallback: Some(Self::profile_ok(120.5)),
            quests: Mutex::new(Some(Vec::new())),
            complete_results: Mutex::new(HashMap::new()),
            claim_results: Mutex::new(HashMap::new()),
            wallet_result: Mutex::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A successful login response carrying `token`.
    pub fn auth_ok(token: &str) -> AuthResponse {
        AuthResponse {
            success: true,
            data: vec![json!(token), json!({"id": 1001, "firstName": "Test"})],
        }
    }

    /// A successful profile response with the given balance.
    pub fn profile_ok(balance: f64) -> UserProfile {
        UserProfile {
            success: true,
            data: Some(UserProfileData {
                user_data: Some(UserData {
                    firstname: Some("Test".to_string()),
                    username: Some("test_user".to_string()),
                }),
                game_data: Some(GameData { balance }),
            }),
        }
    }

    pub async fn push_login(&self, response: Option<AuthResponse>) {
        self.logins.lock().await.push_back(response);
    }

    pub async fn push_profile(&self, response: Option<UserProfile>) {
        self.profiles.lock().await.push_back(response);
    }

    /// Sets the quest list; `None` makes listing fail.
    pub async fn set_quests(&self, quests: Option<Vec<Quest>>) {
        *self.quests.lock().await = quests;
    }

    pub async fn set_complete_result(&self, quest_id: &str, result: bool) {
        self.complete_results
            .lock()
            .await
            .insert(quest_id.to_string(), result);
    }

    pub async fn set_claim_result(&self, quest_id: &str, result: bool) {
        self.claim_results
            .lock()
            .await
            .insert(quest_id.to_string(), result);
    }

    pub async fn set_wallet_result(&self, result: bool) {
        *self.wallet_result.lock().await = result;
    }

    /// Every call so far, in order.
    pub async fn calls(&self) -> Vec<GameCall> {
        self.calls.lock().await.clone()
    }

    /// Calls matching `pred`.
    pub async fn calls_where(&self, pred: impl Fn(&GameCall) -> bool) -> Vec<GameCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| pred(c))
            .cloned()
            .collect()
    }

    async fn record(&self, call: GameCall) {
        self.calls.lock().await.push(call);
    }
}

impl Default for MockGameApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameApi for MockGameApi {
    async fn login(&self, init_data: &str, referral_code: &str) -> Option<AuthResponse> {
        self.record(GameCall::Login {
            init_data: init_data.to_string(),
            referral: referral_code.to_string(),
        })
        .await;
        match self.logins.lock().await.pop_front() {
            Some(scripted) => scripted,
            None => self.login_fallback.clone(),
        }
    }

    async fn set_access_token(&self, token: &str) {
        self.record(GameCall::SetToken(token.to_string())).await;
    }

    async fn user_profile(&self) -> Option<UserProfile> {
        self.record(GameCall::UserProfile).await;
        match self.profiles.lock().await.pop_front() {
            Some(scripted) => scripted,
            None => self.profile_fallback.clone(),
        }
    }

    async fn list_quests(&self) -> Option<Vec<Quest>> {
        self.record(GameCall::ListQuests).await;
        self.quests.lock().await.clone()
    }

    async fn complete_quest(&self, quest_id: &str) -> bool {
        self.record(GameCall::Complete(quest_id.to_string())).await;
        self.complete_results
            .lock()
            .await
            .get(quest_id)
            .copied()
            .unwrap_or(true)
    }

    async fn claim_quest(&self, quest_id: &str) -> bool {
        self.record(GameCall::Claim(quest_id.to_string())).await;
        self.claim_results
            .lock()
            .await
            .get(quest_id)
            .copied()
            .unwrap_or(true)
    }

    async fn submit_wallet(&self, address: &str) -> bool {
        self.record(GameCall::SubmitWallet(address.to_string()))
            .await;
        *self.wallet_result.lock().await
    }
}
