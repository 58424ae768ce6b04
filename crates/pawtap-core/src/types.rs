// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the agent, its collaborators, and the tests.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Identity of one messaging account driven by one agent loop.
///
/// Immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Human-readable session name, used in every log line.
    pub name: String,
    /// Messaging platform API id.
    pub api_id: i32,
    /// Messaging platform API hash.
    pub api_hash: String,
    /// Optional proxy URL shared by the HTTP client and the messaging session.
    pub proxy: Option<String>,
    /// User agent presented to the game API.
    pub user_agent: String,
}

// --- Messaging types ---

/// Reference to a peer by public username or numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeerRef {
    Id(i64),
    Username(String),
}

impl fmt::Display for PeerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerRef::Id(id) => write!(f, "{id}"),
            PeerRef::Username(name) => write!(f, "@{name}"),
        }
    }
}

impl From<&str> for PeerRef {
    fn from(value: &str) -> Self {
        PeerRef::Username(value.trim_start_matches('@').to_string())
    }
}

/// A resolved input peer, carrying the access hash the protocol requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub id: i64,
    #[serde(default)]
    pub access_hash: Option<i64>,
}

/// Arguments of the "request app web view" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebViewRequest {
    pub peer: Peer,
    pub platform: String,
    pub short_name: String,
    pub write_allowed: bool,
    pub start_param: String,
}

/// The logged-in messaging account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// A chat or channel the account can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInfo {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

// --- Init-data ---

/// The signed six-field payload proving a messaging identity to the game server.
///
/// Single use: produced by the auth bridge and consumed by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitData {
    /// Percent-encoded user JSON.
    pub user: String,
    pub chat_instance: String,
    pub chat_type: String,
    pub start_param: String,
    pub auth_date: String,
    pub hash: String,
}

impl fmt::Display for InitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user={}&chat_instance={}&chat_type={}&start_param={}&auth_date={}&hash={}",
            self.user, self.chat_instance, self.chat_type, self.start_param, self.auth_date, self.hash
        )
    }
}

// --- Game API types ---

/// Completion kind of a quest, derived from its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum QuestKind {
    /// Join a Telegram channel, then verify.
    Telegram,
    /// Link a wallet; submission itself completes the quest.
    Wallet,
    /// Anything else: verify directly.
    Standard,
}

/// A single reward entry of a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestReward {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
}

/// Server-side progress of a quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    #[serde(default, deserialize_with = "null_as_default")]
    pub claimed: bool,
}

/// A server-defined unit of reward-earning work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rewards: Vec<QuestReward>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: QuestProgress,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Quest {
    /// Classifies the quest by its code.
    pub fn kind(&self) -> QuestKind {
        match self.code.as_str() {
            "telegram" => QuestKind::Telegram,
            "wallet" => QuestKind::Wallet,
            _ => QuestKind::Standard,
        }
    }

    /// The joinable channel link carried in `data`, for telegram quests.
    pub fn channel_link(&self) -> Option<&str> {
        self.data.as_str().filter(|s| !s.trim().is_empty())
    }

    /// Amount of the first reward, if any.
    pub fn reward_amount(&self) -> Option<f64> {
        self.rewards.first().map(|r| r.amount)
    }

    pub fn is_claimed(&self) -> bool {
        self.progress.claimed
    }
}

/// Response of `POST /user/auth`: `{success, data: [token, user]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl AuthResponse {
    /// The bearer token, when present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// The user-info object returned alongside the token.
    pub fn user(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.get(1).and_then(Value::as_object)
    }
}

/// Response of `GET /user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<UserProfileData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileData {
    #[serde(default)]
    pub user_data: Option<UserData>,
    #[serde(default)]
    pub game_data: Option<GameData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub balance: f64,
}

impl UserProfile {
    pub fn first_name(&self) -> Option<&str> {
        self.user_data()?.firstname.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user_data()?.username.as_deref()
    }

    pub fn balance(&self) -> Option<f64> {
        self.data.as_ref()?.game_data.as_ref().map(|g| g.balance)
    }

    fn user_data(&self) -> Option<&UserData> {
        self.data.as_ref()?.user_data.as_ref()
    }
}

// --- Wallet types ---

/// Output of the opaque wallet-generation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedWallet {
    pub address: String,
    pub private_key: String,
    pub public_key: String,
    pub mnemonic: String,
}

/// A persisted wallet, keyed by messaging account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub account_id: i64,
    pub address: String,
    pub private_key: String,
    pub public_key: String,
    pub mnemonic: String,
    pub session_name: String,
    pub username: Option<String>,
    pub created_at: String,
}
