// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the pawtap agent.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the agent and its collaborator traits.
#[derive(Debug, Error)]
pub enum TapperError {
    /// Configuration errors (missing credentials, malformed values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Wallet store errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Errors raised by the messaging client.
    #[error("messenger error: {0}")]
    Messenger(#[from] MessengerError),

    /// HTTP errors talking to the game API (transport, status, decoding).
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response arrived but its body could not be decoded. Retrying the
    /// same request will not help.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The messaging session can no longer be used. Stops this account's loop.
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// The web-app launch URL did not contain a usable init-data payload.
    #[error("init-data error: {0}")]
    InitData(String),

    /// Wallet generation or persistence failed.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TapperError {
    /// Builds an [`TapperError::Http`] from any error source.
    pub fn http(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Http {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Builds a [`TapperError::Decode`] from any error source.
    pub fn decode(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true when repeating the failed call could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::Decode { .. } | Self::Config(_) | Self::InvalidSession(_)
        )
    }
}

/// Errors surfaced by a [`MessengerClient`](crate::traits::MessengerClient).
///
/// The variants follow the classes the agent reacts to differently: flood
/// waits are slept through, cache misses are tolerated, account-terminal
/// errors stop the account, everything else is an ordinary failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    /// Protocol rate limit; the same call may be retried after the wait.
    #[error("flood wait of {seconds}s required")]
    FloodWait { seconds: u64 },

    /// The peer is not yet known to the client's access-hash cache.
    #[error("peer not cached: {0}")]
    PeerNotCached(String),

    /// The account is already a member of the chat being joined.
    #[error("already a participant")]
    AlreadyParticipant,

    /// The session's auth key is unregistered or revoked.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The account has been deleted or deactivated.
    #[error("account deactivated")]
    Deactivated,

    /// The account or its phone number is banned.
    #[error("account banned")]
    Banned,

    /// The account is restricted from performing the action.
    #[error("account restricted")]
    Restricted,

    /// The API id/hash pair was rejected.
    #[error("invalid api credentials: {0}")]
    InvalidCredentials(String),

    /// Any other RPC error returned by the protocol.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Transport-level failure reaching the client or gateway.
    #[error("transport error: {0}")]
    Transport(String),
}

impl MessengerError {
    /// Classifies a raw protocol error into a [`MessengerError`].
    ///
    /// `message` is the upper-case RPC error name, e.g. `FLOOD_WAIT_30`.
    pub fn from_rpc(code: i32, message: &str) -> Self {
        let name = message.trim().to_ascii_uppercase();

        if let Some(seconds) = name
            .strip_prefix("FLOOD_WAIT_")
            .or_else(|| name.strip_prefix("FLOOD_PREMIUM_WAIT_"))
            .and_then(|s| s.parse::<u64>().ok())
        {
            return Self::FloodWait { seconds };
        }

        match name.as_str() {
            "USER_ALREADY_PARTICIPANT" => Self::AlreadyParticipant,
            "PEER_ID_INVALID" | "KEY_UNKNOWN" | "CHANNEL_INVALID" | "PEER_NOT_CACHED" => {
                Self::PeerNotCached(name)
            }
            "AUTH_KEY_UNREGISTERED" | "AUTH_KEY_INVALID" | "SESSION_REVOKED"
            | "SESSION_EXPIRED" | "UNAUTHORIZED" => Self::Unauthorized(name),
            "USER_RESTRICTED" => Self::Restricted,
            "API_ID_INVALID" | "API_ID_PUBLISHED_FLOOD" => Self::InvalidCredentials(name),
            n if n.starts_with("USER_DEACTIVATED") => Self::Deactivated,
            n if n.ends_with("_BANNED") => Self::Banned,
            _ => Self::Rpc {
                code,
                message: name,
            },
        }
    }

    /// Returns true when the account itself is unusable and retrying is pointless.
    pub fn is_account_terminal(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_)
                | Self::Deactivated
                | Self::Banned
                | Self::Restricted
                | Self::InvalidCredentials(_)
        )
    }

    /// The mandated wait for a flood-wait signal, if this is one.
    pub fn flood_wait(&self) -> Option<Duration> {
        match self {
            Self::FloodWait { seconds } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}
