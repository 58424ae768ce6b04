// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Narrow interface to the messaging client (Telegram MTProto).

use async_trait::async_trait;

use crate::error::MessengerError;
use crate::types::{AccountProfile, ChatInfo, Peer, PeerRef, WebViewRequest};

/// The subset of messaging-client capabilities the agent relies on.
///
/// `connect` and `disconnect` are idempotent: calling either when the client
/// is already in the requested state succeeds without side effects.
#[async_trait]
pub trait MessengerClient: Send + Sync {
    /// Opens the client connection.
    async fn connect(&self) -> Result<(), MessengerError>;

    /// Closes the client connection.
    async fn disconnect(&self) -> Result<(), MessengerError>;

    /// Resolves a peer to an input peer carrying its access hash.
    async fn resolve_peer(&self, target: &PeerRef) -> Result<Peer, MessengerError>;

    /// Fetches a chat, which also caches its peer.
    async fn get_chat(&self, target: &PeerRef) -> Result<ChatInfo, MessengerError>;

    /// Requests a signed web-app launch URL.
    async fn request_app_web_view(&self, request: &WebViewRequest)
    -> Result<String, MessengerError>;

    /// Returns the logged-in account.
    async fn get_me(&self) -> Result<AccountProfile, MessengerError>;

    /// Joins a channel by public name or invite link.
    async fn join_chat(&self, link: &str) -> Result<ChatInfo, MessengerError>;

    /// Lists up to `limit` dialogs; used only to warm the peer cache.
    async fn list_dialogs(&self, limit: u32) -> Result<usize, MessengerError>;

    /// Mutes notifications for a peer until the given unix timestamp.
    async fn mute_peer(&self, peer: &Peer, mute_until: i32) -> Result<(), MessengerError>;

    /// Moves a chat to the archive folder.
    async fn archive_chat(&self, chat_id: i64) -> Result<(), MessengerError>;
}
