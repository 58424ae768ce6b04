// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-join side quest.

use std::sync::Arc;

use pawtap_core::{ChatInfo, MessengerClient, MessengerError, PeerRef, TapperError};
use tracing::{debug, info, warn};

use crate::pacing::{pause, Pacing};
use crate::peer::resolve_with_flood_wait;

/// Notifications stay muted until this timestamp, i.e. forever.
const MUTE_FOREVER: i32 = i32::MAX;

/// Reduces a channel link to what the join call accepts.
///
/// Private invite links (`t.me/+...`) are kept whole. Public links become
/// the bare channel name.
pub fn normalize_link(link: &str) -> String {
    let link = link.trim();
    if link.contains("t.me/+") {
        return link.to_string();
    }
    let bare = ["https://t.me/", "http://t.me/", "t.me/"]
        .iter()
        .find_map(|prefix| link.strip_prefix(prefix))
        .unwrap_or(link);
    let bare = bare.trim_start_matches('@');
    bare.split('/').next().unwrap_or(bare).to_string()
}

/// Joins channels on behalf of one session, then mutes and archives them.
pub struct ChannelJoiner {
    messenger: Arc<dyn MessengerClient>,
    session: String,
    pacing: Pacing,
}

impl ChannelJoiner {
    pub fn new(messenger: Arc<dyn MessengerClient>, session: impl Into<String>, pacing: Pacing) -> Self {
        Self {
            messenger,
            session: session.into(),
            pacing,
        }
    }

    /// Joins the channel behind `link`.
    ///
    /// `Ok(true)` once the account is a member. Account-terminal errors end
    /// this side quest with `Ok(false)`; any other join failure is an error.
    pub async fn join_channel(&self, link: &str) -> Result<bool, TapperError> {
        let target = normalize_link(link);
        let result = self.join(&target).await;

        if let Err(e) = self.messenger.disconnect().await {
            debug!(session = %self.session, error = %e, "disconnect failed");
        }
        pause(&self.pacing.after_disconnect).await;

        match result {
            Ok(chat) => {
                info!(session = %self.session, channel = %chat.title, "joined channel");
                Ok(true)
            }
            Err(e) if e.is_account_terminal() => {
                warn!(session = %self.session, channel = %target, error = %e, "account cannot join channels");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn join(&self, target: &str) -> Result<ChatInfo, MessengerError> {
        self.messenger.connect().await?;

        let chat = match self.messenger.join_chat(target).await {
            Ok(chat) => chat,
            Err(MessengerError::AlreadyParticipant) => {
                debug!(session = %self.session, channel = %target, "already a member");
                self.messenger.get_chat(&PeerRef::from(target)).await?
            }
            Err(e) => return Err(e),
        };

        pause(&self.pacing.join_settle).await;
        self.tidy(&chat).await;
        Ok(chat)
    }

    /// Mutes and archives a joined channel. Failures are only logged.
    async fn tidy(&self, chat: &ChatInfo) {
        let target = PeerRef::Id(chat.id);
        let peer = match resolve_with_flood_wait(
            self.messenger.as_ref(),
            &target,
            &self.pacing,
            &self.session,
        )
        .await
        {
            Ok(Some(peer)) => peer,
            Ok(None) => return,
            Err(e) => {
                warn!(session = %self.session, operation = "resolve_channel", error = %e, "failed to resolve channel");
                return;
            }
        };

        if let Err(e) = self.messenger.mute_peer(&peer, MUTE_FOREVER).await {
            warn!(session = %self.session, operation = "mute_channel", error = %e, "failed to mute channel");
        }
        pause(&self.pacing.archive_delay).await;
        if let Err(e) = self.messenger.archive_chat(chat.id).await {
            warn!(session = %self.session, operation = "archive_channel", error = %e, "failed to archive channel");
        }
    }
}
