// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Peer resolution that sleeps through flood waits.

use pawtap_core::{MessengerClient, MessengerError, Peer, PeerRef};
use tracing::{debug, warn};

use crate::pacing::{pause, Pacing};

/// Flood waits tolerated per resolution before giving up.
pub const MAX_FLOOD_WAITS: u32 = 5;

/// Dialogs listed to warm the access-hash cache after a flood wait.
const DIALOG_WARMUP: u32 = 100;

/// Resolves `target` to an input peer.
///
/// The chat is fetched first so the client caches it. A flood wait is slept
/// through (plus a margin), the dialog list is warmed and the lookup retried.
/// Returns `Ok(None)` when the peer is not cached or the flood waits are
/// exhausted. Every other error propagates.
pub async fn resolve_with_flood_wait(
    messenger: &dyn MessengerClient,
    target: &PeerRef,
    pacing: &Pacing,
    session: &str,
) -> Result<Option<Peer>, MessengerError> {
    let mut flood_waits = 0;
    loop {
        let attempt = async {
            messenger.get_chat(target).await?;
            messenger.resolve_peer(target).await
        };

        match attempt.await {
            Ok(peer) => return Ok(Some(peer)),
            Err(MessengerError::FloodWait { seconds }) => {
                flood_waits += 1;
                if flood_waits > MAX_FLOOD_WAITS {
                    warn!(session, peer = %target, flood_waits, "too many flood waits, giving up");
                    return Ok(None);
                }
                warn!(session, peer = %target, seconds, "flood wait, sleeping");
                tokio::time::sleep(std::time::Duration::from_secs(seconds)).await;
                pause(&pacing.flood_margin).await;
                if let Err(e) = messenger.list_dialogs(DIALOG_WARMUP).await {
                    debug!(session, error = %e, "dialog warm-up failed");
                }
            }
            Err(MessengerError::PeerNotCached(reason)) => {
                debug!(session, peer = %target, reason, "peer not cached");
                pause(&pacing.peer_not_cached).await;
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
    }
}
