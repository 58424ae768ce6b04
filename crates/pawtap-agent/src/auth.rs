// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web-app authorization handshake.
//!
//! [`WebAppAuthBridge`] opens the messaging session, asks the bot for a
//! signed web-app launch URL and extracts the init-data the game server
//! accepts as proof of identity. The session is always closed afterwards.

use std::sync::Arc;

use pawtap_core::{InitData, MessengerClient, PeerRef, TapperError, WebViewRequest};
use tracing::{debug, error, info, warn};

use crate::init_data::parse_launch_url;
use crate::pacing::{pause, Pacing};
use crate::peer::resolve_with_flood_wait;
use crate::referral::select_referral_code;

/// Username of the game bot.
pub const BOT_USERNAME: &str = "PAWSOG_bot";
/// Short name of the bot's web app.
pub const APP_SHORT_NAME: &str = "PAWS";
/// Platform reported when requesting the web view.
pub const PLATFORM: &str = "android";

/// Result of one successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub init_data: InitData,
    /// Referral code drawn for this attempt; login must send the same one.
    pub referral_code: String,
    pub display_name: String,
}

/// Produces fresh init-data for one session.
pub struct WebAppAuthBridge {
    messenger: Arc<dyn MessengerClient>,
    session: String,
    primary_referral: String,
    pacing: Pacing,
}

impl WebAppAuthBridge {
    pub fn new(
        messenger: Arc<dyn MessengerClient>,
        session: impl Into<String>,
        primary_referral: impl Into<String>,
        pacing: Pacing,
    ) -> Self {
        Self {
            messenger,
            session: session.into(),
            primary_referral: primary_referral.into(),
            pacing,
        }
    }

    /// Runs the handshake.
    ///
    /// Returns `Ok(None)` on any recoverable failure and
    /// [`TapperError::InvalidSession`] when the account itself is unusable.
    pub async fn obtain_init_data(&self) -> Result<Option<AuthOutcome>, TapperError> {
        let result = self.handshake().await;

        if let Err(e) = self.messenger.disconnect().await {
            debug!(session = %self.session, error = %e, "disconnect failed");
        }
        pause(&self.pacing.after_disconnect).await;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(TapperError::Messenger(e)) if e.is_account_terminal() => {
                error!(session = %self.session, operation = "auth", error = %e, "account is unusable");
                Err(TapperError::InvalidSession(format!("{}: {e}", self.session)))
            }
            Err(e) => {
                error!(session = %self.session, operation = "auth", error = %e, "authorization failed");
                pause(&self.pacing.auth_backoff).await;
                Ok(None)
            }
        }
    }

    fn draw_referral(&self) -> String {
        select_referral_code(&mut rand::thread_rng(), &self.primary_referral)
    }

    async fn handshake(&self) -> Result<Option<AuthOutcome>, TapperError> {
        self.messenger.connect().await?;

        let bot = PeerRef::from(BOT_USERNAME);
        let Some(peer) =
            resolve_with_flood_wait(self.messenger.as_ref(), &bot, &self.pacing, &self.session)
                .await?
        else {
            warn!(session = %self.session, peer = %bot, "bot peer could not be resolved");
            return Ok(None);
        };

        let referral_code = self.draw_referral();
        let request = WebViewRequest {
            peer,
            platform: PLATFORM.to_string(),
            short_name: APP_SHORT_NAME.to_string(),
            write_allowed: true,
            start_param: referral_code.clone(),
        };
        let url = self.messenger.request_app_web_view(&request).await?;
        let init_data = parse_launch_url(&url)?;

        let me = self.messenger.get_me().await?;
        let display_name = match me.username {
            Some(username) if me.first_name.trim().is_empty() => username,
            _ => me.first_name,
        };
        info!(session = %self.session, account = %display_name, "init-data obtained");

        Ok(Some(AuthOutcome {
            init_data,
            referral_code,
            display_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use pawtap_core::{AccountProfile, MessengerError};
    use pawtap_test_utils::MockMessenger;

    use super::*;

    const LAUNCH_URL: &str = "https://app.paws.community/#tgWebAppData=user%3D%257B%2522id%2522%253A1001%257D%26chat_instance%3D11%26chat_type%3Dsender%26start_param%3Dref%26auth_date%3D1700000000%26hash%3Dfeed&tgWebAppVersion=7.10";

    fn bridge(m: &Arc<MockMessenger>) -> WebAppAuthBridge {
        WebAppAuthBridge::new(m.clone(), "alpha", "primary", Pacing::immediate())
    }

    #[tokio::test]
    async fn handshake_produces_init_data_and_disconnects() {
        let m = Arc::new(MockMessenger::new(LAUNCH_URL));
        let outcome = bridge(&m).obtain_init_data().await.unwrap().unwrap();

        assert_eq!(outcome.init_data.hash, "feed");
        assert_eq!(outcome.init_data.user, "%7B%22id%22%3A1001%7D");
        assert_eq!(outcome.display_name, "Test");

        let requests = m.web_view_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].platform, PLATFORM);
        assert_eq!(requests[0].short_name, APP_SHORT_NAME);
        assert!(requests[0].write_allowed);
        assert_eq!(requests[0].start_param, outcome.referral_code);
        assert!(outcome.referral_code == "primary" || outcome.referral_code == "acAO24ki");

        assert_eq!(m.calls().await.last().map(String::as_str), Some("disconnect"));
    }

    #[tokio::test]
    async fn blank_first_name_falls_back_to_username() {
        let m = Arc::new(MockMessenger::new(LAUNCH_URL).with_me(AccountProfile {
            id: 7,
            first_name: " ".into(),
            username: Some("paws_fan".into()),
        }));
        let outcome = bridge(&m).obtain_init_data().await.unwrap().unwrap();
        assert_eq!(outcome.display_name, "paws_fan");
    }

    #[tokio::test]
    async fn terminal_connect_error_invalidates_session() {
        let m = Arc::new(MockMessenger::new(LAUNCH_URL));
        m.fail_next("connect", MessengerError::Unauthorized("AUTH_KEY_UNREGISTERED".into()))
            .await;
        let err = bridge(&m).obtain_init_data().await.unwrap_err();
        assert!(matches!(err, TapperError::InvalidSession(_)));
        assert_eq!(m.count("disconnect").await, 1);
    }

    #[tokio::test]
    async fn terminal_error_after_connect_invalidates_session() {
        let m = Arc::new(MockMessenger::new(LAUNCH_URL));
        m.fail_next("request_app_web_view", MessengerError::Deactivated)
            .await;
        let err = bridge(&m).obtain_init_data().await.unwrap_err();
        assert!(matches!(err, TapperError::InvalidSession(_)));
    }

    #[tokio::test]
    async fn ordinary_failure_yields_none() {
        let m = Arc::new(MockMessenger::new(LAUNCH_URL));
        m.fail_next("get_me", MessengerError::Transport("reset".into()))
            .await;
        assert_eq!(bridge(&m).obtain_init_data().await.unwrap(), None);
        assert_eq!(m.count("disconnect").await, 1);
    }

    #[tokio::test]
    async fn unparsable_launch_url_yields_none() {
        let m = Arc::new(MockMessenger::new("https://app.paws.community/#nothing"));
        assert_eq!(bridge(&m).obtain_init_data().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unresolved_bot_yields_none() {
        let m = Arc::new(MockMessenger::new(LAUNCH_URL));
        m.fail_next("resolve_peer", MessengerError::PeerNotCached("KEY_UNKNOWN".into()))
            .await;
        assert_eq!(bridge(&m).obtain_init_data().await.unwrap(), None);
        assert_eq!(m.count("request_app_web_view").await, 0);
    }
}
