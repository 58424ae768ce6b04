// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging client for deterministic testing.
//!
//! `MockMessenger` succeeds by default. Failures are scripted per method,
//! either once ([`MockMessenger::fail_next`]) or on every call
//! ([`MockMessenger::fail_always`]). Every call is appended to a log as
//! `method` or `method:argument` for assertions.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use pawtap_core::{
    AccountProfile, ChatInfo, MessengerClient, MessengerError, Peer, PeerRef, WebViewRequest,
};
use tokio::sync::Mutex;

/// A scriptable [`MessengerClient`].
pub struct MockMessenger {
    web_view_url: String,
    me: AccountProfile,
    chat: ChatInfo,
    once: Mutex<HashMap<&'static str, VecDeque<MessengerError>>>,
    always: Mutex<HashMap<&'static str, MessengerError>>,
    calls: Mutex<Vec<String>>,
    web_view_requests: Mutex<Vec<WebViewRequest>>,
}

impl MockMessenger {
    /// A client whose web view returns `web_view_url`.
    pub fn new(web_view_url: impl Into<String>) -> Self {
        Self {
            web_view_url: web_view_url.into(),
            me: AccountProfile {
                id: 1001,
                first_name: "Test".to_string(),
                username: Some("test_user".to_string()),
            },
            chat: ChatInfo {
                id: -100_500,
                title: "Test Channel".to_string(),
            },
            once: Mutex::new(HashMap::new()),
            always: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            web_view_requests: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the profile returned by `get_me`.
    pub fn with_me(mut self, me: AccountProfile) -> Self {
        self.me = me;
        self
    }

    /// Queues `error` for the next call of `method`.
    pub async fn fail_next(&self, method: &'static str, error: MessengerError) {
        self.once
            .lock()
            .await
            .entry(method)
            .or_default()
            .push_back(error);
    }

    /// Makes every call of `method` fail with `error`.
    pub async fn fail_always(&self, method: &'static str, error: MessengerError) {
        self.always.lock().await.insert(method, error);
    }

    /// Every call so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Number of calls to `method` (with or without an argument).
    pub async fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.split(':').next() == Some(method))
            .count()
    }

    /// Arguments of every `request_app_web_view` call.
    pub async fn web_view_requests(&self) -> Vec<WebViewRequest> {
        self.web_view_requests.lock().await.clone()
    }

    async fn record(&self, method: &'static str, arg: Option<String>) -> Result<(), MessengerError> {
        let entry = match arg {
            Some(arg) => format!("{method}:{arg}"),
            None => method.to_string(),
        };
        self.calls.lock().await.push(entry);

        if let Some(err) = self
            .once
            .lock()
            .await
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }
        match self.always.lock().await.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn peer_for(target: &PeerRef) -> Peer {
    let id = match target {
        PeerRef::Id(id) => *id,
        PeerRef::Username(name) => name.len() as i64,
    };
    Peer {
        id,
        access_hash: Some(id.wrapping_mul(31)),
    }
}

#[async_trait]
impl MessengerClient for MockMessenger {
    async fn connect(&self) -> Result<(), MessengerError> {
        self.record("connect", None).await
    }

    async fn disconnect(&self) -> Result<(), MessengerError> {
        self.record("disconnect", None).await
    }

    async fn resolve_peer(&self, target: &PeerRef) -> Result<Peer, MessengerError> {
        self.record("resolve_peer", Some(target.to_string())).await?;
        Ok(peer_for(target))
    }

    async fn get_chat(&self, target: &PeerRef) -> Result<ChatInfo, MessengerError> {
        self.record("get_chat", Some(target.to_string())).await?;
        Ok(self.chat.clone())
    }

    async fn request_app_web_view(
        &self,
        request: &WebViewRequest,
    ) -> Result<String, MessengerError> {
        self.record("request_app_web_view", Some(request.start_param.clone()))
            .await?;
        self.web_view_requests.lock().await.push(request.clone());
        Ok(self.web_view_url.clone())
    }

    async fn get_me(&self) -> Result<AccountProfile, MessengerError> {
        self.record("get_me", None).await?;
        Ok(self.me.clone())
    }

    async fn join_chat(&self, link: &str) -> Result<ChatInfo, MessengerError> {
        self.record("join_chat", Some(link.to_string())).await?;
        Ok(self.chat.clone())
    }

    async fn list_dialogs(&self, limit: u32) -> Result<usize, MessengerError> {
        self.record("list_dialogs", Some(limit.to_string())).await?;
        Ok(0)
    }

    async fn mute_peer(&self, peer: &Peer, mute_until: i32) -> Result<(), MessengerError> {
        self.record("mute_peer", Some(format!("{}@{mute_until}", peer.id)))
            .await
    }

    async fn archive_chat(&self, chat_id: i64) -> Result<(), MessengerError> {
        self.record("archive_chat", Some(chat_id.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_failure_fires_once() {
        let mock = MockMessenger::new("url");
        mock.fail_next("connect", MessengerError::Deactivated).await;
        assert_eq!(mock.connect().await, Err(MessengerError::Deactivated));
        assert_eq!(mock.connect().await, Ok(()));
        assert_eq!(mock.count("connect").await, 2);
    }

    #[tokio::test]
    async fn persistent_failure_repeats() {
        let mock = MockMessenger::new("url");
        mock.fail_always("join_chat", MessengerError::Banned).await;
        assert!(mock.join_chat("a").await.is_err());
        assert!(mock.join_chat("b").await.is_err());
        assert_eq!(mock.calls().await, vec!["join_chat:a", "join_chat:b"]);
    }
}
