// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the MTProto gateway sidecar.
//!
//! The sidecar owns the MTProto sessions; this client names the session in
//! every call and maps protocol errors into [`MessengerError`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pawtap_core::{
    AccountProfile, ChatInfo, MessengerClient, MessengerError, Peer, PeerRef, SessionIdentity,
    TapperError, WebViewRequest,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::rpc::{RpcRequest, RpcResponse};

/// Per-call timeout for gateway requests.
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`MessengerClient`] for one session, talking to the gateway over HTTP.
#[derive(Debug)]
pub struct GatewayMessenger {
    client: reqwest::Client,
    endpoint: String,
    identity: SessionIdentity,
    next_id: AtomicU64,
}

impl GatewayMessenger {
    /// Creates a client for `identity` against the gateway at `gateway_url`.
    pub fn new(gateway_url: &str, identity: SessionIdentity) -> Result<Self, TapperError> {
        let client = reqwest::Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .map_err(|e| TapperError::http("failed to build gateway HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: format!("{}/rpc", gateway_url.trim_end_matches('/')),
            identity,
            next_id: AtomicU64::new(1),
        })
    }

    /// The session this client drives.
    pub fn session_name(&self) -> &str {
        &self.identity.name
    }

    fn params(&self, args: Value) -> Value {
        let mut params = Map::new();
        params.insert("session".into(), json!(self.identity.name));
        params.insert("api_id".into(), json!(self.identity.api_id));
        params.insert("api_hash".into(), json!(self.identity.api_hash));
        params.insert("proxy".into(), json!(self.identity.proxy));
        if let Value::Object(extra) = args {
            params.extend(extra);
        }
        Value::Object(params)
    }

    async fn call(&self, method: &str, args: Value) -> Result<Value, MessengerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, self.params(args));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| MessengerError::Transport(format!("{method}: {e}")))?;

        let status = response.status();
        debug!(session = %self.identity.name, method, id, status = %status, "gateway response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessengerError::Transport(format!(
                "{method}: gateway returned {status}: {body}"
            )));
        }

        response
            .json::<RpcResponse>()
            .await
            .map_err(|e| MessengerError::Transport(format!("{method}: malformed response: {e}")))?
            .into_result()
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Value,
    ) -> Result<T, MessengerError> {
        let value = self.call(method, args).await?;
        serde_json::from_value(value)
            .map_err(|e| MessengerError::Transport(format!("{method}: unexpected result: {e}")))
    }
}

#[async_trait]
impl MessengerClient for GatewayMessenger {
    async fn connect(&self) -> Result<(), MessengerError> {
        self.call("connect", json!({})).await.map(drop)
    }

    async fn disconnect(&self) -> Result<(), MessengerError> {
        self.call("disconnect", json!({})).await.map(drop)
    }

    async fn resolve_peer(&self, target: &PeerRef) -> Result<Peer, MessengerError> {
        self.call_as("resolve_peer", json!({ "peer": target })).await
    }

    async fn get_chat(&self, target: &PeerRef) -> Result<ChatInfo, MessengerError> {
        self.call_as("get_chat", json!({ "peer": target })).await
    }

    async fn request_app_web_view(
        &self,
        request: &WebViewRequest,
    ) -> Result<String, MessengerError> {
        let result = self
            .call("request_app_web_view", json!({ "request": request }))
            .await?;
        result
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                MessengerError::Transport("request_app_web_view: result has no url".into())
            })
    }

    async fn get_me(&self) -> Result<AccountProfile, MessengerError> {
        self.call_as("get_me", json!({})).await
    }

    async fn join_chat(&self, link: &str) -> Result<ChatInfo, MessengerError> {
        self.call_as("join_chat", json!({ "link": link })).await
    }

    async fn list_dialogs(&self, limit: u32) -> Result<usize, MessengerError> {
        let result = self.call("get_dialogs", json!({ "limit": limit })).await?;
        Ok(result
            .get("count")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or_default())
    }

    async fn mute_peer(&self, peer: &Peer, mute_until: i32) -> Result<(), MessengerError> {
        self.call(
            "update_notify_settings",
            json!({ "peer": peer, "mute_until": mute_until }),
        )
        .await
        .map(drop)
    }

    async fn archive_chat(&self, chat_id: i64) -> Result<(), MessengerError> {
        self.call("archive_chats", json!({ "chat_ids": [chat_id] }))
            .await
            .map(drop)
    }
}
