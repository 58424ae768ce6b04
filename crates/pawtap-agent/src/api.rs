// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the game API.
//!
//! Provides [`PawsApiClient`], which presents a browser-like header set,
//! carries the bearer token once authenticated, decodes brotli bodies
//! explicitly, and wraps every call in the soft-failing [`retry`] loop.

use std::io::Read;
use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use pawtap_config::model::ApiConfig;
use pawtap_core::{AuthResponse, GameApi, Quest, SessionIdentity, TapperError, UserProfile};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::pacing::{pause, Pacing};
use crate::retry::{retry, RetryPolicy};

const APP_ORIGIN: &str = "https://app.paws.community";
const PROXY_CHECK_URL: &str = "https://ipinfo.io/ip";
const PROXY_CHECK_TIMEOUT: Duration = Duration::from_secs(20);
const BROTLI_BUFFER: usize = 4096;

#[derive(Debug, Deserialize)]
struct QuestList {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SuccessFlag {
    #[serde(default)]
    success: bool,
}

/// Game API client for one session.
#[derive(Debug)]
pub struct PawsApiClient {
    client: reqwest::Client,
    base_url: String,
    session: String,
    preflight: bool,
    token: RwLock<Option<String>>,
    data_policy: RetryPolicy,
    quest_policy: RetryPolicy,
    quest_settle: RangeInclusive<u64>,
    quests_listed: RangeInclusive<u64>,
    proxy_check_url: String,
}

impl PawsApiClient {
    /// Builds a client for `identity`, routed through its proxy if it has one.
    pub fn new(
        identity: &SessionIdentity,
        api: &ApiConfig,
        pacing: &Pacing,
    ) -> Result<Self, TapperError> {
        let mut builder = reqwest::Client::builder()
            .default_headers(browser_headers())
            .user_agent(identity.user_agent.as_str())
            .timeout(Duration::from_secs(api.timeout_secs));

        if let Some(proxy) = &identity.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| TapperError::Config(format!("invalid proxy `{proxy}`: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TapperError::http("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            session: identity.name.clone(),
            preflight: api.preflight,
            token: RwLock::new(None),
            data_policy: RetryPolicy::data(pacing),
            quest_policy: RetryPolicy::quest(pacing),
            quest_settle: pacing.quest_settle.clone(),
            quests_listed: pacing.quests_listed.clone(),
            proxy_check_url: PROXY_CHECK_URL.to_string(),
        })
    }

    /// Overrides the exit-IP lookup URL (for testing with wiremock).
    pub fn with_proxy_check_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_check_url = url.into();
        self
    }

    /// Logs the exit IP seen through the configured proxy.
    pub async fn check_proxy(&self) -> Option<String> {
        let result = async {
            self.client
                .get(&self.proxy_check_url)
                .timeout(PROXY_CHECK_TIMEOUT)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        }
        .await;

        match result {
            Ok(ip) => {
                let ip = ip.trim().to_string();
                info!(session = %self.session, ip = %ip, "proxy exit address");
                Some(ip)
            }
            Err(e) => {
                error!(session = %self.session, operation = "check_proxy", error = %e, "proxy check failed");
                None
            }
        }
    }

    /// Issues a CORS-style pre-flight for `method` on `url`. The outcome is ignored.
    async fn send_preflight(&self, method: &Method, url: &str) {
        let result = self
            .client
            .request(Method::OPTIONS, url)
            .header("access-control-request-method", method.as_str())
            .header("access-control-request-headers", "authorization,content-type")
            .send()
            .await;
        if let Err(e) = result {
            debug!(session = %self.session, url, error = %e, "pre-flight failed");
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, TapperError> {
        let url = format!("{}{path}", self.base_url);
        if self.preflight {
            self.send_preflight(&method, &url).await;
        }

        let mut request = self.client.request(method, &url);
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TapperError::http(format!("{path}: request failed"), e))?;
        let status = response.status();
        debug!(session = %self.session, path, status = %status, "response received");

        if !status.is_success() {
            return Err(TapperError::Http {
                message: format!("{path}: server returned {status}"),
                source: None,
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| TapperError::http(format!("{path}: failed to read body"), e))
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, TapperError> {
        let bytes = self.send(method, path, body).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TapperError::decode(format!("{path}: unexpected response"), e))
    }

    async fn call_brotli<T: DeserializeOwned>(&self, path: &str) -> Result<T, TapperError> {
        let bytes = self.send(Method::GET, path, None).await?;
        decode_json(&bytes).map_err(|e| TapperError::decode(format!("{path}: unexpected response"), e))
    }

    /// Converts each listed entry on its own; entries that do not parse are
    /// logged and dropped.
    fn parse_quests(&self, entries: Vec<Value>) -> Vec<Quest> {
        entries
            .into_iter()
            .filter_map(|entry| {
                let id = entry.get("_id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<Quest>(entry) {
                    Ok(quest) => Some(quest),
                    Err(e) => {
                        warn!(session = %self.session, quest_id = %id, error = %e, "skipping malformed quest");
                        None
                    }
                }
            })
            .collect()
    }

    async fn quest_action(&self, path: &'static str, quest_id: &str) -> bool {
        let body = json!({ "questId": quest_id });
        let body = &body;
        let flag = retry(&self.quest_policy, &self.session, path, move || {
            self.call_json::<SuccessFlag>(Method::POST, path, Some(body))
        })
        .await;
        if flag.is_some() {
            pause(&self.quest_settle).await;
        }
        flag.is_some_and(|f| f.success)
    }
}

#[async_trait]
impl GameApi for PawsApiClient {
    async fn login(&self, init_data: &str, referral_code: &str) -> Option<AuthResponse> {
        let body = json!({ "data": init_data, "referralCode": referral_code });
        let body = &body;
        retry(&self.data_policy, &self.session, "login", move || {
            self.call_json(Method::POST, "/user/auth", Some(body))
        })
        .await
    }

    async fn set_access_token(&self, token: &str) {
        *self.token.write().await = Some(token.to_string());
    }

    async fn user_profile(&self) -> Option<UserProfile> {
        retry(&self.data_policy, &self.session, "user_profile", || {
            self.call_brotli("/user")
        })
        .await
    }

    async fn list_quests(&self) -> Option<Vec<Quest>> {
        let list: QuestList = retry(&self.data_policy, &self.session, "list_quests", || {
            self.call_brotli("/quests/list")
        })
        .await?;
        pause(&self.quests_listed).await;
        Some(self.parse_quests(list.data))
    }

    async fn complete_quest(&self, quest_id: &str) -> bool {
        self.quest_action("/quests/completed", quest_id).await
    }

    async fn claim_quest(&self, quest_id: &str) -> bool {
        self.quest_action("/quests/claim", quest_id).await
    }

    async fn submit_wallet(&self, address: &str) -> bool {
        let body = json!({ "wallet": address });
        let body = &body;
        let flag: Option<SuccessFlag> =
            retry(&self.data_policy, &self.session, "submit_wallet", move || {
                self.call_json(Method::POST, "/user/wallet", Some(body))
            })
            .await;
        flag.is_some_and(|f| f.success)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("br"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ORIGIN, HeaderValue::from_static(APP_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static("https://app.paws.community/"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-site"));
    headers
}

/// Decodes a JSON body that is normally brotli-compressed, accepting a
/// plain body when it is not.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    let mut decoded = Vec::new();
    let inflated = brotli::Decompressor::new(body, BROTLI_BUFFER)
        .read_to_end(&mut decoded)
        .is_ok();
    if inflated
        && !decoded.is_empty()
        && let Ok(value) = serde_json::from_slice(&decoded)
    {
        return Ok(value);
    }
    serde_json::from_slice(body)
}
