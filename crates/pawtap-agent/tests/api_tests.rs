// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the game API client against a wiremock server.

use std::io::Write;

use pawtap_agent::{Pacing, PawsApiClient};
use pawtap_config::model::ApiConfig;
use pawtap_core::{GameApi, SessionIdentity};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn identity() -> SessionIdentity {
    SessionIdentity {
        name: "alpha".to_string(),
        api_id: 1,
        api_hash: "hash".to_string(),
        proxy: None,
        user_agent: "pawtap-test/1.0".to_string(),
    }
}

fn client(server: &MockServer, preflight: bool) -> PawsApiClient {
    let api = ApiConfig {
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 5,
        preflight,
        ..ApiConfig::default()
    };
    PawsApiClient::new(&identity(), &api, &Pacing::immediate()).unwrap()
}

fn brotli(body: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 5, 22);
        writer.write_all(body.to_string().as_bytes()).unwrap();
    }
    out
}

#[tokio::test]
async fn login_posts_init_data_and_referral() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/user/auth"))
        .and(header("user-agent", "pawtap-test/1.0"))
        .and(body_json(json!({"data": "user=1&hash=h", "referralCode": "acAO24ki"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": ["tok-1", {"_id": "u1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, false)
        .login("user=1&hash=h", "acAO24ki")
        .await
        .unwrap();
    assert_eq!(response.token(), Some("tok-1"));
    assert!(response.user().is_some());
}

#[tokio::test]
async fn profile_is_fetched_with_bearer_and_brotli_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/user"))
        .and(header("authorization", "Bearer tok-9"))
        .and(header("accept-encoding", "br"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(brotli(&json!({
            "success": true,
            "data": {
                "userData": {"firstname": "Ann", "username": "ann"},
                "gameData": {"balance": 4200.0}
            }
        }))))
        .mount(&server)
        .await;

    let api = client(&server, false);
    api.set_access_token("tok-9").await;
    let profile = api.user_profile().await.unwrap();
    assert!(profile.success);
    assert_eq!(profile.first_name(), Some("Ann"));
    assert_eq!(profile.balance(), Some(4200.0));
}

#[tokio::test]
async fn quest_list_accepts_plain_and_compressed_bodies() {
    let server = MockServer::start().await;
    let quests = json!({"success": true, "data": [
        {"_id": "q1", "code": "telegram", "title": "Join", "data": "https://t.me/pawsupfam",
         "rewards": [{"amount": 2500}], "progress": {"claimed": false}},
        {"_id": "q2", "code": "twitter", "title": "Follow", "progress": {"claimed": true}}
    ]});
    Mock::given(method("GET"))
        .and(path("/v1/quests/list"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(brotli(&quests)))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/quests/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quests.clone()))
        .mount(&server)
        .await;

    let api = client(&server, false);
    for _ in 0..2 {
        let list = api.list_quests().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].channel_link(), Some("https://t.me/pawsupfam"));
        assert!(list[1].is_claimed());
    }
}

#[tokio::test]
async fn malformed_quest_is_dropped_and_the_rest_kept() {
    let server = MockServer::start().await;
    let quests = json!({"success": true, "data": [
        {"_id": "q1", "code": "twitter", "title": "Follow", "progress": {"claimed": false}},
        {"_id": "odd", "code": "twitter", "title": null, "progress": null},
        {"code": "discord", "title": "no id"},
        "not a quest"
    ]});
    Mock::given(method("GET"))
        .and(path("/v1/quests/list"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(brotli(&quests)))
        .expect(1)
        .mount(&server)
        .await;

    let list = client(&server, false).list_quests().await.unwrap();
    let ids: Vec<&str> = list.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, ["q1", "odd"]);
    assert!(!list[1].is_claimed());
}

#[tokio::test]
async fn undecodable_body_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quests/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, false).list_quests().await.is_none());
}

#[tokio::test]
async fn verify_retries_through_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quests/completed"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/quests/completed"))
        .and(body_json(json!({"questId": "q1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    assert!(client(&server, false).complete_quest("q1").await);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn claim_reports_server_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quests/claim"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client(&server, false).claim_quest("q1").await);
}

#[tokio::test]
async fn exhausted_login_returns_none_after_all_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/user/auth"))
        .respond_with(ResponseTemplate::new(500))
        .expect(8)
        .mount(&server)
        .await;

    assert!(client(&server, false).login("x", "y").await.is_none());
}

#[tokio::test]
async fn quest_calls_use_the_longer_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/quests/claim"))
        .respond_with(ResponseTemplate::new(503))
        .expect(21)
        .mount(&server)
        .await;

    assert!(!client(&server, false).claim_quest("q1").await);
}

#[tokio::test]
async fn wallet_submission_posts_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/user/wallet"))
        .and(body_json(json!({"wallet": "0:abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, false).submit_wallet("0:abc").await);
}

#[tokio::test]
async fn preflight_precedes_each_call_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("OPTIONS"))
        .and(path("/v1/user/wallet"))
        .and(header("access-control-request-method", "POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/user/wallet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, true).submit_wallet("0:abc").await);
}

#[tokio::test]
async fn proxy_check_reports_exit_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.7\n"))
        .mount(&server)
        .await;

    let api = client(&server, false).with_proxy_check_url(format!("{}/ip", server.uri()));
    assert_eq!(api.check_proxy().await.as_deref(), Some("203.0.113.7"));

    let broken = client(&server, false).with_proxy_check_url(format!("{}/missing", server.uri()));
    assert_eq!(broken.check_proxy().await, None);
}
