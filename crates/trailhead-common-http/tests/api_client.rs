// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ApiClient tests against a wiremock server.
//!
//! These tests verify:
//! - Header rules for the four entry points
//! - Error envelope parsing and the status-line fallback
//! - Retry on 5xx and no retry on 4xx over real HTTP
//! - `cancel_all` aborting in-flight requests without poisoning later ones

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use trailhead_common_config::ApiKey;
use trailhead_common_http::{
	ApiClient, HttpError, NoJitter, RetryConfig, API_KEY_HEADER, INVALID_JSON_MESSAGE,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "th_test_key";

#[derive(Debug, Serialize)]
struct Claim<'a> {
	code: &'a str,
	user_id: &'a str,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Ack {
	ok: bool,
}

fn fast_retry() -> RetryConfig {
	RetryConfig {
		base_delay: Duration::from_millis(5),
		..RetryConfig::default()
	}
	.with_jitter(NoJitter)
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

fn client_for_server(server: &MockServer) -> ApiClient {
	init_tracing();
	ApiClient::builder()
		.api_key(ApiKey::new(TEST_KEY).unwrap())
		.base_url(format!("{}/", server.uri()))
		.retry_config(fast_retry())
		.build()
		.expect("client creation should succeed")
}

#[tokio::test]
async fn authenticated_get_sends_key_and_query() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/api/referrals/code"))
		.and(query_param("user_id", "user 42"))
		.and(header(API_KEY_HEADER, TEST_KEY))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let ack: Ack = assert_ok!(
		client
			.authenticated_get("/v1/api/referrals/code", &[("user_id", "user 42")])
			.await
	);
	assert_eq!(ack, Ack { ok: true });

	let requests = server.received_requests().await.unwrap();
	assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn authenticated_post_sends_key_content_type_and_body() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/referrals/claim"))
		.and(header(API_KEY_HEADER, TEST_KEY))
		.and(header("content-type", "application/json"))
		.and(body_json(json!({"code": "ABC", "user_id": "u1"})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let body = Claim {
		code: "ABC",
		user_id: "u1",
	};
	let ack: Ack = client
		.authenticated_post("/v1/api/referrals/claim", Some(&body))
		.await
		.unwrap();
	assert!(ack.ok);
}

#[tokio::test]
async fn public_get_sends_no_key_and_no_content_type() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/api/links/lookup"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let _: Ack = client
		.public_get("/v1/api/links/lookup", &[("code", "xyz")])
		.await
		.unwrap();

	let requests = server.received_requests().await.unwrap();
	assert_eq!(requests.len(), 1);
	assert!(requests[0].headers.get(API_KEY_HEADER).is_none());
	assert!(requests[0].headers.get("content-type").is_none());
	assert_eq!(requests[0].url.query(), Some("code=xyz"));
}

#[tokio::test]
async fn public_post_sends_content_type_but_no_key() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/deferred-links/resolve"))
		.and(header("content-type", "application/json"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let ack: Ack = client
		.public_post("/v1/api/deferred-links/resolve", Some(&json!({"fingerprint": "fp"})))
		.await
		.unwrap();
	assert!(!ack.ok);

	let requests = server.received_requests().await.unwrap();
	assert!(requests[0].headers.get(API_KEY_HEADER).is_none());
}

#[tokio::test]
async fn error_envelope_is_surfaced() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(
			ResponseTemplate::new(404)
				.set_body_json(json!({"error": "referral not found", "code": "NOT_FOUND"})),
		)
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let err = assert_err!(client.authenticated_get::<Value>("/v1/api/referrals/code", &[]).await);

	assert_eq!(err.status(), Some(404));
	assert_eq!(err.code(), Some("NOT_FOUND"));
	match err {
		HttpError::Api(api) => assert_eq!(api.message, "referral not found"),
		other => panic!("expected Api error, got {other:?}"),
	}
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_line() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(400).set_body_string("bad things"))
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let err = client.public_get::<Value>("/anything", &[]).await.unwrap_err();

	match err {
		HttpError::Api(api) => {
			assert_eq!(api.message, "HTTP 400 Bad Request");
			assert_eq!(api.status, 400);
			assert_eq!(api.code, None);
		}
		other => panic!("expected Api error, got {other:?}"),
	}
}

#[tokio::test]
async fn invalid_json_on_success_is_reported() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let err = client.public_get::<Value>("/anything", &[]).await.unwrap_err();

	match err {
		HttpError::Api(api) => {
			assert_eq!(api.message, INVALID_JSON_MESSAGE);
			assert_eq!(api.status, 200);
		}
		other => panic!("expected Api error, got {other:?}"),
	}
}

#[tokio::test]
async fn server_errors_are_retried_then_surfaced() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
		.expect(4)
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let err = client.public_get::<Value>("/anything", &[]).await.unwrap_err();

	assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "bad input"})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for_server(&server);
	let err = client
		.authenticated_post::<Value, Value>("/anything", None)
		.await
		.unwrap_err();

	assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn cancel_all_aborts_in_flight_requests() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/slow"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"ok": true}))
				.set_delay(Duration::from_secs(30)),
		)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/fast"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
		.mount(&server)
		.await;

	let client = Arc::new(client_for_server(&server));
	let tasks: Vec<_> = (0..3)
		.map(|_| {
			let client = Arc::clone(&client);
			tokio::spawn(async move { client.public_get::<Ack>("/slow", &[]).await })
		})
		.collect();

	tokio::time::sleep(Duration::from_millis(200)).await;
	client.cancel_all();

	for task in tasks {
		let err = task.await.unwrap().unwrap_err();
		assert!(err.is_cancelled(), "expected cancellation, got {err:?}");
	}

	let ack: Ack = client.public_get("/fast", &[]).await.unwrap();
	assert!(ack.ok);
}
