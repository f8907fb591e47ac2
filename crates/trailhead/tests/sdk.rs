// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end SDK tests against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_test::assert_ok;
use trailhead::{ApiKey, BatchConfig, Error, Properties, RetryConfig, Trailhead};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "th_test_sdk";

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

fn sdk_for_server(server: &MockServer) -> Trailhead {
	init_tracing();
	Trailhead::builder()
		.api_key(ApiKey::new(TEST_KEY).unwrap())
		.base_url(server.uri())
		.retry_config(RetryConfig::disabled())
		.batch_config(BatchConfig {
			flush_interval: Duration::from_secs(600),
			..BatchConfig::default()
		})
		.build()
		.expect("sdk creation should succeed")
}

#[tokio::test]
async fn referral_code_is_fetched_with_key() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/api/referrals/code"))
		.and(query_param("user_id", "user_42"))
		.and(header("x-api-key", TEST_KEY))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"code": "FRIEND42",
			"url": "https://trail.link/r/FRIEND42"
		})))
		.expect(1)
		.mount(&server)
		.await;

	let sdk = sdk_for_server(&server);
	let code = assert_ok!(sdk.referrals().referral_code("user_42").await);

	assert_eq!(code.code, "FRIEND42");
	assert_eq!(code.url.as_deref(), Some("https://trail.link/r/FRIEND42"));
}

#[tokio::test]
async fn claim_referral_posts_code_and_user() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/referrals/claim"))
		.and(header("x-api-key", TEST_KEY))
		.and(body_json(json!({"code": "FRIEND42", "user_id": "user_7"})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"ok": true,
			"reward": {"credits": 5}
		})))
		.expect(1)
		.mount(&server)
		.await;

	let sdk = sdk_for_server(&server);
	let claim = sdk
		.referrals()
		.claim_referral("FRIEND42", "user_7")
		.await
		.unwrap();

	assert!(claim.ok);
	assert_eq!(claim.reward, Some(json!({"credits": 5})));
}

#[tokio::test]
async fn claim_of_unknown_code_surfaces_api_error() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/referrals/claim"))
		.respond_with(ResponseTemplate::new(404).set_body_json(json!({
			"error": "referral code not found",
			"code": "NOT_FOUND"
		})))
		.mount(&server)
		.await;

	let sdk = sdk_for_server(&server);
	let err = sdk
		.referrals()
		.claim_referral("NOPE", "user_7")
		.await
		.unwrap_err();

	assert_eq!(err.status(), Some(404));
	assert_eq!(err.to_string(), "referral code not found (HTTP 404)");
}

#[tokio::test]
async fn blank_arguments_are_rejected_locally() {
	let server = MockServer::start().await;
	let sdk = sdk_for_server(&server);

	let err = sdk.referrals().referral_code(" ").await.unwrap_err();
	assert!(matches!(err, Error::InvalidArgument("user_id")));
	let err = sdk.deferred_links().link("").await.unwrap_err();
	assert!(matches!(err, Error::InvalidArgument("code")));

	assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn deferred_link_resolution_is_public() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/deferred-links/resolve"))
		.and(body_json(json!({"fingerprint": "fp_abc"})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"matched": true,
			"link": "myapp://promo/summer",
			"data": {"campaign": "summer"}
		})))
		.expect(1)
		.mount(&server)
		.await;

	let sdk = sdk_for_server(&server);
	let found = sdk.deferred_links().resolve("fp_abc").await.unwrap();

	assert!(found.matched);
	assert_eq!(found.link.as_deref(), Some("myapp://promo/summer"));
	assert_eq!(found.data, Some(json!({"campaign": "summer"})));

	let requests = server.received_requests().await.unwrap();
	assert!(requests[0].headers.get("x-api-key").is_none());
}

#[tokio::test]
async fn link_lookup_is_public_get() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/api/links/lookup"))
		.and(query_param("code", "summer"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"code": "summer",
			"url": "https://example.com/summer",
			"clicks": 12
		})))
		.expect(1)
		.mount(&server)
		.await;

	let sdk = sdk_for_server(&server);
	let info = sdk.deferred_links().link("summer").await.unwrap();

	assert_eq!(info.url.as_deref(), Some("https://example.com/summer"));
	assert_eq!(info.extra["clicks"], 12);

	let requests = server.received_requests().await.unwrap();
	assert!(requests[0].headers.get("x-api-key").is_none());
}

#[tokio::test]
async fn track_and_flush_through_the_sdk() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/analytics/batch"))
		.and(header("x-api-key", TEST_KEY))
		.and(body_json(json!({
			"events": [{"event_type": "custom.signup", "properties": {"source": "ad"}}]
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "accepted": 1})))
		.expect(1)
		.mount(&server)
		.await;

	let sdk = sdk_for_server(&server);
	sdk.track("signup", Properties::new().insert("source", "ad"))
		.unwrap();
	sdk.flush().await.unwrap();
	assert_eq!(sdk.analytics().queue_len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abort_cancels_all_in_flight_requests() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/api/referrals/code"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"code": "SLOW"}))
				.set_delay(Duration::from_secs(30)),
		)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/v1/api/analytics/batch"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"ok": true}))
				.set_delay(Duration::from_secs(30)),
		)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/v1/api/deferred-links/resolve"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"matched": false})))
		.mount(&server)
		.await;

	let sdk = Arc::new(sdk_for_server(&server));
	sdk.track("pending", Properties::new()).unwrap();

	let referral = tokio::spawn({
		let sdk = Arc::clone(&sdk);
		async move { sdk.referrals().referral_code("user_1").await }
	});
	let flush = tokio::spawn({
		let sdk = Arc::clone(&sdk);
		async move { sdk.flush().await }
	});

	tokio::time::sleep(Duration::from_millis(200)).await;
	sdk.abort();

	let referral_err = referral.await.unwrap().unwrap_err();
	let flush_err = flush.await.unwrap().unwrap_err();
	assert!(referral_err.is_cancelled());
	assert!(flush_err.is_cancelled());
	assert_eq!(sdk.analytics().queue_len(), 1);

	let found = sdk.deferred_links().resolve("fp").await.unwrap();
	assert!(!found.matched);

	// The requeued event leaves through the teardown beacon once the server is fast again.
	server.reset().await;
	Mock::given(method("POST"))
		.and(path("/v1/api/analytics/batch"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
		.mount(&server)
		.await;
	sdk.destroy();

	let mut received = Vec::new();
	for _ in 0..200 {
		received = server.received_requests().await.unwrap();
		if !received.is_empty() {
			break;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}
	assert_eq!(received.len(), 1);
	let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
	assert_eq!(body["events"][0]["event_type"], "custom.pending");
}

#[tokio::test]
async fn destroy_stops_tracking() {
	let server = MockServer::start().await;
	let sdk = sdk_for_server(&server);

	sdk.destroy();
	sdk.destroy();

	let err = sdk.track("late", Properties::new()).unwrap_err();
	assert!(matches!(
		err,
		Error::Analytics(trailhead_analytics::AnalyticsError::ClientShutdown)
	));
}
