// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fire-and-forget delivery used when the client is torn down.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use trailhead_analytics_core::{BeaconPayload, QueuedEvent, BATCH_PATH};
use trailhead_common_config::ApiKey;

/// Upper bound on a single beacon POST. Runtime shutdown waits this long at most.
const BEACON_TIMEOUT: Duration = Duration::from_secs(10);

/// Hands events to a delivery that must not block or be awaited.
///
/// There is no retry and no re-queue. A `false` return means the events could
/// not even be handed off and are lost.
pub trait Beacon: Send + Sync {
	fn send(&self, events: &[QueuedEvent]) -> bool;
}

/// [`Beacon`] that POSTs the batch from the runtime's blocking pool.
///
/// Runtime shutdown waits for blocking-pool work, so the request still goes
/// out when the client is dropped right before `main` returns. Bypasses the
/// retrying request executor. The key travels in the body as `apiKey` and no
/// `X-API-Key` header is sent.
pub struct HttpBeacon {
	url: String,
	api_key: ApiKey,
	timeout: Duration,
}

impl HttpBeacon {
	/// `base_url` must already be normalized.
	pub fn new(base_url: &str, api_key: ApiKey) -> Self {
		Self {
			url: format!("{base_url}{BATCH_PATH}"),
			api_key,
			timeout: BEACON_TIMEOUT,
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}
}

impl Beacon for HttpBeacon {
	fn send(&self, events: &[QueuedEvent]) -> bool {
		let body = match serde_json::to_vec(&BeaconPayload {
			events,
			api_key: self.api_key.expose(),
		}) {
			Ok(body) => body,
			Err(e) => {
				warn!(error = %e, "Failed to encode beacon payload");
				return false;
			}
		};

		let Ok(runtime) = Handle::try_current() else {
			warn!(
				count = events.len(),
				"No Tokio runtime for beacon, events dropped"
			);
			return false;
		};

		let url = self.url.clone();
		let timeout = self.timeout;
		let count = events.len();
		// The blocking client owns an inner runtime, so it is built and dropped
		// on the pool thread, never on an async worker.
		runtime.spawn_blocking(move || post_blocking(&url, body, timeout, count));
		true
	}
}

fn post_blocking(url: &str, body: Vec<u8>, timeout: Duration, count: usize) {
	let result = reqwest::blocking::Client::builder()
		.user_agent(trailhead_common_http::user_agent())
		.timeout(timeout)
		.build()
		.and_then(|client| {
			client
				.post(url)
				.header(CONTENT_TYPE, "application/json")
				.body(body)
				.send()
		});

	match result {
		Ok(response) => {
			debug!(count, status = response.status().as_u16(), "Beacon delivered")
		}
		Err(e) => warn!(count, error = %e, "Beacon delivery failed"),
	}
}
