// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response bodies for the batch endpoint.

use serde::{Deserialize, Serialize};

use crate::event::QueuedEvent;

/// Path of the batch endpoint, relative to the API base URL.
pub const BATCH_PATH: &str = "/v1/api/analytics/batch";

/// Body of an authenticated batch POST.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest<'a> {
	pub events: &'a [QueuedEvent],
}

/// Server answer to a batch POST.
///
/// `errors` lists per-event problems; the SDK logs them and does not retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BatchResponse {
	pub ok: bool,
	#[serde(default)]
	pub accepted: Option<u64>,
	#[serde(default)]
	pub errors: Vec<String>,
}

/// Body of the teardown beacon, which carries the key in-band instead of in
/// the `X-API-Key` header.
#[derive(Debug, Clone, Serialize)]
pub struct BeaconPayload<'a> {
	pub events: &'a [QueuedEvent],
	#[serde(rename = "apiKey")]
	pub api_key: &'a str,
}
