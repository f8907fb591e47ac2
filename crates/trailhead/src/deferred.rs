// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deferred deep links and public link lookup.
//!
//! Both endpoints are public: they run before the app knows who the user is,
//! so no API key is sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use trailhead_common_http::ApiClient;

use crate::error::{require, Result};

pub const RESOLVE_PATH: &str = "/v1/api/deferred-links/resolve";
pub const LOOKUP_PATH: &str = "/v1/api/links/lookup";

/// Result of matching a device fingerprint against recent link clicks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeferredMatch {
	pub matched: bool,
	/// The deep link the user clicked before installing.
	#[serde(default)]
	pub link: Option<String>,
	/// Custom data attached to the link.
	#[serde(default)]
	pub data: Option<Value>,
}

/// Public metadata for a short link.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkInfo {
	pub code: String,
	#[serde(default)]
	pub url: Option<String>,
	/// Remaining fields, passed through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct ResolveRequest<'a> {
	fingerprint: &'a str,
}

/// Deferred-link operations, borrowed from
/// [`Trailhead::deferred_links`](crate::Trailhead::deferred_links).
pub struct DeferredLinks<'a> {
	api: &'a ApiClient,
}

impl<'a> DeferredLinks<'a> {
	pub(crate) fn new(api: &'a ApiClient) -> Self {
		Self { api }
	}

	/// Looks up the link a device clicked before installing the app.
	pub async fn resolve(&self, fingerprint: &str) -> Result<DeferredMatch> {
		require(fingerprint, "fingerprint")?;
		let found: DeferredMatch = self
			.api
			.public_post(RESOLVE_PATH, Some(&ResolveRequest { fingerprint }))
			.await?;
		debug!(matched = found.matched, "Resolved deferred link");
		Ok(found)
	}

	/// Fetches public metadata for the short link `code`.
	pub async fn link(&self, code: &str) -> Result<LinkInfo> {
		require(code, "code")?;
		Ok(self.api.public_get(LOOKUP_PATH, &[("code", code)]).await?)
	}
}
