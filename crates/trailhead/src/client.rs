// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The top-level SDK handle.

use std::sync::Arc;

use tracing::info;
use trailhead_analytics::{AnalyticsClient, Properties};
use trailhead_common_http::ApiClient;

use crate::config::TrailheadBuilder;
use crate::deferred::DeferredLinks;
use crate::error::Result;
use crate::referrals::Referrals;

/// One configured SDK instance.
///
/// All requests, analytics flushes included, share one cancellation session:
/// [`abort`](Self::abort) cancels everything in flight, and later requests
/// start fresh.
pub struct Trailhead {
	api: Arc<ApiClient>,
	analytics: AnalyticsClient,
}

impl Trailhead {
	pub(crate) fn new(api: Arc<ApiClient>, analytics: AnalyticsClient) -> Self {
		Self { api, analytics }
	}

	pub fn builder() -> TrailheadBuilder {
		TrailheadBuilder::new()
	}

	/// Tracks a custom event. See [`AnalyticsClient::track`].
	pub fn track(&self, name: &str, properties: Properties) -> Result<()> {
		Ok(self.analytics.track(name, properties)?)
	}

	/// Sends queued analytics events now.
	pub async fn flush(&self) -> Result<()> {
		Ok(self.analytics.flush().await?)
	}

	pub fn referrals(&self) -> Referrals<'_> {
		Referrals::new(&self.api)
	}

	pub fn deferred_links(&self) -> DeferredLinks<'_> {
		DeferredLinks::new(&self.api)
	}

	/// Cancels every request currently in flight.
	pub fn abort(&self) {
		self.api.cancel_all();
	}

	/// Tears down analytics, handing pending events to the beacon.
	pub fn destroy(&self) {
		info!("Destroying Trailhead client");
		self.analytics.destroy();
	}

	pub fn analytics(&self) -> &AnalyticsClient {
		&self.analytics
	}

	pub fn api_client(&self) -> &Arc<ApiClient> {
		&self.api
	}
}
