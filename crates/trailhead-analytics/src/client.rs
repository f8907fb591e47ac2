// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The analytics client and its builder.

use std::sync::Arc;

use tracing::info;
use trailhead_analytics_core::QueuedEvent;
use trailhead_common_config::ApiKey;
use trailhead_common_http::{ApiClient, RetryConfig};

use crate::batch::{BatchConfig, BatchProcessor};
use crate::beacon::{Beacon, HttpBeacon};
use crate::error::Result;
use crate::properties::Properties;
use crate::sender::HttpBatchSender;

/// Builder for [`AnalyticsClient`].
///
/// Either pass a shared [`ApiClient`] with [`api_client`](Self::api_client),
/// or an API key (and optionally a base URL) to create a dedicated one.
#[derive(Default)]
pub struct AnalyticsClientBuilder {
	api_client: Option<Arc<ApiClient>>,
	api_key: Option<ApiKey>,
	base_url: Option<String>,
	retry_config: Option<RetryConfig>,
	batch_config: BatchConfig,
	beacon: Option<Arc<dyn Beacon>>,
}

impl AnalyticsClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reuses an existing request client, sharing its cancellation session.
	pub fn api_client(mut self, api: Arc<ApiClient>) -> Self {
		self.api_client = Some(api);
		self
	}

	pub fn api_key(mut self, key: ApiKey) -> Self {
		self.api_key = Some(key);
		self
	}

	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = Some(config);
		self
	}

	pub fn batch_config(mut self, config: BatchConfig) -> Self {
		self.batch_config = config;
		self
	}

	/// Replaces the teardown beacon.
	pub fn beacon(mut self, beacon: Arc<dyn Beacon>) -> Self {
		self.beacon = Some(beacon);
		self
	}

	pub fn build(self) -> Result<AnalyticsClient> {
		let api = match self.api_client {
			Some(api) => api,
			None => {
				let mut builder = ApiClient::builder();
				if let Some(key) = self.api_key {
					builder = builder.api_key(key);
				}
				if let Some(url) = self.base_url {
					builder = builder.base_url(url);
				}
				if let Some(retry) = self.retry_config {
					builder = builder.retry_config(retry);
				}
				Arc::new(builder.build()?)
			}
		};

		let beacon: Arc<dyn Beacon> = match self.beacon {
			Some(beacon) => beacon,
			None => Arc::new(HttpBeacon::new(api.base_url(), api.api_key().clone())),
		};

		info!(
			base_url = %api.base_url(),
			max_batch_size = self.batch_config.max_batch_size,
			"Analytics client initialized"
		);

		let sender = Arc::new(HttpBatchSender::new(Arc::clone(&api)));
		let processor = Arc::new(BatchProcessor::new(self.batch_config, sender, beacon));

		Ok(AnalyticsClient { processor, api })
	}
}

/// Tracks custom events and delivers them in batches.
///
/// Must be used inside a Tokio runtime. Dropping the client without calling
/// [`destroy`](Self::destroy) performs the same teardown delivery.
///
/// # Example
///
/// ```ignore
/// let analytics = AnalyticsClient::builder()
///     .api_key(ApiKey::new("th_live_abc123")?)
///     .build()?;
///
/// analytics.track("signup", Properties::new().insert("plan", "pro"))?;
/// analytics.flush().await?;
/// ```
pub struct AnalyticsClient {
	processor: Arc<BatchProcessor>,
	api: Arc<ApiClient>,
}

impl AnalyticsClient {
	pub fn builder() -> AnalyticsClientBuilder {
		AnalyticsClientBuilder::new()
	}

	/// Validates and queues an event.
	///
	/// `signup` is recorded as `custom.signup`. Invalid names fail here and
	/// are never queued.
	pub fn track(&self, name: &str, properties: Properties) -> Result<()> {
		let event = QueuedEvent::new(name, properties.into_map())?;
		self.processor.enqueue(event)
	}

	/// Sends all queued events now. On failure they stay queued.
	pub async fn flush(&self) -> Result<()> {
		self.processor.flush().await
	}

	/// Hands pending events to the beacon and stops accepting new ones.
	pub fn destroy(&self) {
		self.processor.destroy();
	}

	pub fn is_destroyed(&self) -> bool {
		self.processor.is_shutdown()
	}

	pub fn queue_len(&self) -> usize {
		self.processor.queue_len()
	}

	pub fn api_client(&self) -> &Arc<ApiClient> {
		&self.api
	}
}

impl Drop for AnalyticsClient {
	fn drop(&mut self) {
		self.processor.destroy();
	}
}
