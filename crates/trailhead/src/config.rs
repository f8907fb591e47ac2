// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration and the [`TrailheadBuilder`].

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use trailhead_analytics::{AnalyticsClient, BatchConfig, Beacon};
use trailhead_common_config::{ApiKey, ConfigError, EnvConfig};
use trailhead_common_http::{
	ApiClient, RetryConfig, Transport, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT,
};

use crate::client::Trailhead;
use crate::error::Result;

/// Tunables shared by every part of the SDK.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub base_url: String,
	/// Timeout for each network attempt.
	pub request_timeout: Duration,
	pub retry: RetryConfig,
	pub batch: BatchConfig,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			retry: RetryConfig::default(),
			batch: BatchConfig::default(),
		}
	}
}

/// Builder for [`Trailhead`].
///
/// # Example
///
/// ```ignore
/// let trailhead = Trailhead::builder()
///     .api_key(ApiKey::new("th_live_abc123")?)
///     .build()?;
/// ```
#[derive(Default)]
pub struct TrailheadBuilder {
	api_key: Option<ApiKey>,
	config: ClientConfig,
	transport: Option<Arc<dyn Transport>>,
	beacon: Option<Arc<dyn Beacon>>,
}

impl TrailheadBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts from `TRAILHEAD_API_KEY` (or `TRAILHEAD_API_KEY_FILE`) and
	/// `TRAILHEAD_BASE_URL`. Later builder calls override them.
	pub fn from_env() -> Result<Self> {
		let env = EnvConfig::from_env()?;
		let mut builder = Self::new();
		builder.api_key = env.api_key;
		if let Some(url) = env.base_url {
			builder.config.base_url = url;
		}
		Ok(builder)
	}

	pub fn api_key(mut self, key: ApiKey) -> Self {
		self.api_key = Some(key);
		self
	}

	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.config.base_url = url.into();
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	pub fn retry_config(mut self, retry: RetryConfig) -> Self {
		self.config.retry = retry;
		self
	}

	pub fn batch_config(mut self, batch: BatchConfig) -> Self {
		self.config.batch = batch;
		self
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;
		self
	}

	/// Replaces the network transport used by the request layer.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Replaces the teardown beacon used by analytics.
	pub fn beacon(mut self, beacon: Arc<dyn Beacon>) -> Self {
		self.beacon = Some(beacon);
		self
	}

	pub fn build(self) -> Result<Trailhead> {
		let api_key = self.api_key.ok_or(ConfigError::MissingApiKey)?;

		let mut api = ApiClient::builder()
			.api_key(api_key)
			.base_url(self.config.base_url)
			.request_timeout(self.config.request_timeout)
			.retry_config(self.config.retry);
		if let Some(transport) = self.transport {
			api = api.transport(transport);
		}
		let api = Arc::new(api.build()?);

		let mut analytics = AnalyticsClient::builder()
			.api_client(Arc::clone(&api))
			.batch_config(self.config.batch);
		if let Some(beacon) = self.beacon {
			analytics = analytics.beacon(beacon);
		}
		let analytics = analytics.build()?;

		info!(base_url = %api.base_url(), "Trailhead client initialized");
		Ok(Trailhead::new(api, analytics))
	}
}
