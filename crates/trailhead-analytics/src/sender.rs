// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Batch delivery over the authenticated POST entry point.

use std::sync::Arc;

use tracing::{debug, warn};
use trailhead_analytics_core::{BatchRequest, BatchResponse, QueuedEvent, BATCH_PATH};
use trailhead_common_http::ApiClient;

use crate::batch::BatchSender;
use crate::error::Result;

/// [`BatchSender`] posting to the batch endpoint through [`ApiClient`], so
/// deliveries get retries and join the client's cancellation session.
pub struct HttpBatchSender {
	api: Arc<ApiClient>,
}

impl HttpBatchSender {
	pub fn new(api: Arc<ApiClient>) -> Self {
		Self { api }
	}
}

#[async_trait::async_trait]
impl BatchSender for HttpBatchSender {
	async fn send_batch(&self, events: &[QueuedEvent]) -> Result<()> {
		let response: BatchResponse = self
			.api
			.authenticated_post(BATCH_PATH, Some(&BatchRequest { events }))
			.await?;

		if !response.errors.is_empty() {
			warn!(
				count = events.len(),
				accepted = ?response.accepted,
				errors = ?response.errors,
				"Server reported errors for some events"
			);
		}
		if !response.ok {
			warn!(count = events.len(), "Server did not acknowledge batch");
		}
		debug!(count = events.len(), accepted = ?response.accepted, "Batch delivered");
		Ok(())
	}
}
