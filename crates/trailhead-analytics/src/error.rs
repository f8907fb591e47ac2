// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics client.

use thiserror::Error;
use trailhead_analytics_core::EventNameError;
use trailhead_common_http::HttpError;

/// Analytics errors.
#[derive(Debug, Error)]
pub enum AnalyticsError {
	/// The event name failed validation; nothing was queued.
	#[error("event validation failed: {0}")]
	ValidationFailed(#[from] EventNameError),

	/// The client has been destroyed.
	#[error("client has been shut down")]
	ClientShutdown,

	/// Called outside a Tokio runtime, so no flush could be scheduled.
	#[error("no Tokio runtime available")]
	RuntimeUnavailable,

	/// Delivering a batch failed.
	#[error(transparent)]
	Http(#[from] HttpError),
}

impl AnalyticsError {
	/// Returns true if the failure was an explicit abort.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, AnalyticsError::Http(e) if e.is_cancelled())
	}
}

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
