// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The SDK-level error type.

use thiserror::Error;
use trailhead_analytics::AnalyticsError;
use trailhead_common_config::ConfigError;
use trailhead_common_http::HttpError;

/// Any error returned by [`Trailhead`](crate::Trailhead).
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Http(#[from] HttpError),

	#[error(transparent)]
	Analytics(#[from] AnalyticsError),

	/// A required argument was empty.
	#[error("{0} must not be empty")]
	InvalidArgument(&'static str),
}

impl Error {
	/// Returns true if the request was aborted with [`Trailhead::abort`](crate::Trailhead::abort).
	pub fn is_cancelled(&self) -> bool {
		match self {
			Error::Http(e) => e.is_cancelled(),
			Error::Analytics(e) => e.is_cancelled(),
			_ => false,
		}
	}

	/// Returns the HTTP status of a server error response, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Http(e) => e.status(),
			Error::Analytics(AnalyticsError::Http(e)) => e.status(),
			_ => None,
		}
	}
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn require(value: &str, name: &'static str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidArgument(name));
	}
	Ok(())
}
