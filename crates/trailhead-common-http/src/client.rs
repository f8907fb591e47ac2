// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! reqwest client construction with the SDK User-Agent.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// SDK name used in the User-Agent.
pub const SDK_NAME: &str = "trailhead-rust";
/// SDK version used in the User-Agent.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a client builder with the SDK User-Agent and connect timeout.
///
/// # Example
/// ```ignore
/// let client = trailhead_common_http::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.connect_timeout(DEFAULT_CONNECT_TIMEOUT)
}

/// Returns the SDK User-Agent string.
///
/// Format: `trailhead-rust/{version}`
pub fn user_agent() -> String {
	format!("{SDK_NAME}/{SDK_VERSION}")
}
