// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key wrapper that keeps the key out of logs.
//!
//! [`ApiKey`] is the only credential the SDK knows about. It is sent as the
//! `X-API-Key` header on authenticated requests and embedded in the body of
//! teardown beacons. Everywhere else it is redacted:
//!
//! - `Debug` and `Display` print `[REDACTED]`
//! - the backing buffer is zeroized on drop
//! - the raw value is only reachable through [`ApiKey::expose`]
//!
//! ```
//! use trailhead_common_config::ApiKey;
//!
//! let key = ApiKey::new("th_live_abc123").unwrap();
//! assert_eq!(format!("{key}"), "[REDACTED]");
//! assert_eq!(key.expose(), "th_live_abc123");
//! ```

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{ConfigError, Result};

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

/// A validated, non-empty API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
	inner: Zeroizing<String>,
}

impl ApiKey {
	/// Wraps a key, rejecting empty and whitespace-only values.
	pub fn new(key: impl Into<String>) -> Result<Self> {
		let key = Zeroizing::new(key.into());
		if key.trim().is_empty() {
			return Err(ConfigError::MissingApiKey);
		}
		Ok(Self { inner: key })
	}

	/// Returns the raw key.
	///
	/// Call sites opt in to seeing the key, which keeps every use visible in review.
	pub fn expose(&self) -> &str {
		&self.inner
	}
}

impl fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ApiKey").field(&REDACTED).finish()
	}
}

impl fmt::Display for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl std::str::FromStr for ApiKey {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self> {
		Self::new(s)
	}
}
