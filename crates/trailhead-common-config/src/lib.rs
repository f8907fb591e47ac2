// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration primitives shared by the Trailhead SDK crates.
//!
//! - [`ApiKey`]: a redacted, zeroizing wrapper for the SDK's API key
//! - [`EnvConfig`]: values read from `TRAILHEAD_API_KEY` / `TRAILHEAD_API_KEY_FILE`
//!   and `TRAILHEAD_BASE_URL`

pub mod api_key;
pub mod env;
mod error;

pub use api_key::{ApiKey, REDACTED};
pub use env::{load_api_key, EnvConfig, API_KEY_VAR, BASE_URL_VAR};
pub use error::{ConfigError, Result};
