// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable loading for SDK configuration.
//!
//! The API key may be provided directly (`TRAILHEAD_API_KEY`) or through a
//! file path (`TRAILHEAD_API_KEY_FILE`), the convention used by Docker and
//! Kubernetes secret mounts. When both are set the file wins.

use std::path::PathBuf;
use std::{env, fs};

use zeroize::Zeroizing;

use crate::api_key::ApiKey;
use crate::error::{ConfigError, Result};

/// Variable holding the API key.
pub const API_KEY_VAR: &str = "TRAILHEAD_API_KEY";

/// Variable holding the API base URL.
pub const BASE_URL_VAR: &str = "TRAILHEAD_BASE_URL";

/// Configuration values discovered in the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
	pub api_key: Option<ApiKey>,
	pub base_url: Option<String>,
}

impl EnvConfig {
	/// Reads [`API_KEY_VAR`] (or its `_FILE` form) and [`BASE_URL_VAR`].
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			api_key: load_api_key(API_KEY_VAR)?,
			base_url: load_plain(BASE_URL_VAR),
		})
	}
}

/// Loads an API key from `var`, or from the file named by `{var}_FILE`.
///
/// A single trailing newline is stripped from file contents. An empty or
/// whitespace-only value is treated as a configuration error rather than
/// silently ignored.
pub fn load_api_key(var: &str) -> Result<Option<ApiKey>> {
	match load_secret(var)? {
		Some(raw) => ApiKey::new(raw.as_str()).map(Some),
		None => Ok(None),
	}
}

fn load_secret(var: &str) -> Result<Option<Zeroizing<String>>> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(ConfigError::EmptyFilePath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = Zeroizing::new(
			fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?,
		);
		let trimmed = content.strip_suffix('\n').unwrap_or(content.as_str());
		return Ok(Some(Zeroizing::new(trimmed.to_string())));
	}

	Ok(env::var(var).ok().map(Zeroizing::new))
}

fn load_plain(var: &str) -> Option<String> {
	env::var(var).ok().filter(|v| !v.trim().is_empty())
}
