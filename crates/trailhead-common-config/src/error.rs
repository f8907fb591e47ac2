// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling SDK configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The API key was absent, empty or whitespace-only.
	#[error("API key is required and must be non-empty")]
	MissingApiKey,

	/// A `*_FILE` variable was set to an empty path.
	#[error("secret file path in {var} is empty")]
	EmptyFilePath { var: String },

	/// The file named by a `*_FILE` variable could not be read.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

pub type Result<T> = std::result::Result<T, ConfigError>;
