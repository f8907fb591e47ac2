// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the HTTP request layer.

use thiserror::Error;
use trailhead_common_config::ConfigError;

/// A failure before any HTTP response was received.
#[derive(Debug, Error)]
pub enum TransportError {
	/// The reqwest call failed (DNS, connect, reset, timeout, body read).
	#[error("HTTP request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// A non-reqwest transport could not reach the server.
	#[error("connection failed: {0}")]
	Connection(String),
}

impl TransportError {
	/// Returns true if another attempt could plausibly succeed.
	///
	/// Only a request that reqwest refused to build is permanent; every
	/// network-level failure is worth retrying.
	pub fn is_transient(&self) -> bool {
		match self {
			TransportError::Request(e) => !e.is_builder(),
			TransportError::Connection(_) => true,
		}
	}
}

/// The error envelope for a non-success response.
///
/// Built from a `{"error": "...", "code": "..."}` body when the server sends
/// one, and from the HTTP status line otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (HTTP {status})")]
pub struct ApiError {
	pub message: String,
	pub status: u16,
	pub code: Option<String>,
}

/// Errors surfaced by the request layer.
#[derive(Debug, Error)]
pub enum HttpError {
	/// The request observed an aborted cancellation session.
	#[error("request cancelled")]
	Cancelled,

	/// Network failure, after retries were exhausted.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The server answered with a non-success status, or with an unreadable
	/// body on a success status.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// The configured base URL is not an absolute http/https URL.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// The API key cannot be sent as an HTTP header value.
	#[error("API key contains characters not allowed in an HTTP header")]
	InvalidApiKey,

	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The request body could not be serialized to JSON.
	#[error("failed to serialize request body: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl HttpError {
	/// Returns true for cancellation, so callers can ignore intentional teardown.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, HttpError::Cancelled)
	}

	/// Returns the HTTP status carried by an [`ApiError`], if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			HttpError::Api(e) => Some(e.status),
			_ => None,
		}
	}

	/// Returns the machine-readable error code sent by the server, if any.
	pub fn code(&self) -> Option<&str> {
		match self {
			HttpError::Api(e) => e.code.as_deref(),
			_ => None,
		}
	}
}

/// Result type alias for request-layer operations.
pub type Result<T> = std::result::Result<T, HttpError>;
