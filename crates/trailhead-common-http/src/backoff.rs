// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Retry policy: status classification and backoff delays.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;

/// Base delay before the first retry, in milliseconds.
pub const BASE_DELAY_MS: u64 = 500;
/// Upper bound (exclusive) of the random jitter added to each delay.
pub const MAX_JITTER_MS: u64 = 250;
/// Retries after the original attempt.
pub const MAX_RETRIES: u32 = 3;

/// Source of the random component added to exponential backoff.
///
/// Injected so tests can make delays deterministic.
pub trait JitterSource: fmt::Debug + Send + Sync {
	/// Returns a duration in `[0, max)`.
	fn sample(&self, max: Duration) -> Duration;
}

/// Uniform jitter drawn from `fastrand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
	fn sample(&self, max: Duration) -> Duration {
		let max_ms = max.as_millis() as u64;
		if max_ms == 0 {
			return Duration::ZERO;
		}
		Duration::from_millis(fastrand::u64(0..max_ms))
	}
}

/// Always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
	fn sample(&self, _max: Duration) -> Duration {
		Duration::ZERO
	}
}

/// A constant jitter, capped at the configured maximum.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl JitterSource for FixedJitter {
	fn sample(&self, max: Duration) -> Duration {
		self.0.min(max)
	}
}

/// Retry/backoff configuration.
///
/// Defaults give four attempts in total, waiting `500ms * 2^n` plus up to
/// 250ms of jitter before retry `n`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
	pub max_retries: u32,
	pub base_delay: Duration,
	pub max_jitter: Duration,
	pub jitter: Arc<dyn JitterSource>,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: MAX_RETRIES,
			base_delay: Duration::from_millis(BASE_DELAY_MS),
			max_jitter: Duration::from_millis(MAX_JITTER_MS),
			jitter: Arc::new(RandomJitter),
		}
	}
}

impl RetryConfig {
	/// A single attempt, no retries.
	pub fn disabled() -> Self {
		Self {
			max_retries: 0,
			..Default::default()
		}
	}

	/// Replaces the jitter source.
	pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
		self.jitter = Arc::new(jitter);
		self
	}

	/// Total network attempts for one logical request.
	pub fn max_attempts(&self) -> u32 {
		self.max_retries.saturating_add(1)
	}

	/// Delay to wait after attempt `attempt` (0-based) failed.
	///
	/// A server rate-limit hint is used verbatim, with neither exponential
	/// growth nor jitter.
	pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
		if let Some(hint) = retry_after {
			return hint;
		}

		let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
		self.base_delay
			.saturating_mul(factor)
			.saturating_add(self.jitter.sample(self.max_jitter))
	}
}

/// How the executor treats a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
	/// 2xx.
	Success,
	/// 429 or any 5xx.
	Retryable,
	/// Everything else; returned to the caller without retrying.
	Terminal,
}

/// Classifies a response status for the retry loop.
pub fn classify(status: StatusCode) -> StatusClass {
	if status.is_success() {
		StatusClass::Success
	} else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
		StatusClass::Retryable
	} else {
		StatusClass::Terminal
	}
}

/// Parses a `Retry-After` header given as integer seconds.
///
/// HTTP-date values and garbage are ignored, so the caller falls back to
/// exponential backoff.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	headers
		.get(RETRY_AFTER)?
		.to_str()
		.ok()?
		.trim()
		.parse::<u64>()
		.ok()
		.map(Duration::from_secs)
}
