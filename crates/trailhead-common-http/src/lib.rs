// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Resilient HTTP request layer for the Trailhead SDK.
//!
//! This crate provides:
//! - [`ApiClient`]: four JSON entry points (authenticated/public, GET/POST)
//! - Retry with exponential backoff, jitter and `Retry-After` support
//! - A shared cancellation session aborting every in-flight request at once
//! - A pre-configured reqwest client with the SDK User-Agent

pub mod api;
pub mod backoff;
pub mod cancel;
mod client;
mod error;
pub mod executor;
pub mod transport;

pub use api::{
	build_query, normalize_base_url, ApiClient, ApiClientBuilder, API_KEY_HEADER,
	DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, INVALID_JSON_MESSAGE,
};
pub use backoff::{
	classify, parse_retry_after, FixedJitter, JitterSource, NoJitter, RandomJitter, RetryConfig,
	StatusClass,
};
pub use cancel::CancellationBroker;
pub use client::{builder, user_agent, SDK_NAME, SDK_VERSION};
pub use error::{ApiError, HttpError, Result, TransportError};
pub use executor::RequestExecutor;
pub use transport::{HttpResponse, ReqwestTransport, RequestDescriptor, Transport};
