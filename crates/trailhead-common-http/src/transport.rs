// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request/response values and the network seam used by the executor.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

/// Everything needed to issue one logical request.
///
/// The body is an immutable buffer so each retry resends identical bytes.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
	pub method: Method,
	pub url: String,
	pub headers: HeaderMap,
	pub body: Option<Bytes>,
	pub cancel: CancellationToken,
}

impl RequestDescriptor {
	pub fn new(method: Method, url: impl Into<String>, cancel: CancellationToken) -> Self {
		Self {
			method,
			url: url.into(),
			headers: HeaderMap::new(),
			body: None,
			cancel,
		}
	}

	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = Some(body.into());
		self
	}
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl HttpResponse {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}
}

/// Issues a single network attempt.
///
/// Implementations do not retry and do not watch the cancellation token; the
/// executor races every call against it and drops the future on abort.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: &RequestDescriptor) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: Client,
}

impl ReqwestTransport {
	/// Builds a client with the SDK User-Agent and the given request timeout.
	pub fn new(timeout: Duration) -> Result<Self, TransportError> {
		let client = crate::client::builder().timeout(timeout).build()?;
		Ok(Self { client })
	}
}

#[async_trait]
impl Transport for ReqwestTransport {
	async fn send(&self, request: &RequestDescriptor) -> Result<HttpResponse, TransportError> {
		let mut builder = self
			.client
			.request(request.method.clone(), &request.url)
			.headers(request.headers.clone());
		if let Some(body) = &request.body {
			builder = builder.body(body.clone());
		}

		let response = builder.send().await?;
		let status = response.status();
		let headers = response.headers().clone();
		let body = response.bytes().await?;

		Ok(HttpResponse {
			status,
			headers,
			body,
		})
	}
}
