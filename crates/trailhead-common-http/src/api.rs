// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed JSON entry points over the request executor.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use trailhead_common_config::{ApiKey, ConfigError};
use url::Url;

use crate::backoff::RetryConfig;
use crate::cancel::CancellationBroker;
use crate::error::{ApiError, HttpError, Result};
use crate::executor::RequestExecutor;
use crate::transport::{HttpResponse, ReqwestTransport, RequestDescriptor, Transport};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.trailhead.dev";

/// Header carrying the API key on authenticated requests (`X-API-Key` on the
/// wire; header names are case-insensitive and stored lowercase).
pub const API_KEY_HEADER: &str = "x-api-key";

fn api_key_header_name() -> HeaderName {
	HeaderName::from_static(API_KEY_HEADER)
}

/// Message used when a successful response carries an unparsable body.
pub const INVALID_JSON_MESSAGE: &str = "invalid JSON in response body";

/// Default per-attempt request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
	api_key: Option<ApiKey>,
	base_url: Option<String>,
	request_timeout: Duration,
	retry_config: RetryConfig,
	transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
	pub fn new() -> Self {
		Self {
			api_key: None,
			base_url: None,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			retry_config: RetryConfig::default(),
			transport: None,
		}
	}

	/// Sets the API key sent as `X-API-Key`.
	pub fn api_key(mut self, key: ApiKey) -> Self {
		self.api_key = Some(key);
		self
	}

	/// Sets the API base URL. Defaults to [`DEFAULT_BASE_URL`].
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	/// Sets the timeout applied to each network attempt.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	/// Replaces the reqwest transport, e.g. with a scripted one in tests.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn build(self) -> Result<ApiClient> {
		let api_key = self.api_key.ok_or(ConfigError::MissingApiKey)?;
		let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

		let mut api_key_header =
			HeaderValue::from_str(api_key.expose()).map_err(|_| HttpError::InvalidApiKey)?;
		api_key_header.set_sensitive(true);

		let transport: Arc<dyn Transport> = match self.transport {
			Some(transport) => transport,
			None => Arc::new(ReqwestTransport::new(self.request_timeout)?),
		};

		info!(
			base_url = %base_url,
			max_retries = self.retry_config.max_retries,
			"API client initialized"
		);

		Ok(ApiClient {
			base_url,
			api_key,
			api_key_header,
			executor: RequestExecutor::new(transport, self.retry_config),
			cancellation: CancellationBroker::new(),
		})
	}
}

impl Default for ApiClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// JSON request facade with four entry points.
///
/// | Method                 | `X-API-Key` | `Content-Type` |
/// |------------------------|-------------|----------------|
/// | `authenticated_get`    | yes         | no             |
/// | `authenticated_post`   | yes         | yes            |
/// | `public_get`           | no          | no             |
/// | `public_post`          | no          | yes            |
///
/// All four retry through the shared [`RequestExecutor`] and join the
/// client's cancellation session; [`cancel_all`](Self::cancel_all) aborts
/// every request in flight.
pub struct ApiClient {
	base_url: String,
	api_key: ApiKey,
	api_key_header: HeaderValue,
	executor: RequestExecutor,
	cancellation: CancellationBroker,
}

impl ApiClient {
	pub fn builder() -> ApiClientBuilder {
		ApiClientBuilder::new()
	}

	/// The normalized base URL, without trailing slashes.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn api_key(&self) -> &ApiKey {
		&self.api_key
	}

	/// Joins `path` onto the base URL.
	pub fn url(&self, path: &str) -> String {
		if path.starts_with('/') {
			format!("{}{}", self.base_url, path)
		} else {
			format!("{}/{}", self.base_url, path)
		}
	}

	/// Aborts every request issued since the previous call.
	pub fn cancel_all(&self) {
		self.cancellation.cancel_all();
	}

	pub async fn authenticated_get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = self.get_request(path, query, true);
		self.dispatch(request).await
	}

	pub async fn authenticated_post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let request = self.post_request(path, body, true)?;
		self.dispatch(request).await
	}

	pub async fn public_get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = self.get_request(path, query, false);
		self.dispatch(request).await
	}

	pub async fn public_post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let request = self.post_request(path, body, false)?;
		self.dispatch(request).await
	}

	fn get_request(
		&self,
		path: &str,
		query: &[(&str, &str)],
		authenticated: bool,
	) -> RequestDescriptor {
		let mut url = self.url(path);
		let query = build_query(query);
		if !query.is_empty() {
			url.push('?');
			url.push_str(&query);
		}

		let request = RequestDescriptor::new(Method::GET, url, self.cancellation.current());
		if authenticated {
			request.with_header(api_key_header_name(), self.api_key_header.clone())
		} else {
			request
		}
	}

	fn post_request<B>(
		&self,
		path: &str,
		body: Option<&B>,
		authenticated: bool,
	) -> Result<RequestDescriptor>
	where
		B: Serialize + ?Sized,
	{
		let mut request =
			RequestDescriptor::new(Method::POST, self.url(path), self.cancellation.current())
				.with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		if authenticated {
			request = request.with_header(api_key_header_name(), self.api_key_header.clone());
		}
		if let Some(body) = body {
			request = request.with_body(serde_json::to_vec(body)?);
		}
		Ok(request)
	}

	async fn dispatch<T>(&self, request: RequestDescriptor) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.executor.execute(&request).await?;
		debug!(
			method = %request.method,
			url = %request.url,
			status = response.status.as_u16(),
			"Received response"
		);
		decode_response(response)
	}
}

/// Validates a base URL and strips its trailing slashes.
///
/// `https://api.example.com///` becomes `https://api.example.com`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
	let trimmed = raw.trim().trim_end_matches('/');
	let parsed =
		Url::parse(trimmed).map_err(|e| HttpError::InvalidBaseUrl(format!("{raw}: {e}")))?;

	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(HttpError::InvalidBaseUrl(format!(
			"{raw}: scheme must be http or https"
		)));
	}
	if parsed.host_str().map_or(true, str::is_empty) {
		return Err(HttpError::InvalidBaseUrl(format!("{raw}: missing host")));
	}

	Ok(trimmed.to_string())
}

/// Encodes `key=value` pairs joined with `&`, percent-encoding each component.
pub fn build_query(params: &[(&str, &str)]) -> String {
	params
		.iter()
		.map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
		.collect::<Vec<_>>()
		.join("&")
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	error: String,
	#[serde(default)]
	code: Option<String>,
}

impl ApiError {
	/// Builds the envelope for a non-success response.
	///
	/// Falls back to the HTTP status line when the body is not a JSON error.
	pub fn from_response(response: &HttpResponse) -> Self {
		let status = response.status.as_u16();
		match serde_json::from_slice::<ErrorBody>(&response.body) {
			Ok(body) => ApiError {
				message: body.error,
				status,
				code: body.code,
			},
			Err(_) => ApiError {
				message: status_line(response.status),
				status,
				code: None,
			},
		}
	}
}

fn status_line(status: StatusCode) -> String {
	match status.canonical_reason() {
		Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
		None => format!("HTTP {}", status.as_u16()),
	}
}

fn decode_response<T>(response: HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	if !response.is_success() {
		let err = ApiError::from_response(&response);
		warn!(
			status = err.status,
			code = ?err.code,
			message = %err.message,
			"API request failed"
		);
		return Err(err.into());
	}

	serde_json::from_slice(&response.body).map_err(|e| {
		warn!(status = response.status.as_u16(), error = %e, "Unparsable success body");
		HttpError::Api(ApiError {
			message: INVALID_JSON_MESSAGE.to_string(),
			status: response.status.as_u16(),
			code: None,
		})
	})
}
