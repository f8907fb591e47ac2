// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The retry loop for one logical request.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::backoff::{classify, parse_retry_after, RetryConfig, StatusClass};
use crate::error::{HttpError, Result};
use crate::transport::{HttpResponse, RequestDescriptor, Transport};

/// Issues a request, retrying transient failures per [`RetryConfig`].
///
/// - transport failures are retried until attempts run out, then returned
/// - 2xx and non-retryable statuses are returned untouched on the first attempt
/// - 429 and 5xx are retried; once attempts run out the last response is
///   returned as-is for the caller to interpret
/// - cancellation aborts the in-flight call or the pending delay immediately
///   and is never retried
pub struct RequestExecutor {
	transport: Arc<dyn Transport>,
	retry: RetryConfig,
}

impl RequestExecutor {
	pub fn new(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
		Self { transport, retry }
	}

	pub async fn execute(&self, request: &RequestDescriptor) -> Result<HttpResponse> {
		let cancel = &request.cancel;
		if cancel.is_cancelled() {
			return Err(HttpError::Cancelled);
		}

		let mut attempt: u32 = 0;

		loop {
			debug!(
				method = %request.method,
				url = %request.url,
				attempt,
				"Sending request"
			);

			let outcome = tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(HttpError::Cancelled),
				outcome = self.transport.send(request) => outcome,
			};

			let retry_after = match outcome {
				Err(err) => {
					if !err.is_transient() {
						return Err(err.into());
					}
					if attempt >= self.retry.max_retries {
						warn!(
							error = %err,
							attempts = attempt + 1,
							"Request failed, retries exhausted"
						);
						return Err(err.into());
					}
					warn!(error = %err, attempt, "Request failed, will retry");
					None
				}
				Ok(response) => match classify(response.status) {
					StatusClass::Success | StatusClass::Terminal => return Ok(response),
					StatusClass::Retryable => {
						if attempt >= self.retry.max_retries {
							warn!(
								status = response.status.as_u16(),
								attempts = attempt + 1,
								"Retryable status, retries exhausted"
							);
							return Ok(response);
						}
						if response.status == StatusCode::TOO_MANY_REQUESTS {
							parse_retry_after(&response.headers)
						} else {
							None
						}
					}
				},
			};

			let delay = self.retry.delay_for(attempt, retry_after);
			warn!(
				url = %request.url,
				attempt,
				delay_ms = delay.as_millis() as u64,
				rate_limited = retry_after.is_some(),
				"Retrying request"
			);

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(HttpError::Cancelled),
				_ = tokio::time::sleep(delay) => {}
			}

			attempt += 1;
		}
	}
}
