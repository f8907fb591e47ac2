// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared cancellation session for in-flight requests.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns the cancellation token shared by every request of one client.
///
/// All requests issued between two [`cancel_all`](Self::cancel_all) calls join
/// the same token, so one call aborts all of them. The cancelled token is
/// dropped and the next request lazily starts a fresh session, unaffected by
/// the earlier abort.
#[derive(Debug, Default)]
pub struct CancellationBroker {
	current: Mutex<Option<CancellationToken>>,
}

impl CancellationBroker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the live token, creating one if none exists.
	pub fn current(&self) -> CancellationToken {
		self.current
			.lock()
			.get_or_insert_with(CancellationToken::new)
			.clone()
	}

	/// Cancels the live token, if any, and discards it.
	pub fn cancel_all(&self) {
		if let Some(token) = self.current.lock().take() {
			token.cancel();
			debug!("Cancelled all in-flight requests");
		}
	}

	/// Returns true if a session token currently exists.
	pub fn has_session(&self) -> bool {
		self.current.lock().is_some()
	}
}
