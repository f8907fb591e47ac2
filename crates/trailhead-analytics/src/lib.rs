// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Trailhead analytics: custom event tracking with batched delivery.
//!
//! Events are validated on [`AnalyticsClient::track`] and buffered. A batch is
//! sent when ten events are queued, five seconds after the first one, or on
//! [`AnalyticsClient::flush`]. Failed batches are re-queued at the front of a
//! bounded buffer. On teardown the remainder goes out through a [`Beacon`].

mod batch;
mod beacon;
mod client;
mod error;
mod properties;
mod sender;

pub use batch::{BatchConfig, BatchProcessor, BatchSender};
pub use beacon::{Beacon, HttpBeacon};
pub use client::{AnalyticsClient, AnalyticsClientBuilder};
pub use error::{AnalyticsError, Result};
pub use properties::Properties;
pub use sender::HttpBatchSender;
pub use trailhead_analytics_core::{normalize_event_name, EventNameError, QueuedEvent};
