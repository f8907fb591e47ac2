// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared types for Trailhead analytics.
//!
//! - [`normalize_event_name`]: the `custom.` naming rule applied by `track()`
//! - [`QueuedEvent`]: one validated event waiting in the batch queue
//! - [`BatchRequest`], [`BatchResponse`], [`BeaconPayload`]: batch endpoint bodies

pub mod event;
pub mod payload;

pub use event::{normalize_event_name, EventNameError, QueuedEvent, CUSTOM_PREFIX};
pub use payload::{BatchRequest, BatchResponse, BeaconPayload, BATCH_PATH};
