// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK for the Trailhead deep-linking and attribution API.
//!
//! ```ignore
//! use trailhead::{ApiKey, Properties, Trailhead};
//!
//! let trailhead = Trailhead::builder()
//!     .api_key(ApiKey::new("th_live_abc123")?)
//!     .build()?;
//!
//! trailhead.track("signup", Properties::new().insert("plan", "pro"))?;
//! let code = trailhead.referrals().referral_code("user_42").await?;
//! let found = trailhead.deferred_links().resolve(&fingerprint).await?;
//!
//! trailhead.destroy();
//! ```
//!
//! Requests retry 429 and 5xx responses and network failures with exponential
//! backoff, honouring `Retry-After` on 429. Analytics events are batched.

mod client;
mod config;
pub mod deferred;
mod error;
pub mod referrals;

pub use client::Trailhead;
pub use config::{ClientConfig, TrailheadBuilder};
pub use deferred::{DeferredLinks, DeferredMatch, LinkInfo};
pub use error::{Error, Result};
pub use referrals::{ClaimResult, ReferralCode, Referrals};

pub use trailhead_analytics::{AnalyticsClient, BatchConfig, Beacon, Properties};
pub use trailhead_common_config::ApiKey;
pub use trailhead_common_http::{HttpError, RetryConfig, Transport};
