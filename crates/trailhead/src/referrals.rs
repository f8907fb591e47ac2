// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Referral codes: fetch a user's code and claim someone else's.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use trailhead_common_http::ApiClient;

use crate::error::{require, Result};

pub const REFERRAL_CODE_PATH: &str = "/v1/api/referrals/code";
pub const REFERRAL_CLAIM_PATH: &str = "/v1/api/referrals/claim";

/// A user's shareable referral code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferralCode {
	pub code: String,
	#[serde(default)]
	pub url: Option<String>,
}

/// Outcome of claiming a referral code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimResult {
	pub ok: bool,
	#[serde(default)]
	pub reward: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ClaimRequest<'a> {
	code: &'a str,
	user_id: &'a str,
}

/// Referral operations, borrowed from [`Trailhead::referrals`](crate::Trailhead::referrals).
pub struct Referrals<'a> {
	api: &'a ApiClient,
}

impl<'a> Referrals<'a> {
	pub(crate) fn new(api: &'a ApiClient) -> Self {
		Self { api }
	}

	/// Returns (creating if needed) the referral code for `user_id`.
	pub async fn referral_code(&self, user_id: &str) -> Result<ReferralCode> {
		require(user_id, "user_id")?;
		let code: ReferralCode = self
			.api
			.authenticated_get(REFERRAL_CODE_PATH, &[("user_id", user_id)])
			.await?;
		debug!(code = %code.code, "Fetched referral code");
		Ok(code)
	}

	/// Claims `code` on behalf of `user_id`.
	pub async fn claim_referral(&self, code: &str, user_id: &str) -> Result<ClaimResult> {
		require(code, "code")?;
		require(user_id, "user_id")?;
		let result: ClaimResult = self
			.api
			.authenticated_post(REFERRAL_CLAIM_PATH, Some(&ClaimRequest { code, user_id }))
			.await?;
		debug!(code, ok = result.ok, "Claimed referral code");
		Ok(result)
	}
}
