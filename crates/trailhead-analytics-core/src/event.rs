// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event naming rules and the queued event type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace every tracked event name lives under.
pub const CUSTOM_PREFIX: &str = "custom.";

/// Why an event name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventNameError {
	#[error("event name must not be empty")]
	Empty,

	#[error("event name {0:?} must match custom.[a-z0-9_]+")]
	InvalidCharacters(String),
}

/// Validates an event name and applies the `custom.` prefix.
///
/// `signup` becomes `custom.signup`; `custom.purchase` is kept as-is. After
/// prefixing, the name must be `custom.` followed by one or more of
/// `[a-z0-9_]`. Names are not trimmed, so surrounding whitespace is rejected.
pub fn normalize_event_name(name: &str) -> Result<String, EventNameError> {
	if name.trim().is_empty() {
		return Err(EventNameError::Empty);
	}

	let normalized = if name.starts_with(CUSTOM_PREFIX) {
		name.to_string()
	} else {
		format!("{CUSTOM_PREFIX}{name}")
	};

	let suffix = &normalized[CUSTOM_PREFIX.len()..];
	let valid = !suffix.is_empty()
		&& suffix
			.bytes()
			.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
	if !valid {
		return Err(EventNameError::InvalidCharacters(normalized));
	}

	Ok(normalized)
}

/// A validated event waiting to be flushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedEvent {
	pub event_type: String,
	#[serde(default)]
	pub properties: BTreeMap<String, String>,
}

impl QueuedEvent {
	/// Validates `name` and builds the event.
	pub fn new(
		name: &str,
		properties: BTreeMap<String, String>,
	) -> Result<Self, EventNameError> {
		Ok(Self {
			event_type: normalize_event_name(name)?,
			properties,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn bare_name_is_prefixed() {
		assert_eq!(normalize_event_name("signup").unwrap(), "custom.signup");
	}

	#[test]
	fn prefixed_name_is_not_double_prefixed() {
		assert_eq!(
			normalize_event_name("custom.purchase").unwrap(),
			"custom.purchase"
		);
	}

	#[test]
	fn digits_and_underscores_are_allowed() {
		assert_eq!(
			normalize_event_name("level_2_done").unwrap(),
			"custom.level_2_done"
		);
	}

	#[test]
	fn empty_and_whitespace_names_are_rejected() {
		for name in ["", " ", "\t\n"] {
			assert_eq!(normalize_event_name(name), Err(EventNameError::Empty));
		}
	}

	#[test]
	fn out_of_alphabet_names_are_rejected() {
		for name in [
			"SignUp",
			"sign-up",
			"sign up",
			" signup",
			"custom.",
			"custom.a.b",
			"custom.Purchase",
			"événement",
		] {
			assert!(
				matches!(
					normalize_event_name(name),
					Err(EventNameError::InvalidCharacters(_))
				),
				"{name:?} should be rejected"
			);
		}
	}

	#[test]
	fn queued_event_serializes_to_wire_shape() {
		let event = QueuedEvent::new(
			"signup",
			BTreeMap::from([("plan".to_string(), "pro".to_string())]),
		)
		.unwrap();
		assert_eq!(
			serde_json::to_value(&event).unwrap(),
			serde_json::json!({"event_type": "custom.signup", "properties": {"plan": "pro"}})
		);
	}

	proptest! {
		#[test]
		fn valid_suffixes_normalize_with_one_prefix(suffix in "[a-z0-9_]{1,32}") {
			let bare = normalize_event_name(&suffix).unwrap();
			let prefixed = normalize_event_name(&format!("custom.{suffix}")).unwrap();
			prop_assert_eq!(&bare, &prefixed);
			prop_assert_eq!(bare, format!("custom.{suffix}"));
		}

		#[test]
		fn normalized_names_always_match_the_pattern(name in "\\PC{0,24}") {
			if let Ok(normalized) = normalize_event_name(&name) {
				let suffix = normalized.strip_prefix(CUSTOM_PREFIX).unwrap();
				prop_assert!(!suffix.is_empty());
				prop_assert!(suffix.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_'));
			}
		}

		#[test]
		fn uppercase_is_always_rejected(suffix in "[a-z]{0,8}[A-Z][a-z]{0,8}") {
			prop_assert!(normalize_event_name(&suffix).is_err());
		}
	}
}
