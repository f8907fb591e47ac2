// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helper for building event properties.

use std::collections::BTreeMap;
use std::fmt::Display;

/// String-valued event properties.
///
/// Values are stored as strings on the wire; anything `Display` is accepted
/// and rendered with `to_string()`.
///
/// # Example
///
/// ```
/// use trailhead_analytics::Properties;
///
/// let props = Properties::new()
///     .insert("button_name", "checkout")
///     .insert("page", "/cart")
///     .insert("price", 99.99)
///     .insert("is_premium", true);
/// assert_eq!(props.get("price"), Some("99.99"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
	inner: BTreeMap<String, String>,
}

impl Properties {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a key-value pair, replacing any previous value for `key`.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Display,
	{
		self.inner.insert(key.into(), value.to_string());
		self
	}

	/// Merges another Properties into this one.
	///
	/// If both contain the same key, the value from `other` takes precedence.
	pub fn merge(mut self, other: Properties) -> Self {
		self.inner.extend(other.inner);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.inner.get(key).map(String::as_str)
	}

	pub fn into_map(self) -> BTreeMap<String, String> {
		self.inner
	}
}

impl From<BTreeMap<String, String>> for Properties {
	fn from(inner: BTreeMap<String, String>) -> Self {
		Self { inner }
	}
}

impl<K, V> FromIterator<(K, V)> for Properties
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			inner: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}
