//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] holding the raw bytes of one tile.
//!
//! # Examples
//!
//! ```rust
//! use tileshift_core::Blob;
//!
//! let blob = Blob::from(vec![0, 1, 2, 3]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_slice(), &[0, 1, 2, 3]);
//! assert_eq!(blob.into_vec(), vec![0, 1, 2, 3]);
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`] for tile data.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns a reference to the underlying bytes.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	/// Consumes the `Blob` and returns the underlying vector.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the number of bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	/// Returns `true` if the `Blob` holds no bytes.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

/// Prints the byte length and at most the first 16 bytes as hex.
impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let head = self
			.0
			.iter()
			.take(16)
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<_>>()
			.join(" ");
		if self.0.len() > 16 {
			write!(f, "Blob({}): {head} …", self.0.len())
		} else {
			write!(f, "Blob({}): {head}", self.0.len())
		}
	}
}
