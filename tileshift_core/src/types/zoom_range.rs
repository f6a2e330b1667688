//! Inclusive zoom level ranges used to select rows from the archive.

use crate::TransferError;
use std::fmt;

/// Highest zoom level a transfer can select.
pub const MAX_ZOOM_LEVEL: u8 = 30;

/// An inclusive range of zoom levels, `min <= max <= MAX_ZOOM_LEVEL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomRange {
	pub min: u8,
	pub max: u8,
}

impl ZoomRange {
	pub fn new(min: u8, max: u8) -> Result<ZoomRange, TransferError> {
		if max > MAX_ZOOM_LEVEL {
			return Err(TransferError::configuration(format!(
				"max zoom ({max}) must be <= {MAX_ZOOM_LEVEL}"
			)));
		}
		if min > max {
			return Err(TransferError::configuration(format!(
				"min zoom ({min}) must be <= max zoom ({max})"
			)));
		}
		Ok(ZoomRange { min, max })
	}

	/// Combines explicit bounds with defaults: each side falls back to `fallback`, then to the full range.
	pub fn resolve(
		min: Option<u8>,
		max: Option<u8>,
		fallback_min: Option<u8>,
		fallback_max: Option<u8>,
	) -> Result<ZoomRange, TransferError> {
		ZoomRange::new(
			min.or(fallback_min).unwrap_or(0),
			max.or(fallback_max).unwrap_or(MAX_ZOOM_LEVEL),
		)
	}

	#[must_use]
	pub fn contains(&self, zoom_level: u8) -> bool {
		(self.min..=self.max).contains(&zoom_level)
	}
}

impl fmt::Display for ZoomRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..={}", self.min, self.max)
	}
}
