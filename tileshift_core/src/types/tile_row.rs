//! A single row of the `tiles` table.

use crate::Blob;
use std::fmt::{self, Debug};

/// One tile as stored in the archive, using the archive's bottom-up (TMS) row numbering.
#[derive(Clone, PartialEq, Eq)]
pub struct TileRow {
	pub zoom_level: u8,
	pub tile_column: u32,
	pub tile_row: u32,
	pub tile_data: Blob,
}

impl TileRow {
	#[must_use]
	pub fn new(zoom_level: u8, tile_column: u32, tile_row: u32, tile_data: Blob) -> TileRow {
		TileRow {
			zoom_level,
			tile_column,
			tile_row,
			tile_data,
		}
	}
}

impl Debug for TileRow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"TileRow({}, [{}, {}], {} bytes)",
			self.zoom_level,
			self.tile_column,
			self.tile_row,
			self.tile_data.len()
		)
	}
}
