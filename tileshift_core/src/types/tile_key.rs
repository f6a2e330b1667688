//! Mapping of archive rows to destination keys.
//!
//! MBTiles numbers rows from the bottom of the pyramid (TMS), while the written tree uses the XYZ
//! layout where row 0 is at the top. The mapper flips the row and builds
//! `{base_path}{zoom}/{column}/{flipped_row}.{extension}`.
//!
//! # Examples
//!
//! ```rust
//! use tileshift_core::{Blob, TileKeyMapper, TileRow};
//!
//! let mapper = TileKeyMapper::new(TileKeyMapper::base_path("tiles", false), "png");
//! let row = TileRow::new(2, 1, 0, Blob::new_empty());
//! assert_eq!(mapper.to_key(&row).unwrap(), "tiles/2/1/3.png");
//! ```

use crate::{TileRow, TransferError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileKeyMapper {
	base_path: String,
	extension: String,
}

impl TileKeyMapper {
	#[must_use]
	pub fn new(base_path: impl Into<String>, extension: impl Into<String>) -> TileKeyMapper {
		TileKeyMapper {
			base_path: base_path.into(),
			extension: extension.into(),
		}
	}

	/// Key prefix for all tiles: `tile_dir` without leading slashes and with a single trailing slash.
	///
	/// Empty when writing to the root or when `tile_dir` consists of slashes only, so keys are
	/// always relative.
	#[must_use]
	pub fn base_path(tile_dir: &str, in_root: bool) -> String {
		let tile_dir = tile_dir.trim_matches('/');
		if in_root || tile_dir.is_empty() {
			String::new()
		} else {
			format!("{tile_dir}/")
		}
	}

	#[must_use]
	pub fn prefix(&self) -> &str {
		&self.base_path
	}

	pub fn to_key(&self, row: &TileRow) -> Result<String, TransferError> {
		let flipped_row = flip_row(row.zoom_level, row.tile_row).ok_or(TransferError::InvalidTile {
			zoom_level: row.zoom_level,
			tile_column: row.tile_column,
			tile_row: row.tile_row,
		})?;
		Ok(format!(
			"{}{}/{}/{}.{}",
			self.base_path, row.zoom_level, row.tile_column, flipped_row, self.extension
		))
	}
}

/// `2^zoom - 1 - row`, or `None` if the row does not exist at that zoom level.
fn flip_row(zoom_level: u8, tile_row: u32) -> Option<u64> {
	let size = 1u64.checked_shl(u32::from(zoom_level))?;
	(size - 1).checked_sub(u64::from(tile_row))
}
