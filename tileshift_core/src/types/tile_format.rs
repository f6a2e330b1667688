//! Tile formats recognised in the `format` metadata entry.

use std::fmt;

/// A tile format with a known extension, MIME type and transfer encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFormat {
	Png,
	Jpeg,
	Pbf,
}

impl TileFormat {
	/// Maps the archive's `format` value to a tile format. Unknown values yield `None`.
	#[must_use]
	pub fn from_metadata(format: &str) -> Option<TileFormat> {
		match format.trim() {
			"image/png" => Some(TileFormat::Png),
			"image/jpeg" => Some(TileFormat::Jpeg),
			"pbf" => Some(TileFormat::Pbf),
			_ => None,
		}
	}

	#[must_use]
	pub fn extension(&self) -> &'static str {
		match self {
			TileFormat::Png => "png",
			TileFormat::Jpeg => "jpg",
			TileFormat::Pbf => "pbf",
		}
	}

	#[must_use]
	pub fn content_type(&self) -> &'static str {
		match self {
			TileFormat::Png => "image/png",
			TileFormat::Jpeg => "image/jpeg",
			TileFormat::Pbf => "application/x-protobuf",
		}
	}

	/// Vector tiles are stored gzip compressed inside MBTiles archives.
	#[must_use]
	pub fn content_encoding(&self) -> Option<&'static str> {
		match self {
			TileFormat::Pbf => Some("gzip"),
			TileFormat::Png | TileFormat::Jpeg => None,
		}
	}
}

impl fmt::Display for TileFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}
