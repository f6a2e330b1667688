//! The extension, content type and content encoding applied to every written tile.

use crate::{TileFormat, TransferError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileContent {
	pub extension: String,
	pub content_type: Option<String>,
	pub content_encoding: Option<String>,
}

impl TileContent {
	/// Derives the tile content from the archive's `format` entry and an optional extension override.
	///
	/// The override always replaces the format's extension; content type and encoding still come
	/// from the format. Without an override an unknown or missing format is a configuration error.
	pub fn resolve(format: Option<&str>, extension_override: Option<&str>) -> Result<TileContent, TransferError> {
		let tile_format = format.and_then(TileFormat::from_metadata);

		let extension = match (normalize_extension(extension_override), tile_format) {
			(Some(extension), _) => extension,
			(None, Some(tile_format)) => tile_format.extension().to_string(),
			(None, None) => {
				return Err(TransferError::configuration(format!(
					"unknown tile format {:?}, pass a file extension explicitly",
					format.unwrap_or_default()
				)));
			}
		};

		Ok(TileContent {
			extension,
			content_type: tile_format.map(|f| f.content_type().to_string()),
			content_encoding: tile_format.and_then(|f| f.content_encoding()).map(str::to_string),
		})
	}
}

fn normalize_extension(extension: Option<&str>) -> Option<String> {
	let extension = extension?.trim().trim_start_matches('.');
	if extension.is_empty() {
		None
	} else {
		Some(extension.to_string())
	}
}
