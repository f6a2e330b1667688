//! Resolved settings of one transfer.
//!
//! A [`TransferConfig`] is built once, before anything is read or written. Together with the
//! archive metadata it resolves into a [`ResolvedTransfer`]: the effective zoom range, the tile
//! content and the key mapper.

use crate::{DEFAULT_RATE_WINDOW, DirectorySink, S3Config, S3Sink, TileSink};
use anyhow::Result;
use std::{
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};
use tileshift_core::{ArchiveMetadata, TileContent, TileKeyMapper, TransferError, ZoomRange};

/// Default concurrency limit, start-rate limit and page size.
pub const DEFAULT_MAX_OPERATIONS: usize = 2000;

/// Default key prefix below which tiles are written.
pub const DEFAULT_TILE_DIR: &str = "tiles";

/// Where the tiles are written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
	S3(S3Config),
	Directory(PathBuf),
}

impl Destination {
	pub async fn open_sink(&self) -> Result<Arc<dyn TileSink>> {
		Ok(match self {
			Destination::S3(config) => Arc::new(S3Sink::new(config).await?),
			Destination::Directory(root) => Arc::new(DirectorySink::new(root)),
		})
	}

	fn validate(&self) -> Result<(), TransferError> {
		match self {
			Destination::S3(config) if config.bucket.trim().is_empty() => {
				Err(TransferError::configuration("an S3 destination needs a bucket"))
			}
			Destination::S3(config) if config.timeout.is_zero() => {
				Err(TransferError::configuration("the S3 request timeout must be longer than 0"))
			}
			Destination::Directory(root) if root.as_os_str().is_empty() => {
				Err(TransferError::configuration("a local destination needs an output directory"))
			}
			_ => Ok(()),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
	pub input: PathBuf,
	pub destination: Destination,
	pub min_zoom: Option<u8>,
	pub max_zoom: Option<u8>,
	pub tile_dir: String,
	/// Write tiles directly below the destination root instead of below `tile_dir`.
	pub in_root: bool,
	/// Maximum number of sink operations in flight and started per `rate_window`.
	pub max_operations: usize,
	/// Rows per page; defaults to `max_operations`.
	pub page_size: Option<u64>,
	pub rate_window: Duration,
	/// Replaces the extension derived from the archive's `format`.
	pub file_extension: Option<String>,
}

impl TransferConfig {
	pub fn new(input: impl AsRef<Path>, destination: Destination) -> TransferConfig {
		TransferConfig {
			input: input.as_ref().to_path_buf(),
			destination,
			min_zoom: None,
			max_zoom: None,
			tile_dir: DEFAULT_TILE_DIR.to_string(),
			in_root: false,
			max_operations: DEFAULT_MAX_OPERATIONS,
			page_size: None,
			rate_window: DEFAULT_RATE_WINDOW,
			file_extension: None,
		}
	}

	/// Checks everything that can be checked without opening the archive.
	pub fn validate(&self) -> Result<(), TransferError> {
		self.destination.validate()?;

		if self.max_operations == 0 {
			return Err(TransferError::configuration("max operations must be > 0"));
		}
		if self.page_size == Some(0) {
			return Err(TransferError::configuration("page size must be > 0"));
		}
		if self.rate_window.is_zero() {
			return Err(TransferError::configuration("the rate limit window must be longer than 0"));
		}
		match (self.min_zoom, self.max_zoom) {
			(Some(min), Some(max)) => ZoomRange::new(min, max).map(|_| ()),
			(Some(zoom), None) | (None, Some(zoom)) => ZoomRange::new(zoom, zoom).map(|_| ()),
			(None, None) => Ok(()),
		}
	}

	#[must_use]
	pub fn page_size(&self) -> u64 {
		self.page_size.unwrap_or(self.max_operations as u64)
	}

	#[must_use]
	pub fn base_path(&self) -> String {
		TileKeyMapper::base_path(&self.tile_dir, self.in_root)
	}

	/// Merges the configuration with the archive metadata.
	///
	/// Missing zoom bounds fall back to the metadata `minzoom`/`maxzoom`, then to the full range.
	pub fn resolve(&self, metadata: &ArchiveMetadata) -> Result<ResolvedTransfer, TransferError> {
		let fallback_min = match self.min_zoom {
			Some(_) => None,
			None => metadata.minzoom()?,
		};
		let fallback_max = match self.max_zoom {
			Some(_) => None,
			None => metadata.maxzoom()?,
		};
		let zoom = ZoomRange::resolve(self.min_zoom, self.max_zoom, fallback_min, fallback_max)?;

		let content = TileContent::resolve(metadata.format(), self.file_extension.as_deref())?;
		let mapper = TileKeyMapper::new(self.base_path(), content.extension.clone());

		Ok(ResolvedTransfer { zoom, content, mapper })
	}
}

/// The parts of a transfer that depend on the archive metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTransfer {
	pub zoom: ZoomRange,
	pub content: TileContent,
	pub mapper: TileKeyMapper,
}
