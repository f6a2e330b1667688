//! The error taxonomy of a tile transfer.
//!
//! Every failure of the transfer pipeline is reported as a [`TransferError`]. Callers that only
//! see an `anyhow::Error` can recover the variant with `downcast_ref::<TransferError>()`.

use std::{error::Error, path::PathBuf};

/// Boxed error source carried by the variants that wrap lower-level failures.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
	/// The archive is missing, unreadable or not an MBTiles file.
	#[error("could not open tile archive {path:?}")]
	StoreOpen {
		path: PathBuf,
		#[source]
		source: BoxError,
	},

	/// The configuration cannot be resolved into a runnable transfer.
	#[error("invalid configuration: {0}")]
	Configuration(String),

	/// A query against an already opened archive failed.
	#[error("reading from the tile archive failed")]
	StoreRead(#[source] BoxError),

	/// A row whose coordinates do not exist at its zoom level.
	#[error("invalid tile: row {tile_row} (column {tile_column}) does not exist at zoom level {zoom_level}")]
	InvalidTile {
		zoom_level: u8,
		tile_column: u32,
		tile_row: u32,
	},

	/// Writing a single tile to the destination failed.
	#[error("writing tile {key:?} failed")]
	Sink {
		key: String,
		#[source]
		source: BoxError,
	},

	/// More tiles settled than the archive reported.
	#[error("processed {processed} tiles but only {expected} were expected")]
	InvariantViolation { processed: u64, expected: u64 },

	/// The archive returned an empty page before all counted rows were read.
	#[error("tile archive ran out of rows at offset {offset}: processed {processed} of {expected} tiles")]
	StoreExhausted { processed: u64, expected: u64, offset: u64 },
}

impl TransferError {
	pub fn store_open(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
		TransferError::StoreOpen {
			path: path.into(),
			source: source.into(),
		}
	}

	pub fn store_read(source: impl Into<BoxError>) -> Self {
		TransferError::StoreRead(source.into())
	}

	pub fn sink(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
		TransferError::Sink {
			key: key.into(),
			source: source.into(),
		}
	}

	pub fn configuration(message: impl Into<String>) -> Self {
		TransferError::Configuration(message.into())
	}
}
