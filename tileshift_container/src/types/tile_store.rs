//! The read side of a transfer.
//!
//! A [`TileStore`] exposes the archive metadata, counts the rows inside a zoom range and yields
//! them in pages addressed by `LIMIT`/`OFFSET`. Pages of one store must be non-overlapping and
//! exhaustive as long as the store is not modified while it is read.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;
use tileshift_core::{ArchiveMetadata, TileRow, TransferError, ZoomRange};

/// A finite stream of the rows of one page, usually buffered in memory.
pub type TileRowStream = BoxStream<'static, Result<TileRow, TransferError>>;

#[async_trait]
pub trait TileStore: Debug + Send + Sync {
	/// Human readable name of the store, usually its path.
	fn name(&self) -> &str;

	/// Metadata loaded when the store was opened.
	fn metadata(&self) -> &ArchiveMetadata;

	/// Number of rows whose zoom level lies inside `zoom`.
	async fn count_rows(&self, zoom: ZoomRange) -> Result<u64, TransferError>;

	/// At most `limit` rows inside `zoom`, skipping the first `offset` rows in the store's native order.
	///
	/// Implementations may read the whole page before returning; memory use is bounded by `limit`.
	async fn fetch_page(&self, zoom: ZoomRange, limit: u64, offset: u64) -> Result<TileRowStream, TransferError>;
}
