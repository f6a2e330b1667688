//! The write side of a transfer.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use tileshift_core::Blob;

/// A destination that persists one tile per key.
#[async_trait]
pub trait TileSink: Debug + Send + Sync {
	/// Stores `blob` under `key`. Content type and encoding are applied where the destination supports them.
	async fn write(
		&self,
		key: &str,
		blob: Blob,
		content_type: Option<&str>,
		content_encoding: Option<&str>,
	) -> Result<()>;

	/// Returns `true` if anything is already stored below `prefix`.
	async fn contains_any(&self, prefix: &str) -> Result<bool>;

	/// Describes where keys below `prefix` end up, e.g. `s3://bucket/tiles/`.
	fn location(&self, prefix: &str) -> String;
}
