//! In-memory stores and sinks plus fixture helpers for tests.
//!
//! Only compiled for tests or with the `test` feature.

use crate::{TileRowStream, TileSink, TileStore};
use anyhow::{Result, bail};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use parking_lot::Mutex;
use r2d2_sqlite::rusqlite::{Connection, params};
use std::{
	collections::HashSet,
	path::Path,
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration,
};
use tileshift_core::{ArchiveMetadata, Blob, TileRow, TransferError, ZoomRange};
use tokio::time::Instant;

/// Creates an MBTiles file at `path` containing the given metadata and rows.
pub fn create_mbtiles(path: &Path, metadata: &[(&str, &str)], rows: &[TileRow]) -> Result<()> {
	let mut conn = Connection::open(path)?;
	conn.execute_batch(
		"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
		CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB, UNIQUE (zoom_level, tile_column, tile_row));",
	)?;

	let transaction = conn.transaction()?;
	for (name, value) in metadata {
		transaction.execute("INSERT INTO metadata (name, value) VALUES (?1, ?2)", params![name, value])?;
	}
	for row in rows {
		transaction.execute(
			"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
			params![row.zoom_level, row.tile_column, row.tile_row, row.tile_data.as_slice()],
		)?;
	}
	transaction.commit()?;
	Ok(())
}

/// Rows of the pyramid `zoom_levels`, each tile holding `"{z}/{x}/{y}"` as data.
pub fn pyramid_rows(zoom_levels: std::ops::RangeInclusive<u8>) -> Vec<TileRow> {
	let mut rows = Vec::new();
	for zoom in zoom_levels {
		let size = 1u32 << zoom;
		for x in 0..size {
			for y in 0..size {
				rows.push(TileRow::new(zoom, x, y, Blob::from(format!("{zoom}/{x}/{y}").as_str())));
			}
		}
	}
	rows
}

/// A store backed by a vector of rows.
#[derive(Debug)]
pub struct MockTileStore {
	metadata: ArchiveMetadata,
	rows: Vec<TileRow>,
	count_override: Option<u64>,
	failing_offset: Option<u64>,
	fetches: Mutex<Vec<(u64, u64)>>,
}

impl MockTileStore {
	pub fn new(metadata: &[(&str, &str)], rows: Vec<TileRow>) -> MockTileStore {
		MockTileStore {
			metadata: metadata.iter().copied().collect(),
			rows,
			count_override: None,
			failing_offset: None,
			fetches: Mutex::new(Vec::new()),
		}
	}

	/// Reports `count` from `count_rows` regardless of the rows held.
	#[must_use]
	pub fn with_count(mut self, count: u64) -> MockTileStore {
		self.count_override = Some(count);
		self
	}

	/// Fails the page request starting at `offset`.
	#[must_use]
	pub fn with_failing_page(mut self, offset: u64) -> MockTileStore {
		self.failing_offset = Some(offset);
		self
	}

	/// Every `(limit, offset)` pair requested so far.
	pub fn fetches(&self) -> Vec<(u64, u64)> {
		self.fetches.lock().clone()
	}

	fn rows_in(&self, zoom: ZoomRange) -> impl Iterator<Item = &TileRow> {
		self.rows.iter().filter(move |row| zoom.contains(row.zoom_level))
	}
}

#[async_trait]
impl TileStore for MockTileStore {
	fn name(&self) -> &str {
		"mock"
	}

	fn metadata(&self) -> &ArchiveMetadata {
		&self.metadata
	}

	async fn count_rows(&self, zoom: ZoomRange) -> Result<u64, TransferError> {
		Ok(self.count_override.unwrap_or(self.rows_in(zoom).count() as u64))
	}

	async fn fetch_page(&self, zoom: ZoomRange, limit: u64, offset: u64) -> Result<TileRowStream, TransferError> {
		self.fetches.lock().push((limit, offset));
		if self.failing_offset == Some(offset) {
			return Err(TransferError::store_read(format!("page at offset {offset} is unreadable")));
		}
		let page: Vec<TileRow> = self
			.rows_in(zoom)
			.skip(offset as usize)
			.take(limit as usize)
			.cloned()
			.collect();
		Ok(stream::iter(page.into_iter().map(Ok)).boxed())
	}
}

/// One write received by a [`MockTileSink`].
#[derive(Clone, Debug)]
pub struct MockWrite {
	pub key: String,
	pub size: u64,
	pub content_type: Option<String>,
	pub content_encoding: Option<String>,
	pub started: Instant,
}

/// A sink that records every write attempt.
#[derive(Debug, Default)]
pub struct MockTileSink {
	writes: Mutex<Vec<MockWrite>>,
	failures: HashSet<String>,
	panics: HashSet<String>,
	delay: Option<Duration>,
	existing: bool,
	concurrency: AtomicUsize,
	peak_concurrency: AtomicUsize,
}

impl MockTileSink {
	pub fn new() -> MockTileSink {
		MockTileSink::default()
	}

	/// Fails every write to `key`.
	#[must_use]
	pub fn with_failure(mut self, key: &str) -> MockTileSink {
		self.failures.insert(key.to_string());
		self
	}

	/// Panics while writing `key`.
	#[must_use]
	pub fn with_panic(mut self, key: &str) -> MockTileSink {
		self.panics.insert(key.to_string());
		self
	}

	/// Delays every write.
	#[must_use]
	pub fn with_delay(mut self, delay: Duration) -> MockTileSink {
		self.delay = Some(delay);
		self
	}

	/// Pretends the destination already holds data.
	#[must_use]
	pub fn with_existing_content(mut self) -> MockTileSink {
		self.existing = true;
		self
	}

	pub fn writes(&self) -> Vec<MockWrite> {
		self.writes.lock().clone()
	}

	/// Written keys in sorted order.
	pub fn keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self.writes.lock().iter().map(|w| w.key.clone()).collect();
		keys.sort();
		keys
	}

	pub fn peak_concurrency(&self) -> usize {
		self.peak_concurrency.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl TileSink for MockTileSink {
	async fn write(
		&self,
		key: &str,
		blob: Blob,
		content_type: Option<&str>,
		content_encoding: Option<&str>,
	) -> Result<()> {
		self.writes.lock().push(MockWrite {
			key: key.to_string(),
			size: blob.len(),
			content_type: content_type.map(str::to_string),
			content_encoding: content_encoding.map(str::to_string),
			started: Instant::now(),
		});

		let current = self.concurrency.fetch_add(1, Ordering::SeqCst) + 1;
		self.peak_concurrency.fetch_max(current, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		self.concurrency.fetch_sub(1, Ordering::SeqCst);

		assert!(!self.panics.contains(key), "mock sink panics on {key}");
		if self.failures.contains(key) {
			bail!("mock sink rejects {key}");
		}
		Ok(())
	}

	async fn contains_any(&self, _prefix: &str) -> Result<bool> {
		Ok(self.existing)
	}

	fn location(&self, prefix: &str) -> String {
		format!("mock://{prefix}")
	}
}
