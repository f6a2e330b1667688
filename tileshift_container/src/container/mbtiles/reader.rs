//! Read metadata and paged tile rows from an MBTiles (SQLite) database.
//!
//! The database is opened read-only. The `metadata` table is loaded once in
//! [`MBTilesReader::open_path`]; afterwards only the `tiles` table is queried:
//!
//! ```sql
//! SELECT COUNT(*) FROM tiles WHERE zoom_level BETWEEN ?1 AND ?2
//! SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles WHERE zoom_level BETWEEN ?1 AND ?2 LIMIT ?3 OFFSET ?4
//! ```
//!
//! The page query has no `ORDER BY`. Paging relies on SQLite returning rows of an unmodified
//! file in the same order for every query, which holds as long as a single reader works on a
//! static archive.
//!
//! ## Usage
//! ```rust,no_run
//! use tileshift_container::*;
//! use tileshift_core::*;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = MBTilesReader::open_path(Path::new("/data/world.mbtiles"))?;
//!     let zoom = ZoomRange::new(0, 5)?;
//!     println!("{} tiles", reader.count_rows(zoom).await?);
//!     Ok(())
//! }
//! ```

use crate::{TileRowStream, TileStore};
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, params},
};
use std::path::Path;
use tileshift_core::{ArchiveMetadata, Blob, TileRow, TransferError, ZoomRange};

/// Reader for MBTiles (SQLite) archives.
pub struct MBTilesReader {
	name: String,
	pool: Pool<SqliteConnectionManager>,
	metadata: ArchiveMetadata,
}

impl MBTilesReader {
	/// Opens the archive read-only and loads its metadata.
	///
	/// # Errors
	/// Returns [`TransferError::StoreOpen`] if the file does not exist or is not an MBTiles database.
	pub fn open_path(path: &Path) -> Result<MBTilesReader, TransferError> {
		log::debug!("open {path:?}");

		MBTilesReader::load_from_sqlite(path).map_err(|e| TransferError::store_open(path, e))
	}

	fn load_from_sqlite(path: &Path) -> Result<MBTilesReader> {
		ensure!(path.is_file(), "file {path:?} does not exist");

		let manager = SqliteConnectionManager::file(path)
			.with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);
		let pool = Pool::builder()
			.max_size(4)
			.build(manager)
			.context("creating SQLite connection pool")?;

		let mut reader = MBTilesReader {
			name: path.display().to_string(),
			pool,
			metadata: ArchiveMetadata::new(),
		};

		reader.load_meta_data()?;

		Ok(reader)
	}

	fn load_meta_data(&mut self) -> Result<()> {
		log::debug!("load_meta_data");

		let conn = self.pool.get()?;

		// fails early for SQLite files that are not MBTiles archives
		conn
			.prepare("SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles LIMIT 0")
			.context("reading tiles table")?;

		let mut stmt = conn
			.prepare("SELECT name, value FROM metadata")
			.context("reading metadata table")?;
		let entries = stmt.query_map([], |row| {
			Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
		})?;

		for entry in entries {
			let (name, value) = entry?;
			self.metadata.insert(&name, value.as_deref().unwrap_or_default());
		}

		log::trace!("metadata: {:?}", self.metadata);

		Ok(())
	}

	/// Runs a closure with a pooled connection on the blocking thread pool.
	async fn with_connection<T, F>(&self, f: F) -> Result<T, TransferError>
	where
		T: Send + 'static,
		F: FnOnce(&r2d2_sqlite::rusqlite::Connection) -> Result<T> + Send + 'static,
	{
		let pool = self.pool.clone();
		tokio::task::spawn_blocking(move || {
			let conn = pool.get()?;
			f(&conn)
		})
		.await
		.map_err(TransferError::store_read)?
		.map_err(TransferError::store_read)
	}
}

#[async_trait]
impl TileStore for MBTilesReader {
	fn name(&self) -> &str {
		&self.name
	}

	fn metadata(&self) -> &ArchiveMetadata {
		&self.metadata
	}

	async fn count_rows(&self, zoom: ZoomRange) -> Result<u64, TransferError> {
		log::debug!("count rows in zoom range {zoom}");

		self
			.with_connection(move |conn| {
				let sql = "SELECT COUNT(*) FROM tiles WHERE zoom_level BETWEEN ?1 AND ?2";
				log::trace!("SQL: {sql}");
				let count: i64 = conn.query_row(sql, params![zoom.min, zoom.max], |row| row.get(0))?;
				Ok(u64::try_from(count)?)
			})
			.await
	}

	/// The page is read completely on a blocking thread and then streamed from memory.
	async fn fetch_page(&self, zoom: ZoomRange, limit: u64, offset: u64) -> Result<TileRowStream, TransferError> {
		log::debug!("fetch page: zoom {zoom}, limit {limit}, offset {offset}");

		let rows = self
			.with_connection(move |conn| {
				let sql = "SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles WHERE zoom_level BETWEEN ?1 AND ?2 LIMIT ?3 OFFSET ?4";
				log::trace!("SQL: {sql}");
				let mut stmt = conn.prepare_cached(sql)?;
				let rows = stmt
					.query_map(
						params![zoom.min, zoom.max, i64::try_from(limit)?, i64::try_from(offset)?],
						|row| {
							Ok(TileRow::new(
								row.get(0)?,
								row.get(1)?,
								row.get(2)?,
								Blob::from(row.get::<_, Vec<u8>>(3)?),
							))
						},
					)?
					.collect::<Result<Vec<TileRow>, _>>()?;
				Ok(rows)
			})
			.await?;

		log::trace!("got {} rows", rows.len());

		Ok(stream::iter(rows.into_iter().map(Ok)).boxed())
	}
}

impl std::fmt::Debug for MBTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesReader")
			.field("name", &self.name)
			.field("metadata", &self.metadata)
			.finish()
	}
}
