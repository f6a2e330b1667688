//! This module provides [`DirectorySink`], which writes every tile to its own file.
//!
//! ## Directory Structure
//! Keys are interpreted as relative paths below the root directory:
//! ```text
//! <root>/<tile_dir>/<z>/<x>/<y>.<extension>
//! ```
//!
//! Example:
//! ```text
//! /srv/map/tiles/1/0/0.png
//! /srv/map/tiles/14/8800/6383.pbf
//! ```
//!
//! Keys with absolute, drive prefixed or `..` components are rejected, so nothing is ever
//! written outside the root. Parent directories are created on demand. Content type and encoding cannot be expressed in a
//! plain file and are ignored; gzip compressed vector tiles are written as they are stored.

use crate::TileSink;
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tileshift_core::Blob;
use tokio::fs;

#[derive(Clone, Debug)]
pub struct DirectorySink {
	root: PathBuf,
}

impl DirectorySink {
	pub fn new(root: impl Into<PathBuf>) -> DirectorySink {
		DirectorySink { root: root.into() }
	}

	/// Path of `key` below the root.
	fn resolve(&self, key: &str) -> Result<PathBuf> {
		ensure!(
			Path::new(key)
				.components()
				.all(|c| matches!(c, Component::Normal(_) | Component::CurDir)),
			"key {key:?} would leave the output directory {:?}",
			self.root
		);
		Ok(self.root.join(key))
	}
}

#[async_trait]
impl TileSink for DirectorySink {
	async fn write(&self, key: &str, blob: Blob, _content_type: Option<&str>, _content_encoding: Option<&str>) -> Result<()> {
		let path = self.resolve(key)?;
		log::trace!("write {path:?}");

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.with_context(|| format!("creating directory {parent:?}"))?;
		}

		fs::write(&path, blob.as_slice())
			.await
			.with_context(|| format!("writing file {path:?}"))
	}

	async fn contains_any(&self, prefix: &str) -> Result<bool> {
		let path = self.resolve(prefix)?;
		let metadata = match fs::metadata(&path).await {
			Ok(metadata) => metadata,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
			Err(e) => return Err(e).with_context(|| format!("inspecting {path:?}")),
		};

		if !metadata.is_dir() {
			return Ok(true);
		}

		let mut entries = fs::read_dir(&path)
			.await
			.with_context(|| format!("listing directory {path:?}"))?;
		Ok(entries.next_entry().await?.is_some())
	}

	fn location(&self, prefix: &str) -> String {
		self.root.join(prefix).display().to_string()
	}
}
