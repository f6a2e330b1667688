use anyhow::Result;
use assert_fs::{TempDir, prelude::*};
use pretty_assertions::assert_eq;
use r2d2_sqlite::rusqlite::{Connection, params};
use std::{path::Path, sync::Arc, time::Duration};
use tileshift_container::*;
use tileshift_core::{TransferError, progress::ProgressDrain};

struct Decline;

impl ConfirmationGate for Decline {
	fn confirm(&self, _location: &str) -> Result<bool> {
		Ok(false)
	}
}

fn create_archive(path: &Path, metadata: &[(&str, &str)], tiles: &[(u8, u32, u32, &str)]) -> Result<()> {
	let conn = Connection::open(path)?;
	conn.execute_batch(
		"CREATE TABLE metadata (name TEXT, value TEXT);
		CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);",
	)?;
	for (name, value) in metadata {
		conn.execute("INSERT INTO metadata VALUES (?1, ?2)", params![name, value])?;
	}
	for (z, x, y, data) in tiles {
		conn.execute("INSERT INTO tiles VALUES (?1, ?2, ?3, ?4)", params![z, x, y, data.as_bytes()])?;
	}
	Ok(())
}

fn list_files(root: &Path) -> Vec<String> {
	let mut files = Vec::new();
	let mut stack = vec![root.to_path_buf()];
	while let Some(dir) = stack.pop() {
		for entry in std::fs::read_dir(dir).unwrap() {
			let path = entry.unwrap().path();
			if path.is_dir() {
				stack.push(path);
			} else {
				files.push(path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"));
			}
		}
	}
	files.sort();
	files
}

fn fast(mut config: TransferConfig) -> TransferConfig {
	config.rate_window = Duration::from_millis(5);
	config
}

#[tokio::test]
async fn png_archive_is_flipped_into_xyz_layout() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("a.mbtiles");
	create_archive(
		input.path(),
		&[("minzoom", "2"), ("maxzoom", "2"), ("format", "image/png")],
		&[(2, 1, 0, "r0"), (2, 1, 1, "r1"), (2, 1, 2, "r2"), (2, 1, 3, "r3")],
	)?;

	let out = dir.child("out");
	let config = fast(TransferConfig::new(input.path(), Destination::Directory(out.path().to_path_buf())));
	let outcome = run_transfer(&config, &Decline, &mut ProgressDrain::default()).await?;

	let TransferOutcome::Completed(summary) = outcome else {
		panic!("an empty destination must not be declined");
	};
	assert_eq!(summary.processed, 4);
	assert_eq!(
		list_files(out.path()),
		vec!["tiles/2/1/0.png", "tiles/2/1/1.png", "tiles/2/1/2.png", "tiles/2/1/3.png"]
	);
	out.child("tiles/2/1/3.png").assert("r0");
	out.child("tiles/2/1/0.png").assert("r3");
	Ok(())
}

#[tokio::test]
async fn paging_with_small_pages() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("d.mbtiles");
	create_archive(
		input.path(),
		&[("format", "pbf")],
		&[(3, 0, 0, "a"), (3, 0, 1, "b"), (3, 0, 2, "c"), (3, 0, 3, "d"), (3, 0, 4, "e")],
	)?;

	let out = dir.child("out");
	let mut config = fast(TransferConfig::new(input.path(), Destination::Directory(out.path().to_path_buf())));
	config.page_size = Some(2);
	config.in_root = true;

	let outcome = run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await?;

	let TransferOutcome::Completed(summary) = outcome else {
		panic!("transfer was declined");
	};
	assert_eq!((summary.processed, summary.total, summary.pages), (5, 5, 3));
	assert_eq!(
		list_files(out.path()),
		vec!["3/0/3.pbf", "3/0/4.pbf", "3/0/5.pbf", "3/0/6.pbf", "3/0/7.pbf"]
	);
	Ok(())
}

#[tokio::test]
async fn zero_matching_rows() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("b.mbtiles");
	create_archive(input.path(), &[("format", "image/jpeg")], &[(5, 0, 0, "x")])?;

	let out = dir.child("out");
	let mut config = fast(TransferConfig::new(input.path(), Destination::Directory(out.path().to_path_buf())));
	config.max_zoom = Some(4);

	let outcome = run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await?;

	assert!(matches!(
		outcome,
		TransferOutcome::Completed(TransferSummary {
			processed: 0,
			total: 0,
			pages: 0,
			..
		})
	));
	out.assert(predicates::path::missing());
	Ok(())
}

#[tokio::test]
async fn existing_destination_can_be_declined() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("c.mbtiles");
	create_archive(input.path(), &[("format", "image/png")], &[(0, 0, 0, "new")])?;

	let out = dir.child("out");
	out.child("tiles/0/0/0.png").write_str("old")?;

	let config = fast(TransferConfig::new(input.path(), Destination::Directory(out.path().to_path_buf())));

	assert_eq!(
		run_transfer(&config, &Decline, &mut ProgressDrain::default()).await?,
		TransferOutcome::Declined
	);
	out.child("tiles/0/0/0.png").assert("old");

	run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await?;
	out.child("tiles/0/0/0.png").assert("new");
	Ok(())
}

#[tokio::test]
async fn unknown_format_requires_extension() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("e.mbtiles");
	create_archive(input.path(), &[("format", "webp")], &[(0, 0, 0, "x")])?;

	let out = dir.child("out");
	let mut config = fast(TransferConfig::new(input.path(), Destination::Directory(out.path().to_path_buf())));

	let error = run_transfer(&config, &AssumeYes, &mut ProgressDrain::default())
		.await
		.unwrap_err();
	assert!(matches!(
		error.downcast_ref::<TransferError>(),
		Some(TransferError::Configuration(_))
	));
	out.assert(predicates::path::missing());

	config.file_extension = Some(".webp".to_string());
	run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await?;
	out.child("tiles/0/0/0.webp").assert("x");
	Ok(())
}

#[tokio::test]
async fn invalid_row_is_reported() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("f.mbtiles");
	create_archive(input.path(), &[("format", "image/png")], &[(1, 0, 2, "x")])?;

	let config = fast(TransferConfig::new(
		input.path(),
		Destination::Directory(dir.path().join("out")),
	));
	let error = run_transfer(&config, &AssumeYes, &mut ProgressDrain::default())
		.await
		.unwrap_err();

	assert_eq!(
		format!("{error:#}"),
		"invalid tile: row 2 (column 0) does not exist at zoom level 1"
	);
	Ok(())
}

#[tokio::test]
async fn mixed_store_and_sink() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("g.mbtiles");
	create_archive(
		input.path(),
		&[("format", "image/png"), ("maxzoom", "1")],
		&[(0, 0, 0, "a"), (1, 1, 1, "b"), (2, 0, 0, "c")],
	)?;

	let store = Arc::new(MBTilesReader::open_path(input.path())?);
	let sink = Arc::new(DirectorySink::new(dir.path().join("out")));
	let config = fast(TransferConfig::new(input.path(), Destination::Directory(dir.path().join("unused"))));

	let outcome = run_transfer_with(store, sink, &config, &AssumeYes, &mut ProgressDrain::default()).await?;

	assert!(matches!(outcome, TransferOutcome::Completed(TransferSummary { processed: 2, .. })));
	assert_eq!(
		list_files(&dir.path().join("out")),
		vec!["tiles/0/0/0.png", "tiles/1/1/0.png"]
	);
	Ok(())
}

#[tokio::test]
async fn absolute_tile_dir_stays_below_the_output_directory() -> Result<()> {
	let dir = TempDir::new()?;
	let input = dir.child("h.mbtiles");
	create_archive(input.path(), &[("format", "image/png")], &[(1, 0, 0, "a")])?;

	for (tile_dir, expected) in [("/srv/x", "srv/x/1/0/1.png"), ("/", "1/0/1.png"), ("", "1/0/1.png")] {
		let out = dir.child(format!("out{}", tile_dir.len()));
		let mut config = fast(TransferConfig::new(input.path(), Destination::Directory(out.path().to_path_buf())));
		config.tile_dir = tile_dir.to_string();

		run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await?;

		assert_eq!(list_files(out.path()), vec![expected], "tile_dir {tile_dir:?}");
	}
	Ok(())
}
