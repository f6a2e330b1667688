//! Runs a complete transfer: open, resolve, confirm, page, report.

use super::{ChunkScheduler, TransferConfig, TransferSummary};
use crate::{MBTilesReader, ThrottledSink, TileSink, TileStore};
use anyhow::Result;
use std::sync::Arc;
use tileshift_core::progress::ProgressTrait;

/// Asked once before writing into a destination that already holds data.
pub trait ConfirmationGate: Send + Sync {
	/// Returns `true` to continue writing into `location`.
	fn confirm(&self, location: &str) -> Result<bool>;
}

/// Confirms every destination without asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
	fn confirm(&self, _location: &str) -> Result<bool> {
		Ok(true)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
	Completed(TransferSummary),
	/// The destination was not empty and the gate declined; nothing was written.
	Declined,
}

/// Opens the archive and the destination described by `config` and transfers all tiles.
///
/// Failures of the pipeline carry a [`TransferError`](tileshift_core::TransferError), which can be
/// recovered with `downcast_ref`.
pub async fn run_transfer(
	config: &TransferConfig,
	gate: &dyn ConfirmationGate,
	progress: &mut dyn ProgressTrait,
) -> Result<TransferOutcome> {
	config.validate()?;

	let store = MBTilesReader::open_path(&config.input)?;
	let sink = config.destination.open_sink().await?;

	run_transfer_with(Arc::new(store), sink, config, gate, progress).await
}

/// Like [`run_transfer`], with an already opened store and sink.
pub async fn run_transfer_with(
	store: Arc<dyn TileStore>,
	sink: Arc<dyn TileSink>,
	config: &TransferConfig,
	gate: &dyn ConfirmationGate,
	progress: &mut dyn ProgressTrait,
) -> Result<TransferOutcome> {
	config.validate()?;
	let resolved = config.resolve(store.metadata())?;
	log::debug!("resolved transfer: {resolved:?}");

	let prefix = resolved.mapper.prefix().to_string();
	if sink.contains_any(&prefix).await? {
		let location = sink.location(&prefix);
		log::warn!("{location} already contains files");
		if !gate.confirm(&location)? {
			log::info!("transfer into {location} declined");
			return Ok(TransferOutcome::Declined);
		}
	}

	let throttled = ThrottledSink::new(sink, config.max_operations, config.rate_window)?;
	let mut scheduler = ChunkScheduler::new(
		store,
		throttled,
		resolved.mapper,
		resolved.content,
		resolved.zoom,
		config.page_size(),
	);

	match scheduler.run(progress).await {
		Ok(summary) => {
			progress.finish();
			Ok(TransferOutcome::Completed(summary))
		}
		Err(error) => {
			progress.remove();
			Err(error.into())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		Destination,
		testing::{MockTileSink, MockTileStore, create_mbtiles, pyramid_rows},
	};
	use assert_fs::{TempDir, prelude::*};
	use parking_lot::Mutex;
	use pretty_assertions::assert_eq;
	use tileshift_core::{TransferError, progress::ProgressDrain};

	struct Answer {
		answer: bool,
		asked: Mutex<Vec<String>>,
	}

	impl Answer {
		fn new(answer: bool) -> Answer {
			Answer {
				answer,
				asked: Mutex::new(Vec::new()),
			}
		}
	}

	impl ConfirmationGate for Answer {
		fn confirm(&self, location: &str) -> Result<bool> {
			self.asked.lock().push(location.to_string());
			Ok(self.answer)
		}
	}

	fn config() -> TransferConfig {
		TransferConfig::new("mock.mbtiles", Destination::Directory("/unused".into()))
	}

	fn store() -> Arc<MockTileStore> {
		Arc::new(MockTileStore::new(
			&[("format", "image/png"), ("minzoom", "0"), ("maxzoom", "1")],
			pyramid_rows(0..=1),
		))
	}

	#[tokio::test]
	async fn empty_destination_is_not_confirmed() -> Result<()> {
		let sink = Arc::new(MockTileSink::new());
		let gate = Answer::new(false);

		let outcome = run_transfer_with(store(), sink.clone(), &config(), &gate, &mut ProgressDrain::default()).await?;

		assert!(gate.asked.lock().is_empty());
		assert_eq!(
			sink.keys(),
			vec![
				"tiles/0/0/0.png",
				"tiles/1/0/0.png",
				"tiles/1/0/1.png",
				"tiles/1/1/0.png",
				"tiles/1/1/1.png"
			]
		);
		assert!(matches!(outcome, TransferOutcome::Completed(TransferSummary { processed: 5, .. })));
		Ok(())
	}

	#[tokio::test]
	async fn declined_destination_stays_untouched() -> Result<()> {
		let store = store();
		let sink = Arc::new(MockTileSink::new().with_existing_content());
		let gate = Answer::new(false);

		let outcome = run_transfer_with(store.clone(), sink.clone(), &config(), &gate, &mut ProgressDrain::default()).await?;

		assert_eq!(outcome, TransferOutcome::Declined);
		assert_eq!(*gate.asked.lock(), vec!["mock://tiles/".to_string()]);
		assert!(sink.writes().is_empty());
		assert!(store.fetches().is_empty());
		Ok(())
	}

	#[tokio::test]
	async fn confirmed_destination_is_written() -> Result<()> {
		let sink = Arc::new(MockTileSink::new().with_existing_content());
		let gate = Answer::new(true);

		let outcome = run_transfer_with(store(), sink.clone(), &config(), &gate, &mut ProgressDrain::default()).await?;

		assert_eq!(gate.asked.lock().len(), 1);
		assert_eq!(sink.writes().len(), 5);
		assert!(matches!(outcome, TransferOutcome::Completed(_)));
		Ok(())
	}

	#[tokio::test]
	async fn pipeline_errors_can_be_downcast() -> Result<()> {
		let sink = Arc::new(MockTileSink::new().with_failure("tiles/1/1/1.png"));

		let error = run_transfer_with(store(), sink, &config(), &AssumeYes, &mut ProgressDrain::default())
			.await
			.unwrap_err();

		assert!(matches!(
			error.downcast_ref::<TransferError>(),
			Some(TransferError::Sink { key, .. }) if key == "tiles/1/1/1.png"
		));
		Ok(())
	}

	#[tokio::test]
	async fn configuration_errors_come_first() -> Result<()> {
		let store = Arc::new(MockTileStore::new(&[("format", "image/webp")], pyramid_rows(0..=0)));
		let sink = Arc::new(MockTileSink::new().with_existing_content());
		let gate = Answer::new(true);

		let error = run_transfer_with(store, sink.clone(), &config(), &gate, &mut ProgressDrain::default())
			.await
			.unwrap_err();

		assert!(matches!(
			error.downcast_ref::<TransferError>(),
			Some(TransferError::Configuration(_))
		));
		assert!(gate.asked.lock().is_empty());
		assert!(sink.writes().is_empty());
		Ok(())
	}

	#[tokio::test]
	async fn archive_to_directory() -> Result<()> {
		let dir = TempDir::new()?;
		let input = dir.child("input.mbtiles");
		create_mbtiles(
			input.path(),
			&[("format", "pbf"), ("minzoom", "0"), ("maxzoom", "2")],
			&pyramid_rows(0..=2),
		)?;

		let mut config = TransferConfig::new(input.path(), Destination::Directory(dir.path().join("out")));
		config.min_zoom = Some(1);
		config.max_operations = 3;
		config.rate_window = std::time::Duration::from_millis(5);

		let outcome = run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await?;

		let TransferOutcome::Completed(summary) = outcome else {
			panic!("transfer was declined");
		};
		assert_eq!((summary.processed, summary.total, summary.pages), (20, 20, 7));
		assert_eq!(summary.destination, dir.path().join("out/tiles/").display().to_string());
		dir.child("out/tiles/1/0/1.pbf").assert("1/0/0");
		dir.child("out/tiles/2/3/0.pbf").assert("2/3/3");
		dir.child("out/tiles/0").assert(predicates::path::missing());
		Ok(())
	}

	#[tokio::test]
	async fn missing_archive() {
		let config = TransferConfig::new("/does/not/exist.mbtiles", Destination::Directory("/tmp".into()));
		let error = run_transfer(&config, &AssumeYes, &mut ProgressDrain::default())
			.await
			.unwrap_err();
		assert!(matches!(
			error.downcast_ref::<TransferError>(),
			Some(TransferError::StoreOpen { .. })
		));
	}
}
