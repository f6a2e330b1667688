//! The page-by-page dispatch loop.
//!
//! [`ChunkScheduler`] counts the rows of the zoom range once, then repeatedly
//! 1. fetches the page at the cursor,
//! 2. maps every row to a key and spawns its submission into a [`JoinSet`],
//! 3. waits until every submission of the page settled,
//! 4. compares the processed count with the total and either advances the cursor or stops.
//!
//! Pages never overlap in time, so the store only serves one query at a time. On any failure the
//! submissions already spawned for the current page are drained before the error is returned and
//! no further page is requested.

use super::{Cursor, ProgressCounters, TransferState};
use crate::{ThrottledSink, TileStore};
use futures::{FutureExt, StreamExt};
use std::{panic::AssertUnwindSafe, sync::Arc};
use tileshift_core::{TileContent, TileKeyMapper, TransferError, ZoomRange, progress::ProgressTrait};
use tokio::task::JoinSet;

/// Result of a completed transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferSummary {
	/// Settled sink operations; equals `total` after a successful run.
	pub processed: u64,
	/// Rows counted in the zoom range before paging started.
	pub total: u64,
	/// Number of pages requested from the store.
	pub pages: u64,
	/// Human readable description of where the tiles were written.
	pub destination: String,
}

/// Submissions spawned for one page and the error that stopped spawning, if any.
struct DispatchedPage {
	spawned: u64,
	tasks: JoinSet<Result<(), TransferError>>,
	error: Option<TransferError>,
}

pub struct ChunkScheduler {
	store: Arc<dyn TileStore>,
	sink: Arc<ThrottledSink>,
	mapper: Arc<TileKeyMapper>,
	content: Arc<TileContent>,
	zoom: ZoomRange,
	page_size: u64,
	state: TransferState,
	pages: u64,
	processed: u64,
}

impl ChunkScheduler {
	/// A `page_size` of 0 is treated as 1.
	pub fn new(
		store: Arc<dyn TileStore>,
		sink: ThrottledSink,
		mapper: TileKeyMapper,
		content: TileContent,
		zoom: ZoomRange,
		page_size: u64,
	) -> ChunkScheduler {
		ChunkScheduler {
			store,
			sink: Arc::new(sink),
			mapper: Arc::new(mapper),
			content: Arc::new(content),
			zoom,
			page_size: page_size.max(1),
			state: TransferState::Idle,
			pages: 0,
			processed: 0,
		}
	}

	pub fn state(&self) -> TransferState {
		self.state
	}

	pub fn sink(&self) -> &ThrottledSink {
		&self.sink
	}

	/// Settled submissions, failed ones included, as of the last drained page.
	pub fn processed(&self) -> u64 {
		self.processed
	}

	/// Transfers every row in the zoom range, reporting progress after each page.
	pub async fn run(&mut self, progress: &mut dyn ProgressTrait) -> Result<TransferSummary, TransferError> {
		match self.run_pages(progress).await {
			Ok(summary) => {
				self.transition(TransferState::Done);
				log::info!(
					"transferred {} tiles in {} pages to {}",
					summary.processed,
					summary.pages,
					summary.destination
				);
				Ok(summary)
			}
			Err(error) => {
				self.transition(TransferState::Failed);
				Err(error)
			}
		}
	}

	async fn run_pages(&mut self, progress: &mut dyn ProgressTrait) -> Result<TransferSummary, TransferError> {
		self.transition(TransferState::Counting);
		let total = self.store.count_rows(self.zoom).await?;
		let counters = Arc::new(ProgressCounters::new(total));
		log::info!("{total} tiles in zoom range {} of {}", self.zoom, self.store.name());

		let mut cursor = Cursor::new(self.page_size);

		while !counters.is_complete() {
			self.transition(TransferState::Paging);
			let offset = cursor.offset();
			let page = self.dispatch_page(offset, &counters).await?;
			let spawned = page.spawned;

			self.transition(TransferState::Draining);
			let drain_error = drain(page.tasks, &counters).await;

			let processed = counters.processed();
			self.processed = processed;
			progress.set_percentage(counters.percentage());
			log::debug!(
				"page {} at offset {offset} settled {spawned} tiles, {processed}/{total} processed",
				cursor.chunk_index
			);

			if let Some(error) = page.error.or(drain_error) {
				return Err(error);
			}
			if processed > total {
				return Err(TransferError::InvariantViolation {
					processed,
					expected: total,
				});
			}
			if spawned == 0 && processed < total {
				return Err(TransferError::StoreExhausted {
					processed,
					expected: total,
					offset,
				});
			}

			cursor.advance();
		}

		Ok(TransferSummary {
			processed: counters.processed(),
			total,
			pages: self.pages,
			destination: self.sink.location(self.mapper.prefix()),
		})
	}

	/// Fetches the page at `offset` and spawns one submission per row.
	///
	/// Errors while reading or mapping rows stop spawning but are returned next to the tasks
	/// already spawned, so that the caller can drain them first.
	async fn dispatch_page(
		&mut self,
		offset: u64,
		counters: &Arc<ProgressCounters>,
	) -> Result<DispatchedPage, TransferError> {
		let mut rows = self.store.fetch_page(self.zoom, self.page_size, offset).await?;
		self.pages += 1;

		let mut page = DispatchedPage {
			spawned: 0,
			tasks: JoinSet::new(),
			error: None,
		};

		while let Some(row) = rows.next().await {
			let (key, row) = match row.and_then(|row| Ok((self.mapper.to_key(&row)?, row))) {
				Ok(mapped) => mapped,
				Err(error) => {
					page.error = Some(error);
					break;
				}
			};
			log::trace!("dispatch {key}");

			let sink = Arc::clone(&self.sink);
			let content = Arc::clone(&self.content);
			let counters = Arc::clone(counters);
			page.tasks.spawn(async move {
				let result = AssertUnwindSafe(sink.submit(&key, row.tile_data, &content))
					.catch_unwind()
					.await
					.unwrap_or_else(|_| Err(TransferError::sink(key.as_str(), "write task panicked")));
				counters.record();
				result
			});
			page.spawned += 1;
		}

		Ok(page)
	}

	fn transition(&mut self, next: TransferState) {
		log::debug!("transfer state: {} -> {next}", self.state);
		self.state = next;
	}
}

/// Waits for every task and returns the first failure.
async fn drain(
	mut tasks: JoinSet<Result<(), TransferError>>,
	counters: &ProgressCounters,
) -> Option<TransferError> {
	let mut first_error = None;
	while let Some(joined) = tasks.join_next().await {
		let error = match joined {
			Ok(Ok(())) => continue,
			Ok(Err(error)) => error,
			Err(join_error) => {
				// a cancelled task never reached its own increment
				counters.record();
				TransferError::sink("", join_error)
			}
		};
		if first_error.is_none() {
			first_error = Some(error);
		} else {
			log::debug!("additional failure while draining: {error}");
		}
	}
	first_error
}
