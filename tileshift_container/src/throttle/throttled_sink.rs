//! Bounded concurrency and start-rate limiting for sink operations.
//!
//! [`ThrottledSink`] admits a write only when
//! - fewer than `limit` writes are unresolved (a [`Semaphore`] permit is held per write), and
//! - its start keeps at most `limit` starts inside any rolling window ([`RateWindow`]).
//!
//! A permit is released when its write resolves, whether it succeeded or failed, so a failure
//! never blocks later writes. Writes are attempted exactly once.
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//! use tileshift_container::*;
//! use tileshift_core::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let sink = ThrottledSink::new(Arc::new(DirectorySink::new("/tmp/out")), 100, Duration::from_secs(1))?;
//! let content = TileContent::resolve(Some("image/png"), None)?;
//! sink.submit("tiles/0/0/0.png", Blob::from("..."), &content).await?;
//! # Ok(())
//! # }
//! ```

use super::RateWindow;
use crate::TileSink;
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
use tileshift_core::{Blob, TileContent, TransferError};
use tokio::sync::Semaphore;

/// Window in which at most `limit` writes may start.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct ThrottledSink {
	sink: Arc<dyn TileSink>,
	semaphore: Semaphore,
	rate_window: RateWindow,
	in_flight: AtomicUsize,
	peak_in_flight: AtomicUsize,
}

impl ThrottledSink {
	pub fn new(sink: Arc<dyn TileSink>, limit: usize, window: Duration) -> Result<ThrottledSink, TransferError> {
		if limit == 0 {
			return Err(TransferError::configuration("the number of concurrent operations must be > 0"));
		}
		if window.is_zero() {
			return Err(TransferError::configuration("the rate limit window must be longer than 0"));
		}
		Ok(ThrottledSink {
			sink,
			semaphore: Semaphore::new(limit),
			rate_window: RateWindow::new(limit, window),
			in_flight: AtomicUsize::new(0),
			peak_in_flight: AtomicUsize::new(0),
		})
	}

	/// Writes one tile once the limits allow it and resolves when the destination acknowledged it.
	pub async fn submit(&self, key: &str, blob: Blob, content: &TileContent) -> Result<(), TransferError> {
		let _permit = self
			.semaphore
			.acquire()
			.await
			.map_err(|e| TransferError::sink(key, e))?;
		self.rate_window.acquire().await;

		let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

		self
			.sink
			.write(
				key,
				blob,
				content.content_type.as_deref(),
				content.content_encoding.as_deref(),
			)
			.await
			.map_err(|e| {
				log::debug!("writing {key:?} failed: {e:#}");
				TransferError::sink(key, e)
			})
	}

	/// Number of writes currently unresolved.
	pub fn in_flight(&self) -> usize {
		self.in_flight.load(Ordering::SeqCst)
	}

	/// Highest number of simultaneously unresolved writes observed so far.
	pub fn peak_in_flight(&self) -> usize {
		self.peak_in_flight.load(Ordering::SeqCst)
	}

	pub fn location(&self, prefix: &str) -> String {
		self.sink.location(prefix)
	}
}

/// Counts one unresolved write until dropped, also when the write panics.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
	fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> InFlight<'a> {
		let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
		peak.fetch_max(current, Ordering::SeqCst);
		InFlight(counter)
	}
}

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockTileSink;
	use anyhow::Result;
	use tokio::{task::JoinSet, time::Instant};

	fn png() -> TileContent {
		TileContent::resolve(Some("image/png"), None).unwrap()
	}

	#[tokio::test]
	async fn forwards_content() -> Result<()> {
		let mock = Arc::new(MockTileSink::new());
		let sink = ThrottledSink::new(mock.clone(), 2, DEFAULT_RATE_WINDOW)?;
		let pbf = TileContent::resolve(Some("pbf"), None)?;

		sink.submit("tiles/0/0/0.pbf", Blob::from("abc"), &pbf).await?;

		let writes = mock.writes();
		assert_eq!(writes.len(), 1);
		assert_eq!(writes[0].key, "tiles/0/0/0.pbf");
		assert_eq!(writes[0].size, 3);
		assert_eq!(writes[0].content_type.as_deref(), Some("application/x-protobuf"));
		assert_eq!(writes[0].content_encoding.as_deref(), Some("gzip"));
		assert_eq!(sink.in_flight(), 0);
		Ok(())
	}

	#[tokio::test]
	async fn failures_are_reported_with_key() -> Result<()> {
		let mock = Arc::new(MockTileSink::new().with_failure("tiles/1/0/0.png"));
		let sink = ThrottledSink::new(mock.clone(), 1, DEFAULT_RATE_WINDOW)?;

		let error = sink.submit("tiles/1/0/0.png", Blob::from("x"), &png()).await.unwrap_err();
		assert!(matches!(&error, TransferError::Sink { key, .. } if key == "tiles/1/0/0.png"));

		// the failed write released its permit
		sink.submit("tiles/1/0/1.png", Blob::from("x"), &png()).await?;
		assert_eq!(mock.writes().len(), 2);
		assert_eq!(sink.in_flight(), 0);
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn concurrency_is_bounded() -> Result<()> {
		let mock = Arc::new(MockTileSink::new().with_delay(Duration::from_millis(50)));
		let sink = Arc::new(ThrottledSink::new(mock.clone(), 3, Duration::from_millis(1))?);

		let mut tasks = JoinSet::new();
		for i in 0..20 {
			let sink = Arc::clone(&sink);
			tasks.spawn(async move { sink.submit(&format!("{i}.png"), Blob::from("x"), &png()).await });
		}
		for result in tasks.join_all().await {
			result?;
		}

		assert_eq!(sink.peak_in_flight(), 3);
		assert_eq!(mock.peak_concurrency(), 3);
		assert_eq!(mock.writes().len(), 20);
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn start_rate_is_bounded() -> Result<()> {
		let mock = Arc::new(MockTileSink::new());
		let sink = Arc::new(ThrottledSink::new(mock.clone(), 2, Duration::from_secs(1))?);
		let begin = Instant::now();

		let mut tasks = JoinSet::new();
		for i in 0..5 {
			let sink = Arc::clone(&sink);
			tasks.spawn(async move { sink.submit(&format!("{i}.png"), Blob::from("x"), &png()).await });
		}
		for result in tasks.join_all().await {
			result?;
		}

		let mut starts: Vec<Instant> = mock.writes().iter().map(|w| w.started).collect();
		starts.sort_unstable();
		assert_eq!(starts.len(), 5);
		for group in starts.windows(3) {
			assert!(group[2] - group[0] >= Duration::from_secs(1));
		}
		let last = starts[4] - begin;
		assert!(last >= Duration::from_secs(2), "{last:?}");
		assert!(last < Duration::from_millis(2050), "{last:?}");
		Ok(())
	}

	#[test]
	fn zero_limit_is_rejected() {
		let mock = Arc::new(MockTileSink::new());
		assert!(matches!(
			ThrottledSink::new(mock.clone(), 0, DEFAULT_RATE_WINDOW),
			Err(TransferError::Configuration(_))
		));
		assert!(matches!(
			ThrottledSink::new(mock, 1, Duration::ZERO),
			Err(TransferError::Configuration(_))
		));
	}
}
