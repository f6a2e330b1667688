//! Tileshift Container: move the tiles of an MBTiles archive into an object store or a directory tree.
//!
//! The crate is organised in layers:
//! - [`TileStore`] and its implementation [`MBTilesReader`] page rows out of the archive,
//! - [`TileSink`] with [`S3Sink`] and [`DirectorySink`] persist single tiles,
//! - [`ThrottledSink`] bounds concurrency and the start rate of sink operations,
//! - [`ChunkScheduler`] drives pages through the sink and detects completion,
//! - [`run_transfer`] wires everything together from a [`TransferConfig`].
//!
//! # Quick start
//! ```rust,no_run
//! use tileshift_container::*;
//! use tileshift_core::progress::ProgressDrain;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TransferConfig::new("world.mbtiles", Destination::Directory("/tmp/world".into()));
//!     match run_transfer(&config, &AssumeYes, &mut ProgressDrain::default()).await? {
//!         TransferOutcome::Completed(summary) => println!("wrote {} tiles", summary.processed),
//!         TransferOutcome::Declined => println!("nothing written"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//! - `test`: exposes [`testing`] with an in-memory store and sink for downstream tests.

mod container;
pub use container::*;

mod throttle;
pub use throttle::*;

mod transfer;
pub use transfer::*;

mod types;
pub use types::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
