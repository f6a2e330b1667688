//! Paging rows through a throttled sink until the archive is exhausted.

mod config;
mod counters;
mod cursor;
mod run;
mod scheduler;
mod state;

pub use config::{DEFAULT_MAX_OPERATIONS, DEFAULT_TILE_DIR, Destination, ResolvedTransfer, TransferConfig};
pub use counters::ProgressCounters;
pub use cursor::Cursor;
pub use run::{AssumeYes, ConfirmationGate, TransferOutcome, run_transfer, run_transfer_with};
pub use scheduler::{ChunkScheduler, TransferSummary};
pub use state::TransferState;
