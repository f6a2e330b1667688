use std::fmt;

/// Phases of a [`ChunkScheduler`](crate::ChunkScheduler) run.
///
/// `Idle → Counting → Paging → Draining → (Paging | Done)`; any phase may end in `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferState {
	Idle,
	Counting,
	Paging,
	Draining,
	Done,
	Failed,
}

impl fmt::Display for TransferState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TransferState::Idle => "idle",
			TransferState::Counting => "counting",
			TransferState::Paging => "paging",
			TransferState::Draining => "draining",
			TransferState::Done => "done",
			TransferState::Failed => "failed",
		})
	}
}
