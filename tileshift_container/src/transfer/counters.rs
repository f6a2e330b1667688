use std::sync::atomic::{AtomicU64, Ordering};

/// Settled sink operations measured against the number of rows counted up front.
///
/// Shared between the scheduler and its dispatch tasks; every settled operation, successful or
/// not, increments `processed` exactly once.
#[derive(Debug)]
pub struct ProgressCounters {
	total_expected: u64,
	processed: AtomicU64,
}

impl ProgressCounters {
	#[must_use]
	pub fn new(total_expected: u64) -> ProgressCounters {
		ProgressCounters {
			total_expected,
			processed: AtomicU64::new(0),
		}
	}

	/// Counts one settled operation and returns the new total.
	pub fn record(&self) -> u64 {
		self.processed.fetch_add(1, Ordering::SeqCst) + 1
	}

	#[must_use]
	pub fn processed(&self) -> u64 {
		self.processed.load(Ordering::SeqCst)
	}

	#[must_use]
	pub fn total_expected(&self) -> u64 {
		self.total_expected
	}

	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.processed() == self.total_expected
	}

	/// `processed / total_expected` in percent; an empty transfer is complete.
	#[must_use]
	pub fn percentage(&self) -> f64 {
		if self.total_expected == 0 {
			100.0
		} else {
			self.processed() as f64 * 100.0 / self.total_expected as f64
		}
	}
}
