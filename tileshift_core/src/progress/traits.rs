//! The `ProgressTrait` interface and the `get_progress_bar` factory.

use super::ProgressBar;

/// Creates a terminal progress bar labelled with `message`.
#[must_use]
pub fn get_progress_bar(message: &str) -> Box<dyn ProgressTrait> {
	Box::new(ProgressBar::new(message))
}

/// A trait defining the interface for progress indicators.
///
/// Transfers report completion as a percentage because the total is only known after the
/// archive has been counted.
pub trait ProgressTrait: Send {
	/// Sets the completed share in percent. Values are clamped to `0.0..=100.0`.
	fn set_percentage(&mut self, percent: f64);

	/// Marks the work as complete and leaves the final state visible.
	fn finish(&mut self);

	/// Removes the progress indicator without completing it.
	fn remove(&mut self);
}
