//! A terminal progress bar that reports transfer completion in percent.

use super::{ProgressTrait, inner::Inner};
use parking_lot::Mutex;
use std::sync::Arc;

/// A terminal progress bar handle, cloneable and thread-safe.
#[derive(Clone)]
pub struct ProgressBar {
	inner: Arc<Mutex<Inner>>,
}

impl ProgressBar {
	/// Creates a bar labelled with `message`. Nothing is drawn before the first update.
	#[must_use]
	pub fn new(message: &str) -> ProgressBar {
		ProgressBar {
			inner: Arc::new(Mutex::new(Inner::new(message))),
		}
	}
}

impl ProgressTrait for ProgressBar {
	fn set_percentage(&mut self, percent: f64) {
		let mut inner = self.inner.lock();
		inner.set_percentage(percent);
		inner.redraw();
	}

	fn finish(&mut self) {
		let mut inner = self.inner.lock();
		inner.percent = 100.0;
		inner.finished = true;
		inner.redraw();
		inner.write("\n");
	}

	fn remove(&mut self) {
		let mut inner = self.inner.lock();
		inner.finished = true;
		inner.write("\r\x1b[2K");
	}
}
