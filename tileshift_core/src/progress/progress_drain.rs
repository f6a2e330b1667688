//! This module provides the `ProgressDrain` struct, a no-op implementation of a progress indicator.
//!
//! It is used when a caller needs a `ProgressTrait` but no output, e.g. in tests or when stderr
//! is not a terminal.
//!
//! # Examples
//!
//! ```rust
//! use tileshift_core::progress::{ProgressDrain, ProgressTrait};
//!
//! let mut progress = ProgressDrain::default();
//! progress.set_percentage(50.0);
//! progress.finish();
//! ```

use super::ProgressTrait;

/// A progress indicator that ignores every update.
#[derive(Clone, Debug, Default)]
pub struct ProgressDrain {}

impl ProgressTrait for ProgressDrain {
	fn set_percentage(&mut self, _percent: f64) {}

	fn finish(&mut self) {}

	fn remove(&mut self) {}
}
