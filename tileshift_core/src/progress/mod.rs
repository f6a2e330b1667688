//! Progress indicators for long-running transfers.
//!
//! `ProgressTrait` is the interface the transfer pipeline reports to. `ProgressBar` draws a
//! terminal bar on stderr, `ProgressDrain` swallows every update.
//!
//! # Examples
//!
//! ```rust
//! use tileshift_core::progress::*;
//!
//! let mut progress = get_progress_bar("Uploading");
//! progress.set_percentage(42.0);
//! progress.finish();
//! ```

mod inner;
mod progress_bar;
mod progress_drain;
mod traits;

pub use progress_bar::ProgressBar;
pub use progress_drain::ProgressDrain;
pub use traits::*;
