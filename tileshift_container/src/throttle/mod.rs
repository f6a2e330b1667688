//! Rate and concurrency limits around a [`TileSink`](crate::TileSink).

mod rate_window;
mod throttled_sink;

pub use rate_window::RateWindow;
pub use throttled_sink::{DEFAULT_RATE_WINDOW, ThrottledSink};
