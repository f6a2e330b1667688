//! Start-rate limiting with governor.
//!
//! [`RateWindow`] runs governor's GCRA with a burst of one and a period of `window / limit`
//! (rounded up), so starts are spaced evenly and no window of that length ever contains more
//! than `limit` of them. Time is read from the tokio clock, which keeps the limiter
//! deterministic under `tokio::time::pause`.

use governor::{
	Quota, RateLimiter,
	clock::Clock,
	middleware::NoOpMiddleware,
	nanos::Nanos,
	state::{InMemoryState, NotKeyed},
};
use std::{fmt, num::NonZeroU32, time::Duration};
use tokio::time::{Instant, sleep};

/// Nanoseconds since creation on the tokio clock.
#[derive(Clone, Debug)]
struct TokioClock {
	origin: Instant,
}

impl Clock for TokioClock {
	type Instant = Nanos;

	fn now(&self) -> Nanos {
		Nanos::from(self.origin.elapsed())
	}
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, TokioClock, NoOpMiddleware<Nanos>>;

pub struct RateWindow {
	limit: usize,
	window: Duration,
	clock: TokioClock,
	limiter: DirectLimiter,
}

impl RateWindow {
	/// Allows `limit` starts per `window`. A limit of 0 is treated as 1.
	#[must_use]
	pub fn new(limit: usize, window: Duration) -> RateWindow {
		let limit = limit.max(1);
		let period = Duration::from_nanos(
			u64::try_from(window.as_nanos().div_ceil(limit as u128).max(1)).unwrap_or(u64::MAX),
		);
		// the period is never zero, so the fallback is unreachable
		let quota = Quota::with_period(period)
			.unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
			.allow_burst(NonZeroU32::MIN);

		let clock = TokioClock { origin: Instant::now() };
		RateWindow {
			limit,
			window,
			limiter: RateLimiter::direct_with_clock(quota, clock.clone()),
			clock,
		}
	}

	#[must_use]
	pub fn limit(&self) -> usize {
		self.limit
	}

	#[must_use]
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Waits until a start is allowed and records it.
	pub async fn acquire(&self) {
		while let Err(not_until) = self.limiter.check() {
			let wait = not_until.wait_time_from(self.clock.now());
			log::trace!("rate limit of {} per {:?} reached, waiting {wait:?}", self.limit, self.window);
			sleep(wait).await;
		}
	}
}

impl fmt::Debug for RateWindow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RateWindow")
			.field("limit", &self.limit)
			.field("window", &self.window)
			.finish()
	}
}
