//! Request pacing for `rate_limits`.

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

use super::retry::Sleeper;
use crate::config::TranslateConfig;

type DirectRateLimiter<C> =
    RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Spaces batch requests evenly so that at most `rate_limits` start per
/// minute. No burst: the first request goes out at once, every later one
/// waits until `60 / rate_limits` seconds have passed since the previous one.
pub struct RequestPacer<C: Clock = DefaultClock> {
    limiter: DirectRateLimiter<C>,
    clock: C,
}

impl RequestPacer {
    /// Pacer on the wall clock, or `None` when pacing is off (unset or 0).
    pub fn from_config(config: &TranslateConfig) -> Option<Self> {
        Self::with_clock(config, DefaultClock::default())
    }
}

impl<C: Clock + Clone> RequestPacer<C> {
    pub fn with_clock(config: &TranslateConfig, clock: C) -> Option<Self> {
        let per_minute = NonZeroU32::new(config.rate_limit?)?;
        let quota = Quota::per_minute(per_minute).allow_burst(NonZeroU32::MIN);

        Some(Self {
            limiter: RateLimiter::direct_with_clock(quota, clock.clone()),
            clock,
        })
    }
}

impl<C: Clock> RequestPacer<C> {
    /// Waits through `sleeper` until the next request may start.
    pub async fn until_ready<S: Sleeper>(&self, sleeper: &S) {
        while let Err(not_until) = self.limiter.check() {
            sleeper
                .sleep(not_until.wait_time_from(self.clock.now()))
                .await;
        }
    }
}
