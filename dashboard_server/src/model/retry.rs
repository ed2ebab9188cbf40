//! Fixed-count retry with exponential backoff.
//!
//! Attempt `i` (0-indexed) that fails is followed by a pause of
//! `base_delay * 2^i` before attempt `i + 1`; there is no pause after the last
//! attempt. With the defaults (3 attempts, 1 s base) the worst case waits
//! 1 s + 2 s.
use std::thread;
use std::time::Duration;

use dashboard_common::{DashboardError, Result};

/// Something that can block the current pass for a while.
pub trait Sleeper {
    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Attempts allowed per run.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause that follows failed attempt `attempt` (0-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `attempt_fn` until it succeeds or the attempts are used up.
    ///
    /// `attempt_fn` receives the 0-indexed attempt number and decides what
    /// counts as success: a value it rejects must come back as an error.
    /// `on_failure` sees every failed attempt before the backoff pause.
    /// Returns `None` once every attempt has failed.
    pub fn run<T, F, L>(&self, sleeper: &dyn Sleeper, mut attempt_fn: F, mut on_failure: L) -> Option<T>
    where
        F: FnMut(u32) -> Result<T>,
        L: FnMut(u32, &DashboardError),
    {
        for attempt in 0..self.max_attempts {
            match attempt_fn(attempt) {
                Ok(value) => return Some(value),
                Err(e) => {
                    on_failure(attempt, &e);
                    if attempt + 1 < self.max_attempts {
                        sleeper.sleep(self.backoff(attempt));
                    }
                }
            }
        }
        None
    }
}
