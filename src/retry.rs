// src/retry.rs
//
// Bounded retry with randomized exponential backoff. Attempt n (1-based)
// waits a uniform random time in [min, clamp(multiplier * 2^(n-1), min, max)].

use std::{thread, time::Duration};

use rand::Rng;
use tracing::warn;

use crate::config::consts::{RETRY_MAX_ATTEMPTS, RETRY_MAX_BACKOFF_MS, RETRY_MIN_BACKOFF_MS};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    /// Base unit of the exponential curve.
    pub multiplier: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            min_backoff: Duration::from_millis(RETRY_MIN_BACKOFF_MS),
            max_backoff: Duration::from_millis(RETRY_MAX_BACKOFF_MS),
            multiplier: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Upper bound of the wait after failed attempt `attempt`.
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        let exp = 2u32.saturating_pow(attempt.saturating_sub(1));
        let raw = self.multiplier.saturating_mul(exp);
        raw.clamp(self.min_backoff, self.max_backoff.max(self.min_backoff))
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        let lo = self.min_backoff;
        let hi = self.backoff_ceiling(attempt);
        if hi <= lo {
            return lo;
        }
        let ms = rand::rng().random_range(lo.as_millis()..=hi.as_millis());
        Duration::from_millis(ms as u64)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    /// The last error is returned.
    pub fn run<T, E, F>(&self, sleeper: &dyn Sleeper, what: &str, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display + Retryable,
        F: FnMut() -> Result<T, E>,
    {
        let max = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < max && e.is_retryable() => {
                    let wait = self.backoff(attempt);
                    warn!("{what} failed (attempt {attempt}/{max}): {e}; retrying in {wait:?}");
                    sleeper.sleep(wait);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether an error is worth another attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for crate::error::LlmError {
    fn is_retryable(&self) -> bool { self.is_transient() }
}

pub trait Sleeper: Send + Sync {
    fn sleep(&self, d: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        thread::sleep(d);
    }
}
