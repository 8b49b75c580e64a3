//! Reconnect delays for the live feed.
//!
//! Exponential doubling from `initial_delay`, capped at `max_delay`, with
//! "equal jitter": the actual wait is drawn uniformly from `[d/2, d]`.
//! Attempts are 1-based and count retries after a close or a failed connect.

use rand::Rng;
use std::time::Duration;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Caps the exponent so the multiplication below never needs more than 2^16.
const MAX_DOUBLINGS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Retries allowed before giving up. `0` retries forever.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ReconnectPolicy {
    /// True once `attempt` exceeds the configured cap.
    pub fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts != 0 && attempt > self.max_attempts
    }

    /// The un-jittered delay before retry number `attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(MAX_DOUBLINGS);
        self.initial_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }

    /// The delay to wait before retry number `attempt`, or `None` when the
    /// policy says to stop.
    pub fn delay_for(&self, attempt: u32, rng: &mut impl Rng) -> Option<Duration> {
        if self.exhausted(attempt) {
            return None;
        }
        let base = self.base_delay(attempt).as_millis() as u64;
        if base == 0 {
            return Some(Duration::ZERO);
        }
        Some(Duration::from_millis(rng.gen_range(base / 2..=base)))
    }
}
