//! Monotonic clocks and the debounce timer.
//!
//! The engine never reads the system time directly. Hosts hand it a [`Clock`]
//! and drive timers by polling them from their own event loop, using
//! [`DebounceTimer::time_until_fire`] to decide how long to sleep.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::logging::targets;

/// A source of monotonic time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another
/// to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// A cancel-and-restart one-shot countdown.
///
/// Every [`restart`](Self::restart) pushes the deadline out to `now + delay`,
/// discarding the previous one. [`poll`](Self::poll) reports the expiry once
/// and disarms the timer.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// Create a disarmed timer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The delay applied on each restart.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. An armed deadline is left as it was.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Arm the timer to fire `delay` after `now`, replacing any earlier deadline.
    pub fn restart(&mut self, now: Instant) {
        let deadline = now + self.delay;
        tracing::trace!(target: targets::TIMER, delay_ms = self.delay.as_millis() as u64, "debounce restarted");
        self.deadline = Some(deadline);
    }

    /// Disarm the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the deadline, `None` when disarmed.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` exactly once when the deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                tracing::trace!(target: targets::TIMER, "debounce fired");
                true
            }
            _ => false,
        }
    }
}
