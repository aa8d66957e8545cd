//! Invalidation coalescing.
//!
//! Every mutation that affects layout reports a [`Trigger`] to the
//! [`InvalidationCoalescer`]. The coalescer folds bursts of triggers into a
//! single deferred pass:
//!
//! ```text
//!            invalidate            begin_pass           guard dropped
//!   Idle  ─────────────▶ PassScheduled ─────────▶ PassRunning ─────────▶ Idle
//!                         ▲   │ invalidate: no-op       │ invalidate: pending
//!                         │   ▼                         │
//!                         └─────────────────────────────┘ (pending was set)
//! ```
//!
//! Only the Idle → PassScheduled transition asks the host to run a pass.
//! Triggers that arrive while a pass is running are remembered and schedule
//! exactly one follow-up pass when the running one ends, so a pass never runs
//! inside another.
//!
//! The coalescer also owns the eviction countdown: every removal restarts it,
//! and when it expires the tool strip evicts retired representations.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use toolstrip_core::DebounceTimer;
use toolstrip_core::logging::targets;

/// Where the coalescer is in its pass cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoalescerState {
    /// Nothing to do.
    #[default]
    Idle,
    /// A pass has been requested from the host and has not started yet.
    PassScheduled,
    /// A pass body is executing.
    PassRunning,
}

/// What caused an invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// An action was added or inserted.
    ActionAdded,
    /// An action was removed.
    ActionRemoved,
    /// All actions were removed or replaced.
    ActionsCleared,
    /// A property of a member action changed.
    ActionChanged,
    /// Inter-item spacing changed.
    SpacingChanged,
    /// Alignment changed.
    AlignmentChanged,
    /// Layout direction changed.
    DirectionChanged,
    /// The default or indicator template changed.
    TemplateChanged,
    /// A configuration policy changed.
    ConfigChanged,
    /// The container was resized.
    Resized,
    /// A pending representation finished creation.
    RepresentationReady,
    /// The host asked for a pass explicitly.
    Forced,
}

/// Host primitive that runs a layout pass later, on the UI thread.
///
/// Implementations must not run the pass synchronously from within
/// [`request_pass`](Self::request_pass).
pub trait PassScheduler: Send + Sync {
    /// Arrange for the tool strip's pass to run soon.
    fn request_pass(&self);
}

impl<F> PassScheduler for F
where
    F: Fn() + Send + Sync,
{
    fn request_pass(&self) {
        self()
    }
}

#[derive(Debug)]
struct Inner {
    state: CoalescerState,
    pending: bool,
    eviction: DebounceTimer,
}

/// Merges invalidation triggers into deferred layout passes.
///
/// The coalescer is shared as `Arc<InvalidationCoalescer>` so that action
/// change notifications and representation providers can invalidate the tool
/// strip without borrowing it.
pub struct InvalidationCoalescer {
    inner: Mutex<Inner>,
    scheduler: Box<dyn PassScheduler>,
}

impl InvalidationCoalescer {
    /// Create an idle coalescer.
    pub fn new(scheduler: impl PassScheduler + 'static, grace_period: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: CoalescerState::Idle,
                pending: false,
                eviction: DebounceTimer::new(grace_period),
            }),
            scheduler: Box::new(scheduler),
        }
    }

    // =========================================================================
    // Pass Cycle
    // =========================================================================

    /// The current state.
    pub fn state(&self) -> CoalescerState {
        self.inner.lock().state
    }

    /// Whether a trigger arrived during the running pass.
    pub fn has_pending(&self) -> bool {
        self.inner.lock().pending
    }

    /// Record an invalidation.
    ///
    /// Returns `true` if this call asked the host for a new pass.
    pub fn invalidate(&self, trigger: Trigger) -> bool {
        let request = {
            let mut inner = self.inner.lock();
            match inner.state {
                CoalescerState::Idle => {
                    inner.state = CoalescerState::PassScheduled;
                    true
                }
                CoalescerState::PassScheduled => false,
                CoalescerState::PassRunning => {
                    inner.pending = true;
                    false
                }
            }
        };

        tracing::trace!(target: targets::COALESCER, ?trigger, scheduled = request, "invalidated");
        if request {
            self.scheduler.request_pass();
        }
        request
    }

    /// Enter the running state.
    ///
    /// Returns `None` if no pass is scheduled, or if a pass is already running.
    /// The pass ends when the returned guard is dropped.
    pub fn begin_pass(&self) -> Option<PassGuard<'_>> {
        let mut inner = self.inner.lock();
        match inner.state {
            CoalescerState::PassScheduled => {
                inner.state = CoalescerState::PassRunning;
                Some(PassGuard { coalescer: self })
            }
            CoalescerState::PassRunning => {
                tracing::debug!(target: targets::COALESCER, "re-entrant pass refused");
                None
            }
            CoalescerState::Idle => None,
        }
    }

    fn finish_pass(&self) {
        let request = {
            let mut inner = self.inner.lock();
            if std::mem::take(&mut inner.pending) {
                inner.state = CoalescerState::PassScheduled;
                true
            } else {
                inner.state = CoalescerState::Idle;
                false
            }
        };

        if request {
            tracing::trace!(target: targets::COALESCER, "scheduling follow-up pass");
            self.scheduler.request_pass();
        }
    }

    // =========================================================================
    // Eviction Countdown
    // =========================================================================

    /// Restart the eviction countdown after a removal.
    pub fn note_removal(&self, now: Instant) {
        self.inner.lock().eviction.restart(now);
    }

    /// Returns `true` once when the eviction countdown has expired.
    pub fn poll_eviction(&self, now: Instant) -> bool {
        self.inner.lock().eviction.poll(now)
    }

    /// Time left before eviction is due, `None` if nothing is pending.
    pub fn time_until_eviction(&self, now: Instant) -> Option<Duration> {
        self.inner.lock().eviction.time_until_fire(now)
    }

    /// Change the grace period applied by later removals.
    pub fn set_grace_period(&self, grace_period: Duration) {
        self.inner.lock().eviction.set_delay(grace_period);
    }

    /// The grace period applied on each removal.
    pub fn grace_period(&self) -> Duration {
        self.inner.lock().eviction.delay()
    }
}

impl fmt::Debug for InvalidationCoalescer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("InvalidationCoalescer")
            .field("state", &inner.state)
            .field("pending", &inner.pending)
            .field("eviction", &inner.eviction)
            .finish_non_exhaustive()
    }
}

/// RAII guard for a running pass.
///
/// Dropping the guard returns the coalescer to Idle, or to PassScheduled if
/// an invalidation arrived while the pass ran.
#[must_use = "the pass ends as soon as the guard is dropped"]
pub struct PassGuard<'a> {
    coalescer: &'a InvalidationCoalescer,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.coalescer.finish_pass();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (InvalidationCoalescer, Arc<AtomicUsize>) {
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = requests.clone();
        let coalescer = InvalidationCoalescer::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(500),
        );
        (coalescer, requests)
    }

    #[test]
    fn test_burst_requests_one_pass() {
        let (coalescer, requests) = counting();

        assert!(coalescer.invalidate(Trigger::ActionAdded));
        assert!(!coalescer.invalidate(Trigger::Resized));
        assert!(!coalescer.invalidate(Trigger::SpacingChanged));

        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.state(), CoalescerState::PassScheduled);
    }

    #[test]
    fn test_pass_returns_to_idle() {
        let (coalescer, requests) = counting();
        coalescer.invalidate(Trigger::ActionAdded);

        {
            let _guard = coalescer.begin_pass().unwrap();
            assert_eq!(coalescer.state(), CoalescerState::PassRunning);
        }

        assert_eq!(coalescer.state(), CoalescerState::Idle);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_pass_when_idle() {
        let (coalescer, _) = counting();
        assert!(coalescer.begin_pass().is_none());
    }

    #[test]
    fn test_reentrant_pass_refused() {
        let (coalescer, _) = counting();
        coalescer.invalidate(Trigger::ActionAdded);

        let _guard = coalescer.begin_pass().unwrap();
        assert!(coalescer.begin_pass().is_none());
    }

    #[test]
    fn test_invalidation_during_pass_schedules_follow_up() {
        let (coalescer, requests) = counting();
        coalescer.invalidate(Trigger::ActionAdded);

        {
            let _guard = coalescer.begin_pass().unwrap();
            assert!(!coalescer.invalidate(Trigger::ActionChanged));
            assert!(!coalescer.invalidate(Trigger::Resized));
            assert!(coalescer.has_pending());
            assert_eq!(requests.load(Ordering::SeqCst), 1);
        }

        assert_eq!(coalescer.state(), CoalescerState::PassScheduled);
        assert!(!coalescer.has_pending());
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_eviction_countdown_restarts() {
        let (coalescer, _) = counting();
        let start = Instant::now();

        coalescer.note_removal(start);
        coalescer.note_removal(start + Duration::from_millis(300));

        assert!(!coalescer.poll_eviction(start + Duration::from_millis(600)));
        assert_eq!(
            coalescer.time_until_eviction(start + Duration::from_millis(600)),
            Some(Duration::from_millis(200))
        );
        assert!(coalescer.poll_eviction(start + Duration::from_millis(800)));
        assert!(!coalescer.poll_eviction(start + Duration::from_millis(900)));
        assert_eq!(coalescer.time_until_eviction(start), None);
    }

    #[test]
    fn test_grace_period_change() {
        let (coalescer, _) = counting();
        coalescer.set_grace_period(Duration::from_millis(50));
        assert_eq!(coalescer.grace_period(), Duration::from_millis(50));
    }
}
