//! Virtual-clock timer backend.
//!
//! Implements [`TimerPort`] without any real time source: timers are kept
//! in a pending list and only fire when the caller advances the clock.
//! Fires are delivered one at a time in due-time order (ties in arming
//! order), each one fully handled before the next is looked at, which is
//! exactly the run-to-completion model of the async runtime.
//!
//! ```text
//!  advance(by) ─▶ next_fire(now + by) ─▶ registry.timer_fired(owner, handle)
//!                      ▲                          │
//!                      └──── start / cancel ◀─────┘
//! ```

use core::time::Duration;

use log::debug;

use crate::app::ports::{EventSink, TimerPort};
use crate::app::registry::FilterRegistry;
use crate::device::id::DeviceId;
use crate::timer::{MIN_REPEAT_PERIOD, TimerHandle, TimerMode};

/// A timer that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer {
    pub owner: DeviceId,
    pub handle: TimerHandle,
    /// Virtual time of the fire.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    owner: DeviceId,
    handle: TimerHandle,
    mode: TimerMode,
    period: Duration,
    due: Duration,
}

/// Deterministic timer backend driven by [`ManualTimers::advance`].
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time.  Repeating timers are rescheduled one period later.
    pub fn next_fire(&mut self, until: Duration) -> Option<FiredTimer> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i)?;

        let timer = &mut self.pending[idx];
        let fired = FiredTimer {
            owner: timer.owner.clone(),
            handle: timer.handle,
            at: timer.due,
        };
        let mode = timer.mode;
        if mode == TimerMode::Repeating {
            timer.due += timer.period.max(MIN_REPEAT_PERIOD);
        } else {
            self.pending.remove(idx);
        }
        self.now = self.now.max(fired.at);
        Some(fired)
    }

    /// Advance the clock by `by`, delivering every fire that comes due to
    /// `registry`, in order.
    pub fn advance(&mut self, by: Duration, registry: &mut FilterRegistry, sink: &mut impl EventSink) {
        let until = self.now + by;
        while let Some(fired) = self.next_fire(until) {
            debug!("manual clock: {} fires at {:?}", fired.owner, fired.at);
            registry.timer_fired(&fired.owner, fired.handle, sink);
        }
        self.now = until;
    }
}

impl TimerPort for ManualTimers {
    fn start(&mut self, owner: &DeviceId, mode: TimerMode, period: Duration) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle::new(self.next_handle);
        self.pending.push(PendingTimer {
            owner: owner.clone(),
            handle,
            mode,
            period,
            due: self.now + period,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }
}
