//! Per-device timer bookkeeping.
//!
//! A device owns exactly one [`TimerSlot`].  The slot talks to whatever
//! backend implements [`TimerPort`] (virtual clock in tests, reactor
//! timers at runtime) and enforces the two lifecycle rules:
//!
//! - at most one outstanding timer per device; arming cancels the old one
//! - fires carrying a handle the slot no longer holds are stale and ignored
//!
//! ```text
//!   arm ──▶ [Armed(handle, mode)] ──fire(one-shot)──▶ [Idle]
//!              │        ▲
//!              │        └──fire(repeating)
//!              └──cancel──▶ [Idle]
//! ```

use core::time::Duration;

use log::debug;

use crate::app::ports::TimerPort;
use crate::device::id::DeviceId;

/// Opaque identifier of one armed timer, unique per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Whether a timer fires once or keeps firing every period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    OneShot,
    Repeating,
}

/// Floor applied by timer backends to a zero-length repeating period so a
/// repeating timer can never fire in a tight loop.
pub const MIN_REPEAT_PERIOD: Duration = Duration::from_millis(1);

/// Convert a configured duration in whole seconds.
pub fn secs(duration_secs: u32) -> Duration {
    Duration::from_secs(u64::from(duration_secs))
}

/// The single timer a device may hold.
#[derive(Debug, Default)]
pub struct TimerSlot {
    active: Option<(TimerHandle, TimerMode)>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Arm a new timer, cancelling any outstanding one first.
    pub fn arm(
        &mut self,
        owner: &DeviceId,
        mode: TimerMode,
        period: Duration,
        timers: &mut impl TimerPort,
    ) -> TimerHandle {
        self.cancel(timers);
        let handle = timers.start(owner, mode, period);
        debug!("{owner}: armed {mode:?} timer {} for {period:?}", handle.raw());
        self.active = Some((handle, mode));
        handle
    }

    /// Cancel the outstanding timer.  Returns `false` if there was none.
    pub fn cancel(&mut self, timers: &mut impl TimerPort) -> bool {
        match self.active.take() {
            Some((handle, _)) => {
                timers.cancel(handle);
                true
            }
            None => false,
        }
    }

    /// Accept a fire notification.
    ///
    /// Returns the mode of the timer if `handle` is the one currently held;
    /// a one-shot is cleared from the slot.  Returns `None` for stale handles.
    pub fn acknowledge(&mut self, handle: TimerHandle) -> Option<TimerMode> {
        let (held, mode) = self.active?;
        if held != handle {
            return None;
        }
        if mode == TimerMode::OneShot {
            self.active = None;
        }
        Some(mode)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.active.map(|(h, _)| h)
    }

    pub fn mode(&self) -> Option<TimerMode> {
        self.active.map(|(_, m)| m)
    }
}
