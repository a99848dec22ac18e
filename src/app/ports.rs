//! Port traits: the hexagonal boundary between filter logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FilterRegistry / FilterDevice (domain)
//! ```
//!
//! Driven adapters (timer backends, event sinks) implement these traits.
//! The registry and devices take them as `&mut impl Port` at each call
//! site, so the domain never owns a clock or a transport.

use core::time::Duration;

use crate::device::id::DeviceId;
use crate::timer::{TimerHandle, TimerMode};

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → hosting runtime / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (host property store, log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Timer port (domain ↔ clock)
// ───────────────────────────────────────────────────────────────

/// Backend that schedules delayed and repeating fire notifications.
///
/// A fire is reported back to the registry as `(owner, handle)`; how it
/// gets there (direct call, event queue) is up to the backend.
///
/// # Contract
///
/// - Handles are never reused by one backend instance.
/// - Once `cancel` returns, no fire for that handle is delivered later,
///   or any fire already in flight is recognisable as stale by its handle.
/// - `cancel` on an unknown, fired or already-cancelled handle is a no-op.
/// - A zero `period` fires as soon as the backend can schedule it.
pub trait TimerPort {
    /// Schedule a timer for `owner` and return its handle.
    fn start(&mut self, owner: &DeviceId, mode: TimerMode, period: Duration) -> TimerHandle;

    /// Cancel a timer.
    fn cancel(&mut self, handle: TimerHandle);
}
