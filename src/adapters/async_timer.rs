//! Reactor-driven timer backend.
//!
//! Each armed timer is a small task on the runtime's `edge-executor`
//! `LocalExecutor`, sleeping on an `async-io-mini` reactor timer.  When
//! it wakes it does not touch any device: it posts
//! [`RuntimeEvent::TimerFired`] into the runtime's event channel, so fires
//! are handled on the same single dispatch point as host commands.
//!
//! Cancelling drops the task.  A fire already sitting in the channel when
//! its timer is cancelled carries a handle the device no longer holds and
//! is discarded there.

use std::collections::BTreeMap;

use core::time::Duration;

use edge_executor::Task;
use log::debug;

use crate::app::ports::TimerPort;
use crate::device::id::DeviceId;
use crate::runtime::{EventChannel, Executor, RuntimeEvent};
use crate::timer::{MIN_REPEAT_PERIOD, TimerHandle, TimerMode};

/// [`TimerPort`] backed by executor tasks.
///
/// `'e` borrows the executor; `'a` is what the spawned timer futures may
/// borrow (the event channel).
pub struct AsyncTimers<'e, 'a> {
    executor: &'e Executor<'a>,
    events: &'a EventChannel,
    next_handle: u64,
    tasks: BTreeMap<TimerHandle, Task<()>>,
}

impl<'e, 'a> AsyncTimers<'e, 'a> {
    pub fn new(executor: &'e Executor<'a>, events: &'a EventChannel) -> Self {
        Self {
            executor,
            events,
            next_handle: 0,
            tasks: BTreeMap::new(),
        }
    }

    /// Number of timer tasks still running.
    pub fn live_count(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl TimerPort for AsyncTimers<'_, '_> {
    fn start(&mut self, owner: &DeviceId, mode: TimerMode, period: Duration) -> TimerHandle {
        // Completed one-shots are only reaped here.
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_handle += 1;
        let handle = TimerHandle::new(self.next_handle);
        let period = match mode {
            TimerMode::OneShot => period,
            TimerMode::Repeating => period.max(MIN_REPEAT_PERIOD),
        };
        let events = self.events;
        let device = owner.clone();

        let task = self.executor.spawn(async move {
            loop {
                async_io_mini::Timer::after(period).await;
                events
                    .send(RuntimeEvent::TimerFired {
                        device: device.clone(),
                        handle,
                    })
                    .await;
                if mode == TimerMode::OneShot {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.tasks.remove(&handle).is_some() {
            debug!("async timers: cancelled {}", handle.raw());
        }
    }
}
