//! Single-threaded adapter runtime.
//!
//! Everything that can change device state (host commands and timer
//! fires) arrives as a [`RuntimeEvent`] on one bounded `embassy-sync`
//! channel.  [`FilterRuntime::run`] drains that channel alongside an
//! `edge-executor` `LocalExecutor` that hosts the timer tasks, handling
//! each event to completion before the next, so a device never sees two
//! handlers interleave.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  futures_lite::future::block_on(or(..))                  │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                      │  │
//!  │  │                                                    │  │
//!  │  │  ┌──────────────┐   TimerFired   ┌──────────────┐  │  │
//!  │  │  │ timer tasks  │──────────────▶│ FilterRuntime │  │  │
//!  │  │  │ (reactor ⏱)  │                │    ::run      │  │  │
//!  │  │  └──────────────┘                └──────────────┘  │  │
//!  │  │                        Command ▲                   │  │
//!  │  └────────────────────────────────┼───────────────────┘  │
//!  └───────────────────────────────────┼──────────────────────┘
//!                                submit()
//! ```

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::adapters::async_timer::AsyncTimers;
use crate::app::commands::AdapterCommand;
use crate::app::ports::EventSink;
use crate::app::registry::FilterRegistry;
use crate::device::id::DeviceId;
use crate::error::{FilterError, Result};
use crate::timer::TimerHandle;

/// Depth of the runtime event channel.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Executor run queue size.
pub const EXECUTOR_QUEUE_DEPTH: usize = 64;

pub type Executor<'a> = edge_executor::LocalExecutor<'a, EXECUTOR_QUEUE_DEPTH>;

/// Inbound work for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    Command(AdapterCommand),
    TimerFired { device: DeviceId, handle: TimerHandle },
}

/// The runtime's event channel.  Owned by the caller and shared by
/// reference with the timer tasks.
pub type EventChannel = Channel<NoopRawMutex, RuntimeEvent, EVENT_QUEUE_DEPTH>;

/// Queue a host command without blocking.
pub fn submit(events: &EventChannel, cmd: AdapterCommand) -> Result<()> {
    events
        .try_send(RuntimeEvent::Command(cmd))
        .map_err(|_| FilterError::QueueFull)
}

/// Registry plus the reactor timer backend and the host's event sink.
pub struct FilterRuntime<'e, 'a, S: EventSink> {
    registry: FilterRegistry,
    timers: AsyncTimers<'e, 'a>,
    events: &'a EventChannel,
    sink: S,
    errors: Vec<FilterError>,
}

impl<'e, 'a, S: EventSink> FilterRuntime<'e, 'a, S> {
    pub fn new(
        executor: &'e Executor<'a>,
        events: &'a EventChannel,
        registry: FilterRegistry,
        sink: S,
    ) -> Self {
        Self {
            registry,
            timers: AsyncTimers::new(executor, events),
            events,
            sink,
            errors: Vec::new(),
        }
    }

    /// Handle one event to completion.
    pub fn dispatch(&mut self, event: RuntimeEvent) -> Result<()> {
        match event {
            RuntimeEvent::Command(cmd) => {
                self.registry
                    .handle_command(cmd, &mut self.timers, &mut self.sink)
            }
            RuntimeEvent::TimerFired { device, handle } => {
                self.registry.timer_fired(&device, handle, &mut self.sink);
                Ok(())
            }
        }
    }

    /// Drain the event channel until an [`AdapterCommand::Unload`] has
    /// been handled.  Failed commands are logged and kept for
    /// [`FilterRuntime::take_errors`].
    pub async fn run(&mut self) {
        info!("FilterRuntime: running with {} devices", self.registry.len());
        loop {
            let event = self.events.receive().await;
            let unload = matches!(event, RuntimeEvent::Command(AdapterCommand::Unload));
            if let Err(e) = self.dispatch(event) {
                warn!("FilterRuntime: {}", e);
                self.errors.push(e);
            }
            if unload {
                break;
            }
        }
        info!("FilterRuntime: stopped");
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Timer tasks still alive on the executor.
    pub fn live_timers(&self) -> usize {
        self.timers.live_count()
    }

    /// Errors from commands handled by [`FilterRuntime::run`].
    pub fn take_errors(&mut self) -> Vec<FilterError> {
        core::mem::take(&mut self.errors)
    }

    pub fn into_parts(self) -> (FilterRegistry, S) {
        (self.registry, self.sink)
    }
}

/// Run `runtime` on the calling thread until it unloads.
///
/// The executor only drives the timer tasks; the dispatch loop runs beside
/// it and ends the call once `Unload` has been handled.
pub fn run_blocking<'a, S: EventSink>(
    executor: &Executor<'a>,
    runtime: &mut FilterRuntime<'_, 'a, S>,
) {
    let timers = executor.run(core::future::pending::<()>());
    futures_lite::future::block_on(futures_lite::future::or(runtime.run(), timers));
}
