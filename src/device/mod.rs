//! A filter device: one [`FilterKind`] bound to its state, timer and properties.
//!
//! ```text
//!  input change ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │ FilterDevice                 │     (output changes)
//!  timer fire   ──▶ │ FilterKind · FilterState     │
//!                   │ TimerSlot  · time property   │ ◀─▶ TimerPort
//!                   └──────────────────────────────┘
//! ```
//!
//! The device is the only writer of its [`FilterState`].  It suppresses
//! duplicate input notifications, executes the timer action chosen by the
//! filter, and emits `output` only when the level actually changes.

pub mod id;
pub mod property;

use log::{debug, info};
use serde::Serialize;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, TimerPort};
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::filter::{FilterKind, FilterState, TimerAction};
use crate::timer::{self, TimerHandle, TimerMode, TimerSlot};

use id::DeviceId;
use property::{Property, PropertyDescription, PropertyValue};

/// Device `type` reported to the hosting runtime.
pub const DEVICE_TYPE: &str = "filter";

/// Capabilities reported to the hosting runtime.
pub const DEVICE_CAPABILITIES: [&str; 2] = ["Light", "OnOffSwitch"];

/// Everything the hosting runtime needs to register a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescription {
    pub id: DeviceId,
    pub title: String,
    #[serde(rename = "type")]
    pub device_type: &'static str,
    #[serde(rename = "@type")]
    pub capabilities: [&'static str; 2],
    pub description: &'static str,
    pub properties: [PropertyDescription; 3],
}

/// One configured filter instance.
#[derive(Debug)]
pub struct FilterDevice {
    id: DeviceId,
    config: FilterConfig,
    /// Live value of the `time` property, used the next time a timer is armed.
    duration_secs: u32,
    state: FilterState,
    timer: TimerSlot,
}

impl FilterDevice {
    /// Build a device from validated configuration.
    ///
    /// Fails with [`FilterError::InvalidDuration`] for a zero-period square wave.
    pub fn new(id: DeviceId, config: FilterConfig) -> Result<Self> {
        if !config.kind.accepts_duration(config.duration_secs) {
            return Err(FilterError::InvalidDuration {
                device: id,
                secs: config.duration_secs,
            });
        }
        Ok(Self {
            id,
            duration_secs: config.duration_secs,
            config,
            state: FilterState::default(),
            timer: TimerSlot::new(),
        })
    }

    /// Build a device, deriving its identifier from the configured name.
    pub fn from_config(config: FilterConfig) -> Result<Self> {
        let id = DeviceId::from_name(&config.name)?;
        Self::new(id, config)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn kind(&self) -> FilterKind {
        self.config.kind
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn output(&self) -> bool {
        self.state.output
    }

    pub fn input(&self) -> bool {
        self.state.last_input
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Handle of the outstanding timer, if any.
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer.handle()
    }

    pub fn description(&self) -> DeviceDescription {
        DeviceDescription {
            id: self.id.clone(),
            title: self.config.name.clone(),
            device_type: DEVICE_TYPE,
            capabilities: DEVICE_CAPABILITIES,
            description: self.kind().description(),
            properties: Property::ALL.map(Property::describe),
        }
    }

    /// Current value of a property.
    pub fn property(&self, property: Property) -> PropertyValue {
        match property {
            Property::Time => PropertyValue::from(self.duration_secs),
            Property::Input => PropertyValue::Bool(self.state.last_input),
            Property::Output => PropertyValue::Bool(self.state.output),
        }
    }

    // ── Triggers ──────────────────────────────────────────────

    /// React to a new input level.
    ///
    /// A no-op when `input` equals the last level seen, so direct callers
    /// get the same "only on change" guarantee as the hosting runtime.
    /// Returns whether the output changed.
    pub fn on_input_changed(
        &mut self,
        input: bool,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if input == self.state.last_input {
            return false;
        }
        let transition = self
            .kind()
            .on_input_changed(&self.state, self.duration_secs, input);
        self.state.last_input = input;
        debug!(
            "{}: input -> {} ({:?})",
            self.id, input, transition.timer
        );

        match transition.timer {
            TimerAction::None => {}
            TimerAction::StartOneShot(s) => {
                self.timer
                    .arm(&self.id, TimerMode::OneShot, timer::secs(s), timers);
            }
            TimerAction::StartRepeating(s) => {
                self.timer
                    .arm(&self.id, TimerMode::Repeating, timer::secs(s), timers);
            }
            TimerAction::Cancel => {
                self.timer.cancel(timers);
            }
        }
        self.state.timer_active = self.timer.is_active();

        self.write_output(transition.output, sink)
    }

    /// React to a timer fire.  Fires for a handle this device no longer
    /// holds (cancelled or replaced) are ignored.  Returns whether the
    /// output changed.
    pub fn on_timer_fired(&mut self, handle: TimerHandle, sink: &mut impl EventSink) -> bool {
        if self.timer.acknowledge(handle).is_none() {
            debug!("{}: ignoring stale timer {}", self.id, handle.raw());
            return false;
        }
        self.state.timer_active = self.timer.is_active();
        let output = self.kind().on_timer_fired(&self.state);
        self.write_output(output, sink)
    }

    /// Cancel any outstanding timer.  Always safe, idempotent.
    pub fn dispose(&mut self, timers: &mut impl TimerPort) {
        if self.timer.cancel(timers) {
            info!("{}: disposed, timer cancelled", self.id);
        }
        self.state.timer_active = false;
    }

    // ── Property surface ──────────────────────────────────────

    /// Write a property on behalf of the hosting runtime.
    ///
    /// Writing the stored value is accepted and does nothing.
    pub fn set_property(
        &mut self,
        property: Property,
        value: PropertyValue,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match property {
            Property::Output => Err(FilterError::ReadOnlyProperty(Property::Output)),
            Property::Input => {
                let input = value.as_bool(property)?;
                if input != self.state.last_input {
                    self.emit_property(Property::Input, PropertyValue::Bool(input), sink);
                    self.on_input_changed(input, timers, sink);
                }
                Ok(())
            }
            Property::Time => {
                let secs = value.as_secs(property)?;
                if !self.kind().accepts_duration(secs) {
                    return Err(FilterError::InvalidDuration {
                        device: self.id.clone(),
                        secs,
                    });
                }
                if secs != self.duration_secs {
                    self.duration_secs = secs;
                    self.emit_property(Property::Time, PropertyValue::from(secs), sink);
                }
                Ok(())
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn write_output(&mut self, output: bool, sink: &mut impl EventSink) -> bool {
        if output == self.state.output {
            return false;
        }
        self.state.output = output;
        self.emit_property(Property::Output, PropertyValue::Bool(output), sink);
        true
    }

    fn emit_property(&self, property: Property, value: PropertyValue, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::PropertyChanged {
            device: self.id.clone(),
            property,
            value,
        });
    }
}
