//! Filter registry: the adapter-level dispatch point.
//!
//! [`FilterRegistry`] owns every [`FilterDevice`] keyed by its
//! [`DeviceId`].  It exposes a hardware-agnostic API; the timer backend
//! and the event sink are injected at each call site, so the whole
//! registry is testable with the virtual clock and a recording sink.
//!
//! ```text
//!  AdapterCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                     │     FilterRegistry      │
//!  timer fire     ──▶ │  id → FilterDevice      │ ◀─▶ TimerPort
//!                     └────────────────────────┘
//! ```

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::config::{AdapterConfig, FilterConfig};
use crate::device::FilterDevice;
use crate::device::id::DeviceId;
use crate::device::property::{Property, PropertyValue};
use crate::error::{FilterError, Result};
use crate::timer::TimerHandle;

use super::commands::AdapterCommand;
use super::events::AppEvent;
use super::ports::{EventSink, TimerPort};

/// All configured filter devices.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    devices: BTreeMap<DeviceId, FilterDevice>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self {
            devices: BTreeMap::new(),
        }
    }

    /// Build a registry from a configuration document.
    ///
    /// Entries are registered in document order.  A rejected entry is
    /// logged and reported in the returned list; the others still load.
    pub fn from_config(config: &AdapterConfig, sink: &mut impl EventSink) -> (Self, Vec<FilterError>) {
        let mut registry = Self::new();
        let mut errors = Vec::new();
        for entry in &config.devices {
            let added = entry
                .to_filter_config()
                .and_then(|c| registry.add_device(c, sink));
            if let Err(e) = added {
                warn!("FiltersAdapter: skipping entry '{}': {}", entry.label(), e);
                errors.push(e);
            }
        }
        info!(
            "FiltersAdapter: {} devices loaded, {} entries rejected",
            registry.len(),
            errors.len()
        );
        (registry, errors)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Create and register a device.  A duplicate identifier is rejected
    /// and the existing device is left untouched.
    pub fn add_device(&mut self, config: FilterConfig, sink: &mut impl EventSink) -> Result<DeviceId> {
        let device = FilterDevice::from_config(config)?;
        let id = device.id().clone();
        if self.devices.contains_key(&id) {
            return Err(FilterError::DuplicateId(id));
        }
        info!(
            "FiltersAdapter: added {} ({}, {}s)",
            id,
            device.kind(),
            device.duration_secs()
        );
        sink.emit(&AppEvent::DeviceAdded {
            id: id.clone(),
            kind: device.kind(),
        });
        self.devices.insert(id.clone(), device);
        Ok(id)
    }

    /// Dispose and remove a device.  The timer is cancelled before this returns.
    pub fn remove_device(
        &mut self,
        id: &DeviceId,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> Result<FilterDevice> {
        let mut device = self
            .devices
            .remove(id)
            .ok_or_else(|| FilterError::UnknownDevice(id.clone()))?;
        device.dispose(timers);
        info!("FiltersAdapter: device {} was unpaired", id);
        sink.emit(&AppEvent::DeviceRemoved(id.clone()));
        Ok(device)
    }

    /// Dispose every device.  Devices stay registered but hold no timers.
    pub fn unload(&mut self, timers: &mut impl TimerPort) {
        for device in self.devices.values_mut() {
            device.dispose(timers);
        }
        info!("FiltersAdapter: unloaded {} devices", self.devices.len());
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Route an input change reported by the hosting runtime.
    pub fn input_changed(
        &mut self,
        id: &DeviceId,
        input: bool,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.device_mut(id)?.on_input_changed(input, timers, sink);
        Ok(())
    }

    /// Route a property write.
    pub fn set_property(
        &mut self,
        id: &DeviceId,
        property: Property,
        value: PropertyValue,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.device_mut(id)?
            .set_property(property, value, timers, sink)
    }

    /// Route a timer fire.  Fires for devices that are no longer
    /// registered are dropped: their timer was cancelled on removal and
    /// anything still in flight is obsolete.
    pub fn timer_fired(&mut self, id: &DeviceId, handle: TimerHandle, sink: &mut impl EventSink) {
        match self.devices.get_mut(id) {
            Some(device) => {
                device.on_timer_fired(handle, sink);
            }
            None => debug!("FiltersAdapter: dropping timer {} for removed {}", handle.raw(), id),
        }
    }

    /// Process one command from the hosting runtime.
    pub fn handle_command(
        &mut self,
        cmd: AdapterCommand,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AdapterCommand::SetProperty {
                device,
                property,
                value,
            } => self.set_property(&device, property, value, timers, sink),
            AdapterCommand::AddDevice(config) => self.add_device(config, sink).map(|_| ()),
            AdapterCommand::RemoveDevice(id) => self.remove_device(&id, timers, sink).map(|_| ()),
            AdapterCommand::Unload => {
                self.unload(timers);
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn device(&self, id: &DeviceId) -> Option<&FilterDevice> {
        self.devices.get(id)
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    pub fn devices(&self) -> impl Iterator<Item = &FilterDevice> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    // ── Internal ──────────────────────────────────────────────

    fn device_mut(&mut self, id: &DeviceId) -> Result<&mut FilterDevice> {
        self.devices
            .get_mut(id)
            .ok_or_else(|| FilterError::UnknownDevice(id.clone()))
    }
}
