//! Inbound commands to the filter registry.
//!
//! These represent requests from the hosting runtime that the
//! [`FilterRegistry`](super::registry::FilterRegistry) interprets and acts
//! upon.  The async runtime queues them alongside timer fires so both are
//! handled on the same single dispatch point.

use crate::config::FilterConfig;
use crate::device::id::DeviceId;
use crate::device::property::{Property, PropertyValue};

/// Commands that the hosting runtime can send into the filter core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCommand {
    /// Write a device property (`input` or `time`).
    SetProperty {
        device: DeviceId,
        property: Property,
        value: PropertyValue,
    },

    /// Register a new device.
    AddDevice(FilterConfig),

    /// Dispose and remove a device (unpair).
    RemoveDevice(DeviceId),

    /// Dispose every device; the adapter is shutting down.
    Unload,
}
