//! Outbound application events.
//!
//! The registry and its devices emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: write the hosting runtime's property
//! store, log to the console, record them in a test.

use crate::device::id::DeviceId;
use crate::device::property::{Property, PropertyValue};
use crate::filter::FilterKind;

/// Structured events emitted by the filter core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A device was registered.
    DeviceAdded { id: DeviceId, kind: FilterKind },

    /// A device was disposed and removed.
    DeviceRemoved(DeviceId),

    /// A property value actually changed.  Never emitted for a write of
    /// the value already stored.
    PropertyChanged {
        device: DeviceId,
        property: Property,
        value: PropertyValue,
    },
}

impl AppEvent {
    /// The new output level, if this is an output change.
    pub fn output_change(&self) -> Option<(&DeviceId, bool)> {
        match self {
            Self::PropertyChanged {
                device,
                property: Property::Output,
                value: PropertyValue::Bool(b),
            } => Some((device, *b)),
            _ => None,
        }
    }
}
