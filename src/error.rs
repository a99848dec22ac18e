//! Unified error types for the filters adapter.
//!
//! A single `FilterError` enum that every subsystem converts into, so the
//! adapter edge handles failures uniformly.  Every variant is local to one
//! device or one configuration entry: nothing here aborts the registry.

use core::fmt;

use crate::device::id::DeviceId;
use crate::device::property::Property;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A configuration entry could not be turned into a device.
    Config { name: String, issue: ConfigIssue },
    /// A device with the same identifier is already registered.
    DuplicateId(DeviceId),
    /// No device is registered under this identifier.
    UnknownDevice(DeviceId),
    /// A repeating timer was configured with a zero period.
    InvalidDuration { device: DeviceId, secs: u32 },
    /// The property name is not part of the device surface.
    UnknownProperty(String),
    /// The property can only be written by the filter itself.
    ReadOnlyProperty(Property),
    /// The written value has the wrong type for the property.
    PropertyType {
        property: Property,
        expected: &'static str,
    },
    /// The runtime event queue is full; the command was dropped.
    QueueFull,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { name, issue } => write!(f, "config entry '{name}': {issue}"),
            Self::DuplicateId(id) => write!(f, "device {id} already exists"),
            Self::UnknownDevice(id) => write!(f, "device {id} not found"),
            Self::InvalidDuration { device, secs } => {
                write!(f, "device {device}: invalid repeating period of {secs}s")
            }
            Self::UnknownProperty(name) => write!(f, "unknown property '{name}'"),
            Self::ReadOnlyProperty(p) => write!(f, "property '{p}' is read-only"),
            Self::PropertyType { property, expected } => {
                write!(f, "property '{property}' expects {expected}")
            }
            Self::QueueFull => write!(f, "event queue full"),
        }
    }
}

impl std::error::Error for FilterError {}

// ---------------------------------------------------------------------------
// Configuration issues
// ---------------------------------------------------------------------------

/// Why a single configuration entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// The entry has no string `name`.
    InvalidName,
    /// `type` is missing.
    MissingKind,
    /// `type` is not one of the four known filter kinds.
    UnknownKind(String),
    /// `time` is missing.
    MissingDuration,
    /// `time` is not a whole number (as written in the document).
    InvalidDuration(String),
    /// `time` is negative or does not fit in 32 bits.
    DurationOutOfRange(i64),
    /// The derived device identifier exceeds the identifier capacity.
    NameTooLong,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must be a string"),
            Self::MissingKind => write!(f, "missing type"),
            Self::UnknownKind(kind) => write!(f, "unknown filter type '{kind}'"),
            Self::MissingDuration => write!(f, "missing time"),
            Self::InvalidDuration(raw) => write!(f, "time {raw} is not a whole number of seconds"),
            Self::DurationOutOfRange(secs) => write!(f, "time {secs} out of range"),
            Self::NameTooLong => write!(f, "name too long for a device id"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, FilterError>;
