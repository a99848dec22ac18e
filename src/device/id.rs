//! Device identity derived from the configured filter name.
//!
//! Produces a stable identifier in the form `filters-device-<slug>`, where
//! the slug is the configured name with every whitespace run and every `%`
//! replaced by `-`.  The identifier is:
//! - Deterministic across restarts (pure function of the name)
//! - The registry key for routing input changes and removals
//! - Reported to the hosting runtime in every outbound event

use core::cmp::Ordering;
use core::fmt;

use serde::Serialize;

use crate::error::{ConfigIssue, FilterError, Result};

/// Maximum identifier length in bytes.
pub const DEVICE_ID_CAPACITY: usize = 256;

/// Prefix shared by every filter device identifier.
pub const DEVICE_ID_PREFIX: &str = "filters-device-";

/// Fixed-capacity device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeviceId(heapless::String<DEVICE_ID_CAPACITY>);

impl DeviceId {
    /// Wrap an identifier as handed back by the hosting runtime.
    /// Returns `None` if it exceeds [`DEVICE_ID_CAPACITY`].
    pub fn new(raw: &str) -> Option<Self> {
        let mut id = heapless::String::new();
        id.push_str(raw).ok()?;
        Some(Self(id))
    }

    /// Derive the identifier for a configured filter name.
    pub fn from_name(name: &str) -> Result<Self> {
        let too_long = || FilterError::Config {
            name: name.to_owned(),
            issue: ConfigIssue::NameTooLong,
        };

        let mut id = heapless::String::new();
        id.push_str(DEVICE_ID_PREFIX).map_err(|_| too_long())?;

        let mut in_space = false;
        for c in name.chars() {
            if c.is_whitespace() {
                if !in_space {
                    id.push('-').map_err(|_| too_long())?;
                }
                in_space = true;
                continue;
            }
            in_space = false;
            let c = if c == '%' { '-' } else { c };
            id.push(c).map_err(|_| too_long())?;
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialOrd for DeviceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeviceId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
