//! Filter configuration
//!
//! The hosting runtime hands the adapter a document of the form
//!
//! ```json
//! { "devices": [ { "name": "porch", "type": "countdown", "time": 30 } ] }
//! ```
//!
//! Only a structurally broken document fails as a whole: text that is not
//! JSON, or a `devices` field that is not an array.  Everything inside an
//! entry (its shape, a wrongly typed or unknown `type`, a missing,
//! fractional or negative `time`) only rejects that entry, see
//! [`DeviceEntry::to_filter_config`].

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ConfigIssue, FilterError, Result};
use crate::filter::FilterKind;

/// Validated, immutable configuration of one filter device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Display name; the device identifier is derived from it.
    pub name: String,
    /// Filter behaviour.
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// Duration parameter in seconds.
    #[serde(rename = "time")]
    pub duration_secs: u32,
}

impl FilterConfig {
    pub fn new(name: impl Into<String>, kind: FilterKind, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            duration_secs,
        }
    }
}

/// One entry exactly as written in the configuration document.
///
/// Kept as raw JSON so a badly typed field rejects this entry alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceEntry(Value);

impl DeviceEntry {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The configured `name`, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// How this entry is referred to in errors and logs.
    pub fn label(&self) -> String {
        match self.0.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => String::from("<unnamed>"),
        }
    }

    /// Validate this entry.
    pub fn to_filter_config(&self) -> Result<FilterConfig> {
        let reject = |issue| FilterError::Config {
            name: self.label(),
            issue,
        };
        let name = self.name().ok_or_else(|| reject(ConfigIssue::InvalidName))?;

        let kind = match self.0.get("type") {
            None | Some(Value::Null) => return Err(reject(ConfigIssue::MissingKind)),
            Some(Value::String(label)) => label
                .parse::<FilterKind>()
                .map_err(|()| reject(ConfigIssue::UnknownKind(label.clone())))?,
            Some(other) => return Err(reject(ConfigIssue::UnknownKind(other.to_string()))),
        };

        let duration_secs = match self.0.get("time") {
            None | Some(Value::Null) => return Err(reject(ConfigIssue::MissingDuration)),
            Some(time) => match time.as_i64() {
                Some(secs) => u32::try_from(secs)
                    .map_err(|_| reject(ConfigIssue::DurationOutOfRange(secs)))?,
                None => return Err(reject(ConfigIssue::InvalidDuration(time.to_string()))),
            },
        };

        Ok(FilterConfig::new(name, kind, duration_secs))
    }
}

impl From<&FilterConfig> for DeviceEntry {
    fn from(c: &FilterConfig) -> Self {
        Self(json!({
            "name": c.name,
            "type": c.kind.label(),
            "time": c.duration_secs,
        }))
    }
}

/// The whole adapter configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

impl AdapterConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Per-entry validation results, in document order.
    pub fn filters(&self) -> impl Iterator<Item = Result<FilterConfig>> + '_ {
        self.devices.iter().map(DeviceEntry::to_filter_config)
    }
}

/// Read and parse a configuration file.
pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<AdapterConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading filter config {}", path.display()))?;
    let config = AdapterConfig::from_json(&text)
        .with_context(|| format!("parsing filter config {}", path.display()))?;
    log::info!(
        "Loaded {} filter entries from {}",
        config.devices.len(),
        path.display()
    );
    Ok(config)
}
