//! The property surface a filter device exposes to the hosting runtime.
//!
//! | name     | `@type`         | type    | unit    | writable by host |
//! |----------|-----------------|---------|---------|------------------|
//! | `time`   | `Number`        | integer | seconds | yes              |
//! | `input`  | `OnOffProperty` | boolean |         | yes              |
//! | `output` | `OnOffProperty` | boolean |         | no               |

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::error::{FilterError, Result};

/// One of the three device properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Time,
    Input,
    Output,
}

impl Property {
    pub const ALL: [Self; 3] = [Self::Time, Self::Output, Self::Input];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Output)
    }

    /// Static description of this property.
    pub const fn describe(self) -> PropertyDescription {
        match self {
            Self::Time => PropertyDescription {
                name: "time",
                at_type: "Number",
                label: "Time",
                value_type: ValueType::Integer,
                unit: Some("seconds"),
                read_only: false,
            },
            Self::Output => PropertyDescription {
                name: "output",
                at_type: "OnOffProperty",
                label: "Output",
                value_type: ValueType::Boolean,
                unit: None,
                read_only: true,
            },
            Self::Input => PropertyDescription {
                name: "input",
                at_type: "OnOffProperty",
                label: "Input",
                value_type: ValueType::Boolean,
                unit: None,
                read_only: false,
            },
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| FilterError::UnknownProperty(s.to_owned()))
    }
}

/// JSON-schema-ish value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Integer,
}

/// Metadata the hosting runtime uses to render a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyDescription {
    pub name: &'static str,
    #[serde(rename = "@type")]
    pub at_type: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(rename = "readOnly")]
    pub read_only: bool,
}

/// A property value as exchanged with the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
}

impl PropertyValue {
    /// Interpret as the boolean value of `property`.
    pub fn as_bool(self, property: Property) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            Self::Integer(_) => Err(FilterError::PropertyType {
                property,
                expected: "a boolean",
            }),
        }
    }

    /// Interpret as a whole number of seconds for `property`.
    pub fn as_secs(self, property: Property) -> Result<u32> {
        match self {
            Self::Integer(n) => u32::try_from(n).map_err(|_| FilterError::PropertyType {
                property,
                expected: "a non-negative integer",
            }),
            Self::Bool(_) => Err(FilterError::PropertyType {
                property,
                expected: "an integer",
            }),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u32> for PropertyValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}
