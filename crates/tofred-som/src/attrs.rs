use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tofred_core::ValueErr;

use crate::geometry::TabulatedInstrument;

/// Attribute mapping of a [`crate::SpectrumSet`], ordered by key.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A dynamically-typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    /// Free text such as units, labels or titles.
    String(String),
    /// Integral values such as run numbers.
    Integer(i64),
    /// Floating point values.
    Float(#[serde(with = "tofred_core::nonfinite")] f64),
    /// Flags.
    Bool(bool),
    /// Ordered text entries; the provenance log uses this form.
    List(Vec<String>),
    /// A value with its variance, e.g. an incident energy.
    Pair(ValueErr),
    /// Instrument geometry handle.
    Instrument(TabulatedInstrument),
    /// Explicitly absent value.
    Null,
}

impl AttrValue {
    /// Text content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Instrument geometry, if this is an instrument handle.
    pub fn as_instrument(&self) -> Option<&TabulatedInstrument> {
        match self {
            AttrValue::Instrument(instrument) => Some(instrument),
            _ => None,
        }
    }

    /// Interprets the value as provenance log entries.
    ///
    /// Lists yield their entries, nulls yield nothing and any other value is
    /// treated as a single entry.
    pub fn log_entries(&self) -> Vec<String> {
        match self {
            AttrValue::List(entries) => entries.clone(),
            AttrValue::Null => Vec::new(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{s}"),
            AttrValue::Integer(i) => write!(f, "{i}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::List(entries) => write!(f, "[{}]", entries.join("; ")),
            AttrValue::Pair(pair) => write!(f, "{pair}"),
            AttrValue::Instrument(instrument) => write!(f, "<instrument {}>", instrument.name),
            AttrValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Integer(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value)
    }
}

impl From<ValueErr> for AttrValue {
    fn from(value: ValueErr) -> Self {
        AttrValue::Pair(value)
    }
}

impl From<TabulatedInstrument> for AttrValue {
    fn from(value: TabulatedInstrument) -> Self {
        AttrValue::Instrument(value)
    }
}
