//! Reduction configuration: attribute key names and numeric tolerances.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, ReductionError};

fn config_error(code: &str, message: impl Into<String>) -> ReductionError {
    ReductionError::Config(ErrorInfo::new(code, message))
}

fn default_x_units() -> String {
    "x_units".to_string()
}

fn default_y_units() -> String {
    "y_units".to_string()
}

fn default_x_label() -> String {
    "x_label".to_string()
}

fn default_y_label() -> String {
    "y_label".to_string()
}

fn default_title() -> String {
    "title".to_string()
}

fn default_operations() -> String {
    "operations".to_string()
}

fn default_instrument() -> String {
    "instrument".to_string()
}

fn default_zero_tolerance() -> f64 {
    1e-14
}

fn default_geometry_tolerance() -> f64 {
    1e-12
}

/// Names of the set attributes the kernel reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeKeys {
    /// Units of the primary axis.
    #[serde(default = "default_x_units")]
    pub x_units: String,
    /// Units of the spectrum values.
    #[serde(default = "default_y_units")]
    pub y_units: String,
    /// Label of the primary axis.
    #[serde(default = "default_x_label")]
    pub x_label: String,
    /// Label of the spectrum values.
    #[serde(default = "default_y_label")]
    pub y_label: String,
    /// Human readable title of the data set.
    #[serde(default = "default_title")]
    pub title: String,
    /// Provenance log holding one entry per operation.
    #[serde(default = "default_operations")]
    pub operations: String,
    /// Instrument geometry handle.
    #[serde(default = "default_instrument")]
    pub instrument: String,
}

impl Default for AttributeKeys {
    fn default() -> Self {
        Self {
            x_units: default_x_units(),
            y_units: default_y_units(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            title: default_title(),
            operations: default_operations(),
            instrument: default_instrument(),
        }
    }
}

/// Configuration shared by the dispatcher and the rebinning engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Attribute names.
    #[serde(default)]
    pub keys: AttributeKeys,
    /// Values whose magnitude falls below this get their variance zeroed
    /// after linear-interpolation rebinning.
    #[serde(default = "default_zero_tolerance")]
    pub zero_tolerance: f64,
    /// Smallest footprint area accepted by the 2D regridding engine.
    #[serde(default = "default_geometry_tolerance")]
    pub geometry_tolerance: f64,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            keys: AttributeKeys::default(),
            zero_tolerance: default_zero_tolerance(),
            geometry_tolerance: default_geometry_tolerance(),
        }
    }
}

impl ReductionConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ReductionError> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|err| config_error("yaml-parse", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ReductionError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| config_error("json-parse", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing the parser by extension.
    pub fn from_path(path: &Path) -> Result<Self, ReductionError> {
        let text = fs::read_to_string(path).map_err(|err| {
            ReductionError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            other => Err(ReductionError::Config(
                ErrorInfo::new("config-extension", format!("unsupported extension .{other}"))
                    .with_hint("use .yaml, .yml or .json"),
            )),
        }
    }

    /// Rejects negative or non-finite tolerances and empty attribute names.
    pub fn validate(&self) -> Result<(), ReductionError> {
        for (name, value) in [
            ("zero_tolerance", self.zero_tolerance),
            ("geometry_tolerance", self.geometry_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ReductionError::Config(
                    ErrorInfo::new("invalid-tolerance", "tolerances must be finite and >= 0")
                        .with_context("field", name)
                        .with_context("value", value),
                ));
            }
        }
        let keys = &self.keys;
        for key in [
            &keys.x_units,
            &keys.y_units,
            &keys.x_label,
            &keys.y_label,
            &keys.title,
            &keys.operations,
            &keys.instrument,
        ] {
            if key.is_empty() {
                return Err(config_error(
                    "empty-attribute-key",
                    "attribute key names must not be empty",
                ));
            }
        }
        Ok(())
    }
}
