//! Provenance and schema descriptors shared across tofred artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One entry of a set's provenance log: the operation and a summary of its operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Operation name, e.g. `add` or `rebin_frac`.
    pub operation: String,
    /// Short descriptions of the operands in call order.
    pub operands: Vec<String>,
}

impl OperationRecord {
    /// Creates a record with no operand summaries.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            operands: Vec::new(),
        }
    }

    /// Appends an operand summary.
    pub fn with_operand(mut self, summary: impl Into<String>) -> Self {
        self.operands.push(summary.into());
        self
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation)?;
        for (idx, operand) in self.operands.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{operand}")?;
        }
        write!(f, ")")
    }
}
