//! Structured error types shared across tofred crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`ReductionError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (spectrum ids, lengths, units, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Field-less discriminant of [`ReductionError`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Operand shape is not a set, spectrum, scalar pair or sequence.
    UnrecognizedOperand,
    /// Two sets (or a set and a sequence) differ in length.
    CardinalityMismatch,
    /// Axis units differ where matching units are required.
    UnitMismatch,
    /// Spectrum axes are not compatible for the requested operation.
    IncompatibleAxis,
    /// The operand pairing is refused by the operation.
    UnsupportedOperandCombination,
    /// Axis is non-monotonic, non-finite or of the wrong length.
    MalformedAxis,
    /// Polygon footprint is non-finite or has no area.
    DegenerateGeometry,
    /// Instrument geometry lookup failed.
    Geometry,
    /// Configuration could not be parsed or validated.
    Config,
    /// Serialization, deserialization or content hash failures.
    Serde,
}

/// Canonical error type for the reduction kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ReductionError {
    /// Operand classification failures.
    #[error("unrecognized operand: {0}")]
    UnrecognizedOperand(ErrorInfo),
    /// Set cardinality mismatches.
    #[error("cardinality mismatch: {0}")]
    CardinalityMismatch(ErrorInfo),
    /// Axis unit mismatches.
    #[error("unit mismatch: {0}")]
    UnitMismatch(ErrorInfo),
    /// Incompatible spectrum axes.
    #[error("incompatible axis: {0}")]
    IncompatibleAxis(ErrorInfo),
    /// Operand combinations refused by an operation.
    #[error("unsupported operand combination: {0}")]
    UnsupportedOperandCombination(ErrorInfo),
    /// Malformed axes handed to rebinning or construction.
    #[error("malformed axis: {0}")]
    MalformedAxis(ErrorInfo),
    /// Degenerate or non-finite polygon geometry.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(ErrorInfo),
    /// Instrument geometry lookup errors.
    #[error("geometry error: {0}")]
    Geometry(ErrorInfo),
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and content hash errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl ReductionError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ReductionError::UnrecognizedOperand(info)
            | ReductionError::CardinalityMismatch(info)
            | ReductionError::UnitMismatch(info)
            | ReductionError::IncompatibleAxis(info)
            | ReductionError::UnsupportedOperandCombination(info)
            | ReductionError::MalformedAxis(info)
            | ReductionError::DegenerateGeometry(info)
            | ReductionError::Geometry(info)
            | ReductionError::Config(info)
            | ReductionError::Serde(info) => info,
        }
    }

    /// Returns the error family.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReductionError::UnrecognizedOperand(_) => ErrorKind::UnrecognizedOperand,
            ReductionError::CardinalityMismatch(_) => ErrorKind::CardinalityMismatch,
            ReductionError::UnitMismatch(_) => ErrorKind::UnitMismatch,
            ReductionError::IncompatibleAxis(_) => ErrorKind::IncompatibleAxis,
            ReductionError::UnsupportedOperandCombination(_) => {
                ErrorKind::UnsupportedOperandCombination
            }
            ReductionError::MalformedAxis(_) => ErrorKind::MalformedAxis,
            ReductionError::DegenerateGeometry(_) => ErrorKind::DegenerateGeometry,
            ReductionError::Geometry(_) => ErrorKind::Geometry,
            ReductionError::Config(_) => ErrorKind::Config,
            ReductionError::Serde(_) => ErrorKind::Serde,
        }
    }

    /// Shorthand for a [`ReductionError::MalformedAxis`] without context.
    pub fn malformed_axis(code: &str, message: impl Into<String>) -> Self {
        ReductionError::MalformedAxis(ErrorInfo::new(code, message))
    }
}
