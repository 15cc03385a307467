//! Operand classification.
//!
//! Every operand is tagged once, up front, as a set, a single spectrum, a
//! scalar pair or a sequence of scalar pairs. Downstream code matches on the
//! tag and never inspects the shape again.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tofred_core::{ErrorInfo, ReductionError, ValueErr};

use crate::model::{Spectrum, SpectrumSet};

fn unrecognized(code: &str, message: impl Into<String>) -> ReductionError {
    ReductionError::UnrecognizedOperand(ErrorInfo::new(code, message))
}

/// Shape tag of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandKind {
    /// Ordered collection of spectra with attributes.
    Set,
    /// One spectrum.
    Single,
    /// One value with its variance.
    ScalarPair,
    /// One scalar pair per spectrum, for per-spectrum broadcast.
    Sequence,
}

/// A borrowed, classified operand.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// See [`OperandKind::Set`].
    Set(&'a SpectrumSet),
    /// See [`OperandKind::Single`].
    Single(&'a Spectrum),
    /// See [`OperandKind::ScalarPair`].
    ScalarPair(ValueErr),
    /// See [`OperandKind::Sequence`].
    Sequence(&'a [ValueErr]),
}

impl Operand<'_> {
    /// Shape tag.
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Set(_) => OperandKind::Set,
            Operand::Single(_) => OperandKind::Single,
            Operand::ScalarPair(_) => OperandKind::ScalarPair,
            Operand::Sequence(_) => OperandKind::Sequence,
        }
    }

    /// Short description used in provenance records.
    pub fn summary(&self) -> String {
        match self {
            Operand::Set(set) => format!("set[{}]", set.len()),
            Operand::Single(spectrum) => format!("spectrum {}", spectrum.id),
            Operand::ScalarPair(pair) => pair.to_string(),
            Operand::Sequence(pairs) => format!("sequence[{}]", pairs.len()),
        }
    }
}

impl<'a> From<&'a SpectrumSet> for Operand<'a> {
    fn from(set: &'a SpectrumSet) -> Self {
        Operand::Set(set)
    }
}

impl<'a> From<&'a Spectrum> for Operand<'a> {
    fn from(spectrum: &'a Spectrum) -> Self {
        Operand::Single(spectrum)
    }
}

impl From<ValueErr> for Operand<'_> {
    fn from(pair: ValueErr) -> Self {
        Operand::ScalarPair(pair)
    }
}

impl From<(f64, f64)> for Operand<'_> {
    fn from(pair: (f64, f64)) -> Self {
        Operand::ScalarPair(pair.into())
    }
}

impl<'a> From<&'a [ValueErr]> for Operand<'a> {
    fn from(pairs: &'a [ValueErr]) -> Self {
        Operand::Sequence(pairs)
    }
}

impl<'a> From<&'a Vec<ValueErr>> for Operand<'a> {
    fn from(pairs: &'a Vec<ValueErr>) -> Self {
        Operand::Sequence(pairs.as_slice())
    }
}

/// An owned, classified operand, typically produced from loose input.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedOperand {
    /// See [`OperandKind::Set`].
    Set(SpectrumSet),
    /// See [`OperandKind::Single`].
    Single(Spectrum),
    /// See [`OperandKind::ScalarPair`].
    ScalarPair(ValueErr),
    /// See [`OperandKind::Sequence`].
    Sequence(Vec<ValueErr>),
}

impl OwnedOperand {
    /// Borrows the operand for dispatch.
    pub fn as_operand(&self) -> Operand<'_> {
        match self {
            OwnedOperand::Set(set) => Operand::Set(set),
            OwnedOperand::Single(spectrum) => Operand::Single(spectrum),
            OwnedOperand::ScalarPair(pair) => Operand::ScalarPair(*pair),
            OwnedOperand::Sequence(pairs) => Operand::Sequence(pairs),
        }
    }

    /// Shape tag.
    pub fn kind(&self) -> OperandKind {
        self.as_operand().kind()
    }
}

fn number_pair(value: &JsonValue) -> Option<ValueErr> {
    match value.as_array()?.as_slice() {
        [value, variance] => Some(ValueErr::new(value.as_f64()?, variance.as_f64()?)),
        _ => None,
    }
}

/// Classifies a loose JSON value.
///
/// * `[v, var]` is a scalar pair, as is `{"value": v, "variance": var}`.
/// * A list of `[v, var]` entries (possibly empty) is a sequence.
/// * An object with `id`, `axes`, `y` and `var_y` is a single spectrum.
/// * An object with `spectra` and `attributes` is a set.
///
/// Anything else is an [`ReductionError::UnrecognizedOperand`]. Spectra and
/// sets are validated after decoding.
pub fn classify_json(value: &JsonValue) -> Result<OwnedOperand, ReductionError> {
    match value {
        JsonValue::Array(items) => {
            if let Some(pair) = number_pair(value) {
                return Ok(OwnedOperand::ScalarPair(pair));
            }
            items
                .iter()
                .map(number_pair)
                .collect::<Option<Vec<_>>>()
                .map(OwnedOperand::Sequence)
                .ok_or_else(|| {
                    unrecognized(
                        "unrecognized-list",
                        "lists must be a [value, variance] pair or a list of such pairs",
                    )
                })
        }
        JsonValue::Object(map) => {
            let has = |key: &str| map.contains_key(key);
            if has("spectra") && has("attributes") {
                let set: SpectrumSet = serde_json::from_value(value.clone())
                    .map_err(|err| unrecognized("malformed-set", err.to_string()))?;
                set.validate()?;
                Ok(OwnedOperand::Set(set))
            } else if has("id") && has("axes") && has("y") && has("var_y") {
                let spectrum: Spectrum = serde_json::from_value(value.clone())
                    .map_err(|err| unrecognized("malformed-spectrum", err.to_string()))?;
                spectrum.validate()?;
                Ok(OwnedOperand::Single(spectrum))
            } else if has("value") && has("variance") && map.len() == 2 {
                let pair: ValueErr = serde_json::from_value(value.clone())
                    .map_err(|err| unrecognized("malformed-pair", err.to_string()))?;
                Ok(OwnedOperand::ScalarPair(pair))
            } else {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(ReductionError::UnrecognizedOperand(
                    ErrorInfo::new("unrecognized-object", "object is not a set, spectrum or pair")
                        .with_context("keys", keys.join(",")),
                ))
            }
        }
        other => Err(ReductionError::UnrecognizedOperand(
            ErrorInfo::new("unrecognized-value", "operands must be lists or objects")
                .with_context("value", other),
        )),
    }
}
