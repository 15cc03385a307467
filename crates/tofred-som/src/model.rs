//! Spectrum data model: axes, spectra and ordered spectrum sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tofred_core::{AttributeKeys, ErrorInfo, ReductionError, ValueErr};
use tofred_num::reverse_array_cp;

use crate::attrs::{AttrValue, Attributes};
use crate::geometry::TabulatedInstrument;

/// Opaque bank/pixel key identifying a spectrum within a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpectrumId {
    /// Detector bank number.
    pub bank: u32,
    /// Pixel column within the bank.
    pub x: u32,
    /// Pixel row within the bank.
    pub y: u32,
}

impl SpectrumId {
    /// Creates an identifier.
    pub const fn new(bank: u32, x: u32, y: u32) -> Self {
        Self { bank, x, y }
    }
}

impl fmt::Display for SpectrumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bank{}_({},{})", self.bank, self.x, self.y)
    }
}

/// Whether axis values are bin edges or point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// `N + 1` edges for `N` bins.
    Histogram,
    /// `N` coordinates for `N` density samples.
    Point,
}

impl AxisKind {
    fn offset(&self) -> usize {
        match self {
            AxisKind::Histogram => 1,
            AxisKind::Point => 0,
        }
    }
}

/// One axis of a spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Edge or coordinate convention.
    pub kind: AxisKind,
    /// Ordered axis values.
    #[serde(with = "tofred_core::nonfinite::vec")]
    pub values: Vec<f64>,
    /// Optional per-value variances; `None` means no x-uncertainty.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "tofred_core::nonfinite::option_vec"
    )]
    pub variances: Option<Vec<f64>>,
}

impl Axis {
    /// A bin-edge axis without uncertainties.
    pub fn histogram(values: Vec<f64>) -> Self {
        Self {
            kind: AxisKind::Histogram,
            values,
            variances: None,
        }
    }

    /// A point-coordinate axis without uncertainties.
    pub fn points(values: Vec<f64>) -> Self {
        Self {
            kind: AxisKind::Point,
            values,
            variances: None,
        }
    }

    /// Attaches per-value variances.
    pub fn with_variances(mut self, variances: Vec<f64>) -> Self {
        self.variances = Some(variances);
        self
    }

    /// Number of bins (or samples) described by the axis.
    pub fn bin_count(&self) -> usize {
        self.values.len().saturating_sub(self.kind.offset())
    }

    /// Reversed copy of the axis.
    pub fn reversed(&self) -> Self {
        Self {
            kind: self.kind,
            values: reverse_array_cp(&self.values),
            variances: self.variances.as_deref().map(reverse_array_cp),
        }
    }

    fn validate(&self, index: usize) -> Result<(), ReductionError> {
        if let Some(variances) = &self.variances {
            if variances.len() != self.values.len() {
                return Err(ReductionError::MalformedAxis(
                    ErrorInfo::new("axis-variance-length", "axis variances must match values")
                        .with_context("axis", index)
                        .with_context("values", self.values.len())
                        .with_context("variances", variances.len()),
                ));
            }
        }
        if self.kind == AxisKind::Histogram && self.values.len() < 2 {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new("short-axis", "a histogram axis needs at least two edges")
                    .with_context("axis", index),
            ));
        }
        Ok(())
    }
}

/// A single 1D or 2D histogram with values and variances.
///
/// For 2D spectra the values are stored row-major with the first axis outermost:
/// bin `(i, j)` lives at `i * axes[1].bin_count() + j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Identifier, unique within a set.
    pub id: SpectrumId,
    /// Ordered axes; the first is the primary axis.
    pub axes: Vec<Axis>,
    /// Per-bin values.
    #[serde(with = "tofred_core::nonfinite::vec")]
    pub y: Vec<f64>,
    /// Per-bin variances.
    #[serde(with = "tofred_core::nonfinite::vec")]
    pub var_y: Vec<f64>,
}

impl Spectrum {
    /// Builds and validates a spectrum.
    pub fn new(
        id: SpectrumId,
        axes: Vec<Axis>,
        y: Vec<f64>,
        var_y: Vec<f64>,
    ) -> Result<Self, ReductionError> {
        let spectrum = Self { id, axes, y, var_y };
        spectrum.validate()?;
        Ok(spectrum)
    }

    /// Builds a 1D histogram from bin edges.
    pub fn histogram_1d(
        id: SpectrumId,
        edges: Vec<f64>,
        y: Vec<f64>,
        var_y: Vec<f64>,
    ) -> Result<Self, ReductionError> {
        Self::new(id, vec![Axis::histogram(edges)], y, var_y)
    }

    /// Checks the length invariants between axes, values and variances.
    pub fn validate(&self) -> Result<(), ReductionError> {
        if self.axes.is_empty() || self.axes.len() > 2 {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new("dimension", "spectra must have one or two axes")
                    .with_context("id", self.id)
                    .with_context("axes", self.axes.len()),
            ));
        }
        for (index, axis) in self.axes.iter().enumerate() {
            axis.validate(index)?;
        }
        let expected: usize = self.axes.iter().map(Axis::bin_count).product();
        if self.y.len() != expected || self.var_y.len() != self.y.len() {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new("bin-count", "value arrays do not match the axes")
                    .with_context("id", self.id)
                    .with_context("expected", expected)
                    .with_context("y", self.y.len())
                    .with_context("var_y", self.var_y.len()),
            ));
        }
        Ok(())
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// The first axis.
    ///
    /// # Panics
    ///
    /// Panics when the spectrum has no axes, which [`Spectrum::validate`] rejects.
    pub fn primary_axis(&self) -> &Axis {
        &self.axes[0]
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Value and variance of one bin.
    pub fn value_at(&self, index: usize) -> Option<ValueErr> {
        Some(ValueErr::new(*self.y.get(index)?, *self.var_y.get(index)?))
    }

    /// Sum of all bins with variances added.
    pub fn total(&self) -> ValueErr {
        ValueErr::new(self.y.iter().sum(), self.var_y.iter().sum())
    }

    /// A copy sharing id and axes but carrying new values.
    pub fn with_data(&self, y: Vec<f64>, var_y: Vec<f64>) -> Self {
        Self {
            id: self.id,
            axes: self.axes.clone(),
            y,
            var_y,
        }
    }

    /// Copy of a 1D spectrum with axis and values reversed.
    pub fn reversed(&self) -> Result<Self, ReductionError> {
        if self.dimension() != 1 {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new("reverse-dimension", "only 1D spectra can be reversed")
                    .with_context("id", self.id),
            ));
        }
        Ok(Self {
            id: self.id,
            axes: vec![self.axes[0].reversed()],
            y: reverse_array_cp(&self.y),
            var_y: reverse_array_cp(&self.var_y),
        })
    }
}

/// Ordered collection of spectra sharing one attribute mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumSet {
    /// Member spectra; order matters for positional pairing.
    pub spectra: Vec<Spectrum>,
    /// Units, labels, instrument handle, provenance log and friends.
    #[serde(default)]
    pub attributes: Attributes,
}

impl SpectrumSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set, checking every spectrum and id uniqueness.
    pub fn from_spectra(spectra: Vec<Spectrum>) -> Result<Self, ReductionError> {
        let set = Self {
            spectra,
            attributes: Attributes::new(),
        };
        set.validate()?;
        Ok(set)
    }

    pub(crate) fn from_parts_unchecked(spectra: Vec<Spectrum>, attributes: Attributes) -> Self {
        Self {
            spectra,
            attributes,
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Checks every member spectrum and that ids are unique.
    pub fn validate(&self) -> Result<(), ReductionError> {
        let mut seen = BTreeSet::new();
        for spectrum in &self.spectra {
            spectrum.validate()?;
            if !seen.insert(spectrum.id) {
                return Err(ReductionError::MalformedAxis(
                    ErrorInfo::new("duplicate-id", "spectrum ids must be unique within a set")
                        .with_context("id", spectrum.id),
                ));
            }
        }
        Ok(())
    }

    /// Appends a spectrum, rejecting duplicate ids.
    pub fn push(&mut self, spectrum: Spectrum) -> Result<(), ReductionError> {
        spectrum.validate()?;
        if self.find(&spectrum.id).is_some() {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new("duplicate-id", "spectrum ids must be unique within a set")
                    .with_context("id", spectrum.id),
            ));
        }
        self.spectra.push(spectrum);
        Ok(())
    }

    /// Number of spectra.
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    /// Whether the set has no spectra.
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Iterates over the spectra in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Spectrum> {
        self.spectra.iter()
    }

    /// Looks a spectrum up by id.
    pub fn find(&self, id: &SpectrumId) -> Option<&Spectrum> {
        self.spectra.iter().find(|spectrum| &spectrum.id == id)
    }

    /// Raw attribute lookup.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Primary axis units, if recorded.
    pub fn x_units(&self, keys: &AttributeKeys) -> Option<&str> {
        self.attr(&keys.x_units).and_then(AttrValue::as_str)
    }

    /// Value units, if recorded.
    pub fn y_units(&self, keys: &AttributeKeys) -> Option<&str> {
        self.attr(&keys.y_units).and_then(AttrValue::as_str)
    }

    /// Title, if recorded.
    pub fn title(&self, keys: &AttributeKeys) -> Option<&str> {
        self.attr(&keys.title).and_then(AttrValue::as_str)
    }

    /// Provenance log entries in order.
    pub fn operations(&self, keys: &AttributeKeys) -> Vec<String> {
        self.attr(&keys.operations)
            .map(AttrValue::log_entries)
            .unwrap_or_default()
    }

    /// Instrument geometry stored on the set.
    pub fn instrument(&self, keys: &AttributeKeys) -> Option<&TabulatedInstrument> {
        self.attr(&keys.instrument).and_then(AttrValue::as_instrument)
    }
}

impl<'a> IntoIterator for &'a SpectrumSet {
    type Item = &'a Spectrum;
    type IntoIter = std::slice::Iter<'a, Spectrum>;

    fn into_iter(self) -> Self::IntoIter {
        self.spectra.iter()
    }
}
