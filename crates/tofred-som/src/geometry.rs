//! Instrument geometry lookup.

use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, ReductionError, ValueErr};

use crate::model::{SpectrumId, SpectrumSet};

/// Geometry parameters available per spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    /// Moderator to sample flight path.
    Primary,
    /// Sample to pixel flight path.
    Secondary,
    /// Primary plus secondary flight path.
    Total,
    /// Polar (scattering) angle in radians.
    Polar,
    /// Azimuthal angle in radians.
    Azimuthal,
}

/// Source of per-spectrum geometry parameters.
pub trait GeometryProvider {
    /// Returns one parameter for one spectrum.
    fn get_parameter(
        &self,
        kind: GeometryKind,
        id: &SpectrumId,
    ) -> Result<ValueErr, ReductionError>;

    /// Returns one parameter per spectrum of `set`, in set order.
    ///
    /// The result is a plain sequence of scalar pairs suitable for
    /// per-spectrum broadcast in the dispatcher.
    fn get_parameters(
        &self,
        set: &SpectrumSet,
        kind: GeometryKind,
    ) -> Result<Vec<ValueErr>, ReductionError> {
        set.iter()
            .map(|spectrum| self.get_parameter(kind, &spectrum.id))
            .collect()
    }
}

/// Geometry of one pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelGeometry {
    /// Spectrum identifier the pixel feeds.
    pub id: SpectrumId,
    /// Moderator to sample distance.
    pub primary: ValueErr,
    /// Sample to pixel distance.
    pub secondary: ValueErr,
    /// Polar angle.
    pub polar: ValueErr,
    /// Azimuthal angle.
    pub azimuthal: ValueErr,
}

/// Instrument described by an explicit table of pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedInstrument {
    /// Instrument name.
    pub name: String,
    /// Pixel table; lookups are linear.
    pub pixels: Vec<PixelGeometry>,
}

impl TabulatedInstrument {
    /// Creates an instrument table.
    pub fn new(name: impl Into<String>, pixels: Vec<PixelGeometry>) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }

    /// Looks a pixel up by spectrum id.
    pub fn pixel(&self, id: &SpectrumId) -> Option<&PixelGeometry> {
        self.pixels.iter().find(|pixel| &pixel.id == id)
    }
}

impl GeometryProvider for TabulatedInstrument {
    fn get_parameter(
        &self,
        kind: GeometryKind,
        id: &SpectrumId,
    ) -> Result<ValueErr, ReductionError> {
        let pixel = self.pixel(id).ok_or_else(|| {
            ReductionError::Geometry(
                ErrorInfo::new("unknown-pixel", "no geometry recorded for spectrum")
                    .with_context("id", id)
                    .with_context("instrument", &self.name),
            )
        })?;
        Ok(match kind {
            GeometryKind::Primary => pixel.primary,
            GeometryKind::Secondary => pixel.secondary,
            GeometryKind::Total => ValueErr::new(
                pixel.primary.value + pixel.secondary.value,
                pixel.primary.variance + pixel.secondary.variance,
            ),
            GeometryKind::Polar => pixel.polar,
            GeometryKind::Azimuthal => pixel.azimuthal,
        })
    }
}
