//! S(Q,E) construction: each energy-transfer bin of each pixel becomes a
//! quadrilateral in the (Q, E) plane whose counts are shared among the output
//! cells it overlaps, in proportion to the intersection area.

mod grid;
mod jacobian;
mod quad;

pub use grid::{QeAccumulator, QeGrid};
pub use jacobian::{JacobianCoefficients, Kinematics, ScatteringPoint, MEV_PER_INV_ANGSTROM_SQ};
pub use quad::Quad;

use std::f64::consts::PI;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, OperationRecord, ReductionConfig, ReductionError};
use tofred_num::{validate_edges, Point};
use tofred_som::{stamp, AxisKind, GeometryKind, GeometryProvider, SpectrumSet};

fn default_polar_width() -> f64 {
    0.01
}

fn default_normalize() -> bool {
    true
}

/// Options for [`build_sqe`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqeOpts {
    /// Fixed-energy geometry of the instrument.
    pub kinematics: Kinematics,
    /// Output momentum-transfer edges, 1/Å.
    pub q_edges: Vec<f64>,
    /// Output energy-transfer edges, meV.
    pub e_edges: Vec<f64>,
    /// Polar angular width of one pixel, radians.
    #[serde(default = "default_polar_width")]
    pub polar_width: f64,
    /// Divide accumulated counts by the covered area.
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

impl SqeOpts {
    /// Options with the default pixel width and normalization.
    pub fn new(kinematics: Kinematics, q_edges: Vec<f64>, e_edges: Vec<f64>) -> Self {
        Self {
            kinematics,
            q_edges,
            e_edges,
            polar_width: default_polar_width(),
            normalize: default_normalize(),
        }
    }
}

/// Result of [`build_sqe`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqeOutput {
    /// One 2D spectrum with axes `[Q, E]`.
    pub set: SpectrumSet,
    /// Covered area per output cell, row-major like the spectrum values.
    pub covered: Vec<f64>,
    /// Input bins whose footprint missed the grid entirely.
    pub skipped_bins: usize,
}

/// Footprint of one (pixel, energy bin) cell in the (Q, E) plane.
///
/// The polar span is clipped to `[0, pi]` and the corners are mapped exactly.
/// When that outline is unusable, the Jacobian parallelogram around the bin
/// centre is used instead.
fn footprint(
    opts: &SqeOpts,
    polar: f64,
    energy: (f64, f64),
    min_area: f64,
) -> Result<Quad, ReductionError> {
    let half = 0.5 * opts.polar_width;
    let span = ((polar - half).max(0.0), (polar + half).min(PI));
    if span.1 > span.0 {
        match Quad::from_kinematics(&opts.kinematics, span, energy, min_area) {
            Ok(quad) => return Ok(quad),
            Err(ReductionError::DegenerateGeometry(info)) => {
                trace!("exact footprint rejected ({}), using Jacobian", info.code);
            }
            Err(err) => return Err(err),
        }
    }
    let e = 0.5 * (energy.0 + energy.1);
    let point = opts.kinematics.point(polar, e)?;
    let coeffs = opts.kinematics.coefficients(&point, polar);
    Quad::from_jacobian(
        Point::new(point.q, e),
        &coeffs,
        opts.polar_width,
        energy.1 - energy.0,
        min_area,
    )
}

/// Regrids every energy-transfer spectrum of `set` onto a (Q, E) grid.
///
/// Each member must be a 1D histogram over energy transfer (meV). Its polar
/// angle comes from `geometry`. Every input and option is checked before any
/// bin is accumulated. Bins whose footprint misses the grid are counted in
/// [`SqeOutput::skipped_bins`].
pub fn build_sqe(
    set: &SpectrumSet,
    geometry: &dyn GeometryProvider,
    opts: &SqeOpts,
    config: &ReductionConfig,
) -> Result<SqeOutput, ReductionError> {
    opts.kinematics.validate()?;
    if !opts.polar_width.is_finite() || opts.polar_width <= 0.0 {
        return Err(ReductionError::Config(
            ErrorInfo::new("polar-width", "pixel polar width must be positive")
                .with_context("polar_width", opts.polar_width),
        ));
    }
    let first = set.spectra.first().ok_or_else(|| {
        ReductionError::CardinalityMismatch(ErrorInfo::new(
            "empty-set",
            "S(Q,E) needs at least one spectrum",
        ))
    })?;
    let grid = QeGrid::new(opts.q_edges.clone(), opts.e_edges.clone())?;

    let mut polar_angles = Vec::with_capacity(set.len());
    for spectrum in set {
        if spectrum.dimension() != 1 || spectrum.primary_axis().kind != AxisKind::Histogram {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new("sqe-input", "S(Q,E) input must be 1D energy-transfer histograms")
                    .with_context("id", spectrum.id),
            ));
        }
        let edges = &spectrum.primary_axis().values;
        validate_edges(edges, "energy transfer")?;
        opts.kinematics
            .check_transfer_range(edges[0], edges[edges.len() - 1])?;
        polar_angles.push(geometry.get_parameter(GeometryKind::Polar, &spectrum.id)?.value);
    }
    debug!(
        "sqe {} over {} spectra onto {}x{} cells",
        opts.kinematics,
        set.len(),
        grid.shape().0,
        grid.shape().1
    );

    let mut acc = QeAccumulator::new(grid);
    let mut skipped_bins = 0;
    for (spectrum, &polar) in set.iter().zip(&polar_angles) {
        trace!("sqe {} at polar {polar}", spectrum.id);
        let edges = &spectrum.primary_axis().values;
        for (bin, pair) in edges.windows(2).enumerate() {
            let quad = footprint(opts, polar, (pair[0], pair[1]), config.geometry_tolerance)?;
            let (q0, q1, e0, e1) = quad.bounds();
            if acc.grid().misses(q0, q1, e0, e1) {
                skipped_bins += 1;
                continue;
            }
            acc.splat(&quad, spectrum.y[bin], spectrum.var_y[bin])?;
        }
    }

    let (spectrum, covered) = acc.finish(first.id, opts.normalize);
    let mut result = SpectrumSet::from_spectra(vec![spectrum])?;
    let record = OperationRecord::new("sqe")
        .with_operand(format!("set[{}]", set.len()))
        .with_operand(opts.kinematics.to_string());
    stamp(&mut result, &[set], &record, &config.keys);
    result
        .attributes
        .insert(config.keys.x_units.clone(), "1/Angstroms".into());
    Ok(SqeOutput {
        set: result,
        covered,
        skipped_bins,
    })
}
