//! Strategy selection for 1D rebinning of spectra and sets.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, OperationRecord, ReductionConfig, ReductionError};
use tofred_num::{rebin_axis_1d, rebin_axis_1d_frac, validate_edges};
use tofred_som::{stamp, Axis, AxisKind, Operand, Spectrum, SpectrumSet};

use crate::linint::rebin_axis_1d_linint;

/// How values are redistributed onto a new axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebinStrategy {
    /// Conservative overlap-weighted redistribution.
    Exact,
    /// Conservative redistribution that also reports covered fractions.
    Fractional,
    /// Local straight-line fits evaluated at output bin centres.
    LinearInterp,
}

impl RebinStrategy {
    /// Name used in provenance entries.
    pub fn name(&self) -> &'static str {
        match self {
            RebinStrategy::Exact => "rebin",
            RebinStrategy::Fractional => "rebin_frac",
            RebinStrategy::LinearInterp => "rebin_linint",
        }
    }
}

/// One rebinned spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebinned {
    /// The spectrum on the new axis.
    pub spectrum: Spectrum,
    /// Covered fraction per output bin; only set by [`RebinStrategy::Fractional`].
    pub covered: Option<Vec<f64>>,
}

/// Result of [`rebin`]; its shape follows the operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Resampled {
    /// A rebinned spectrum.
    Single(Rebinned),
    /// A rebinned set with per-member covered fractions, in set order.
    Set {
        /// Rebinned members sharing the source attributes.
        set: SpectrumSet,
        /// Covered fractions; only set by [`RebinStrategy::Fractional`].
        covered: Option<Vec<Vec<f64>>>,
    },
}

pub(crate) fn check_rebinnable(
    spectrum: &Spectrum,
    strategy: RebinStrategy,
) -> Result<(), ReductionError> {
    if spectrum.dimension() != 1 {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("rebin-dimension", "only 1D spectra can be rebinned")
                .with_context("id", spectrum.id)
                .with_context("axes", spectrum.dimension()),
        ));
    }
    let axis = spectrum.primary_axis();
    if axis.kind == AxisKind::Point && strategy != RebinStrategy::LinearInterp {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("rebin-point-axis", "conservative rebinning needs bin edges")
                .with_context("id", spectrum.id)
                .with_hint("use linear interpolation for point data"),
        ));
    }
    Ok(())
}

/// Rebins one spectrum onto `new_axis`, keeping its id.
pub fn rebin_spectrum(
    spectrum: &Spectrum,
    new_axis: &[f64],
    strategy: RebinStrategy,
    config: &ReductionConfig,
) -> Result<Rebinned, ReductionError> {
    check_rebinnable(spectrum, strategy)?;
    trace!("{} {} onto {} edges", strategy.name(), spectrum.id, new_axis.len());
    let axis = spectrum.primary_axis();
    let (y, var_y, covered) = match strategy {
        RebinStrategy::Exact => {
            let (y, var_y) = rebin_axis_1d(&axis.values, &spectrum.y, &spectrum.var_y, new_axis)?;
            (y, var_y, None)
        }
        RebinStrategy::Fractional => {
            let (y, var_y, covered) =
                rebin_axis_1d_frac(&axis.values, &spectrum.y, &spectrum.var_y, new_axis)?;
            (y, var_y, Some(covered))
        }
        RebinStrategy::LinearInterp => {
            let (y, var_y) = rebin_axis_1d_linint(
                axis,
                &spectrum.y,
                &spectrum.var_y,
                new_axis,
                config.zero_tolerance,
            )?;
            (y, var_y, None)
        }
    };
    Ok(Rebinned {
        spectrum: Spectrum {
            id: spectrum.id,
            axes: vec![Axis::histogram(new_axis.to_vec())],
            y,
            var_y,
        },
        covered,
    })
}

/// Rebins every member of `set`; nothing is returned unless all members succeed.
///
/// The result carries the source attributes and one new provenance entry.
pub fn rebin_set(
    set: &SpectrumSet,
    new_axis: &[f64],
    strategy: RebinStrategy,
    config: &ReductionConfig,
) -> Result<(SpectrumSet, Option<Vec<Vec<f64>>>), ReductionError> {
    validate_edges(new_axis, "output")?;
    for spectrum in set {
        check_rebinnable(spectrum, strategy)?;
    }
    debug!(
        "{} over {} spectra onto {} bins",
        strategy.name(),
        set.len(),
        new_axis.len() - 1
    );

    let mut spectra = Vec::with_capacity(set.len());
    let mut covered = Vec::with_capacity(set.len());
    for spectrum in set {
        let rebinned = rebin_spectrum(spectrum, new_axis, strategy, config)?;
        spectra.push(rebinned.spectrum);
        if let Some(fractions) = rebinned.covered {
            covered.push(fractions);
        }
    }

    let mut result = SpectrumSet::from_spectra(spectra)?;
    let record = OperationRecord::new(strategy.name())
        .with_operand(format!("set[{}]", set.len()))
        .with_operand(format!("axis[{}]", new_axis.len()));
    stamp(&mut result, &[set], &record, &config.keys);
    let covered = (strategy == RebinStrategy::Fractional).then_some(covered);
    Ok((result, covered))
}

/// Rebins a set or a single spectrum; scalar operands are rejected.
pub fn rebin<'a>(
    operand: impl Into<Operand<'a>>,
    new_axis: &[f64],
    strategy: RebinStrategy,
    config: &ReductionConfig,
) -> Result<Resampled, ReductionError> {
    match operand.into() {
        Operand::Set(set) => {
            let (set, covered) = rebin_set(set, new_axis, strategy, config)?;
            Ok(Resampled::Set { set, covered })
        }
        Operand::Single(spectrum) => {
            rebin_spectrum(spectrum, new_axis, strategy, config).map(Resampled::Single)
        }
        other => Err(ReductionError::UnsupportedOperandCombination(
            ErrorInfo::new("rebin-operand", "only sets and spectra can be rebinned")
                .with_context("operand", format!("{:?}", other.kind())),
        )),
    }
}
