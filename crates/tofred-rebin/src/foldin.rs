//! Folding many spectra onto one axis.

use log::debug;
use tofred_core::{ErrorInfo, OperationRecord, ReductionConfig, ReductionError};
use tofred_num::{rebin_axis_1d_frac, validate_edges};
use tofred_som::{stamp, ArithOp, Axis, Dispatcher, Spectrum, SpectrumId, SpectrumSet};

use crate::strategy::{check_rebinnable, RebinStrategy};

fn empty_set(operation: &str) -> ReductionError {
    ReductionError::CardinalityMismatch(
        ErrorInfo::new("empty-set", format!("{operation} needs at least one spectrum")),
    )
}

/// Two-pass fold-in onto a shared axis: accumulate counts and covered area,
/// then divide once at the end.
///
/// Summing fractionally rebinned spectra without the area bookkeeping counts
/// the overlap near bin edges twice.
#[derive(Debug, Clone, PartialEq)]
pub struct FracAccumulator {
    axis: Vec<f64>,
    values: Vec<f64>,
    variances: Vec<f64>,
    covered: Vec<f64>,
    contributions: usize,
}

impl FracAccumulator {
    /// Starts an empty accumulator over `axis`.
    pub fn new(axis: &[f64]) -> Result<Self, ReductionError> {
        validate_edges(axis, "output")?;
        let bins = axis.len() - 1;
        Ok(Self {
            axis: axis.to_vec(),
            values: vec![0.0; bins],
            variances: vec![0.0; bins],
            covered: vec![0.0; bins],
            contributions: 0,
        })
    }

    /// Adds one 1D histogram.
    pub fn accumulate(&mut self, spectrum: &Spectrum) -> Result<(), ReductionError> {
        check_rebinnable(spectrum, RebinStrategy::Fractional)?;
        let (values, variances, covered) = rebin_axis_1d_frac(
            &spectrum.primary_axis().values,
            &spectrum.y,
            &spectrum.var_y,
            &self.axis,
        )?;
        for (acc, value) in self.values.iter_mut().zip(values) {
            *acc += value;
        }
        for (acc, variance) in self.variances.iter_mut().zip(variances) {
            *acc += variance;
        }
        for (acc, area) in self.covered.iter_mut().zip(covered) {
            *acc += area;
        }
        self.contributions += 1;
        Ok(())
    }

    /// Number of spectra accumulated so far.
    pub fn contributions(&self) -> usize {
        self.contributions
    }

    /// Accumulated covered area per output bin.
    pub fn covered(&self) -> &[f64] {
        &self.covered
    }

    /// Raw accumulated values and variances, before normalization.
    pub fn raw(&self) -> (&[f64], &[f64]) {
        (&self.values, &self.variances)
    }

    /// Divides by the covered area: `y / area` and `var / area^2`.
    ///
    /// Bins nothing reached stay at `(0, 0)`.
    pub fn finish(self, id: SpectrumId) -> Spectrum {
        let mut y = self.values;
        let mut var_y = self.variances;
        let bins = y.iter_mut().zip(var_y.iter_mut()).zip(&self.covered);
        for ((value, variance), &area) in bins {
            if area > 0.0 {
                *value /= area;
                *variance /= area * area;
            } else {
                *value = 0.0;
                *variance = 0.0;
            }
        }
        Spectrum {
            id,
            axes: vec![Axis::histogram(self.axis)],
            y,
            var_y,
        }
    }
}

/// Folds every spectrum of `set` onto `new_axis` as an area-weighted average.
///
/// The single result spectrum keeps the id of the first member.
pub fn sum_by_rebin_frac(
    set: &SpectrumSet,
    new_axis: &[f64],
    config: &ReductionConfig,
) -> Result<SpectrumSet, ReductionError> {
    let first = set.spectra.first().ok_or_else(|| empty_set("sum_by_rebin_frac"))?;
    for spectrum in set {
        check_rebinnable(spectrum, RebinStrategy::Fractional)?;
    }
    debug!("folding {} spectra onto {} bins", set.len(), new_axis.len().saturating_sub(1));

    let mut acc = FracAccumulator::new(new_axis)?;
    for spectrum in set {
        acc.accumulate(spectrum)?;
    }
    let mut result = SpectrumSet::from_spectra(vec![acc.finish(first.id)])?;
    let record = OperationRecord::new("sum_by_rebin_frac")
        .with_operand(format!("set[{}]", set.len()))
        .with_operand(format!("axis[{}]", new_axis.len()));
    stamp(&mut result, &[set], &record, &config.keys);
    Ok(result)
}

/// Adds every spectrum of `set` bin by bin; all axes must be identical.
///
/// The single result spectrum keeps the id of the first member.
pub fn sum_all_spectra(
    set: &SpectrumSet,
    dispatcher: &Dispatcher,
) -> Result<SpectrumSet, ReductionError> {
    let (first, rest) = set.spectra.split_first().ok_or_else(|| empty_set("sum_all_spectra"))?;
    debug!("summing {} spectra", set.len());
    let mut total = first.clone();
    for spectrum in rest {
        total = dispatcher
            .apply(ArithOp::Add, &total, spectrum)?
            .into_single()
            .ok_or_else(|| {
                ReductionError::UnsupportedOperandCombination(ErrorInfo::new(
                    "sum-shape",
                    "adding two spectra did not yield a spectrum",
                ))
            })?;
    }
    let mut result = SpectrumSet::from_spectra(vec![total])?;
    let record =
        OperationRecord::new("sum_all_spectra").with_operand(format!("set[{}]", set.len()));
    stamp(&mut result, &[set], &record, &dispatcher.config().keys);
    Ok(result)
}
