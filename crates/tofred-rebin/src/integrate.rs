//! Integration of 1D histograms.

use tofred_core::{ErrorInfo, ReductionError, ValueErr};
use tofred_num::rebin_axis_1d;
use tofred_som::{Spectrum, SpectrumSet};

use crate::strategy::{check_rebinnable, RebinStrategy};

/// Integrated counts of a 1D histogram, optionally restricted to `[start, end)`.
///
/// Partially covered end bins contribute their overlap fraction of the value
/// and the squared fraction of the variance.
pub fn integrate_spectrum(
    spectrum: &Spectrum,
    range: Option<(f64, f64)>,
) -> Result<ValueErr, ReductionError> {
    check_rebinnable(spectrum, RebinStrategy::Exact)?;
    let Some((start, end)) = range else {
        return Ok(spectrum.total());
    };
    if start.is_nan() || end.is_nan() || start >= end {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("integration-range", "integration range must be increasing")
                .with_context("start", start)
                .with_context("end", end),
        ));
    }
    let (y, var_y) = rebin_axis_1d(
        &spectrum.primary_axis().values,
        &spectrum.y,
        &spectrum.var_y,
        &[start, end],
    )?;
    Ok(ValueErr::new(y[0], var_y[0]))
}

/// One integral per member of `set`, in set order.
///
/// The result can be broadcast back over the set, e.g. to normalise by monitor counts.
pub fn integrate_set(
    set: &SpectrumSet,
    range: Option<(f64, f64)>,
) -> Result<Vec<ValueErr>, ReductionError> {
    set.iter()
        .map(|spectrum| integrate_spectrum(spectrum, range))
        .collect()
}
