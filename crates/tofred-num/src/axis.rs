//! Axis helpers: validation, bisection, bin centres and conservative 1D rebinning.

use tofred_core::{ErrorInfo, ReductionError, ValueErr};

/// Checks that `axis` is a finite, strictly increasing sequence of at least two edges.
pub fn validate_edges(axis: &[f64], label: &str) -> Result<(), ReductionError> {
    if axis.len() < 2 {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("short-axis", "a bin-edge axis needs at least two values")
                .with_context("axis", label)
                .with_context("len", axis.len()),
        ));
    }
    validate_increasing(axis, label)
}

/// Checks that `axis` is finite and strictly increasing (any length).
pub fn validate_increasing(axis: &[f64], label: &str) -> Result<(), ReductionError> {
    if let Some(idx) = axis.iter().position(|value| !value.is_finite()) {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("non-finite-axis", "axis values must be finite")
                .with_context("axis", label)
                .with_context("index", idx),
        ));
    }
    if let Some(idx) = axis.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("non-increasing-axis", "axis values must be strictly increasing")
                .with_context("axis", label)
                .with_context("index", idx + 1),
        ));
    }
    Ok(())
}

fn check_histogram(
    axis: &[f64],
    values: &[f64],
    variances: &[f64],
    label: &str,
) -> Result<(), ReductionError> {
    validate_edges(axis, label)?;
    if values.len() + 1 != axis.len() || variances.len() != values.len() {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("histogram-length", "histogram needs len(axis) == len(y) + 1")
                .with_context("axis", label)
                .with_context("edges", axis.len())
                .with_context("values", values.len())
                .with_context("variances", variances.len()),
        ));
    }
    Ok(())
}

/// Index of the bin `[axis[i], axis[i + 1])` holding `value`.
///
/// Values below the first edge map to bin 0 and values at or above the last
/// edge map to the last bin; callers decide whether such values are in range.
pub fn bisect_helper(axis: &[f64], value: f64) -> Result<usize, ReductionError> {
    if axis.len() < 2 {
        return Err(ReductionError::malformed_axis(
            "short-axis",
            "bisection needs at least two edges",
        ));
    }
    if value.is_nan() {
        return Err(ReductionError::malformed_axis("nan-lookup", "cannot bisect on NaN"));
    }
    let upper = axis.partition_point(|&edge| edge <= value);
    Ok(upper.saturating_sub(1).min(axis.len() - 2))
}

/// Bin centres of an edge axis, with variances when the edges carry them.
pub fn calc_bin_centers(
    axis: &[f64],
    axis_var: Option<&[f64]>,
) -> Result<(Vec<f64>, Vec<f64>), ReductionError> {
    if let Some(var) = axis_var {
        if var.len() != axis.len() {
            return Err(ReductionError::malformed_axis(
                "axis-variance-length",
                "axis variances must match the axis length",
            ));
        }
    }
    let centers = axis
        .windows(2)
        .map(|pair| 0.5 * (pair[0] + pair[1]))
        .collect();
    let centers_var = match axis_var {
        Some(var) => var.windows(2).map(|pair| 0.25 * (pair[0] + pair[1])).collect(),
        None => vec![0.0; axis.len().saturating_sub(1)],
    };
    Ok((centers, centers_var))
}

/// Widths of every bin of an edge axis.
pub fn calc_bin_widths(axis: &[f64]) -> Vec<f64> {
    axis.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Straight line fitted by weighted least squares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope and its variance.
    pub slope: ValueErr,
    /// Intercept and its variance.
    pub intercept: ValueErr,
}

impl LinearFit {
    /// Evaluates the fitted line at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.slope.value * x + self.intercept.value
    }
}

/// Fits `y = slope * x + intercept` over the inclusive index range `i0..=i1`.
///
/// Points are weighted by `1 / var_y`; when any variance in the range is not
/// strictly positive the fit falls back to unit weights.
pub fn linear_fit(
    x: &[f64],
    y: &[f64],
    var_y: &[f64],
    i0: usize,
    i1: usize,
) -> Result<LinearFit, ReductionError> {
    if x.len() != y.len() || y.len() != var_y.len() {
        return Err(ReductionError::malformed_axis(
            "fit-length",
            "x, y and var_y must have equal lengths",
        ));
    }
    if i0 >= i1 || i1 >= x.len() {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("fit-range", "a line fit needs at least two points in range")
                .with_context("i0", i0)
                .with_context("i1", i1)
                .with_context("len", x.len()),
        ));
    }
    let weighted = var_y[i0..=i1].iter().all(|&var| var > 0.0);
    let (mut s, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for idx in i0..=i1 {
        let w = if weighted { 1.0 / var_y[idx] } else { 1.0 };
        s += w;
        sx += w * x[idx];
        sy += w * y[idx];
        sxx += w * x[idx] * x[idx];
        sxy += w * x[idx] * y[idx];
    }
    let delta = s * sxx - sx * sx;
    if delta == 0.0 {
        return Err(ReductionError::malformed_axis(
            "fit-degenerate",
            "fit abscissae are all identical",
        ));
    }
    Ok(LinearFit {
        slope: ValueErr::new((s * sxy - sx * sy) / delta, s / delta),
        intercept: ValueErr::new((sxx * sy - sx * sxy) / delta, sxx / delta),
    })
}

/// Visits every (output bin, input bin, overlap length) triple with a positive overlap.
fn sweep_overlaps(old_axis: &[f64], new_axis: &[f64], mut visit: impl FnMut(usize, usize, f64)) {
    let (mut i, mut j) = (0, 0);
    while i + 1 < old_axis.len() && j + 1 < new_axis.len() {
        let lo = old_axis[i].max(new_axis[j]);
        let hi = old_axis[i + 1].min(new_axis[j + 1]);
        if hi > lo {
            visit(j, i, hi - lo);
        }
        if old_axis[i + 1] < new_axis[j + 1] {
            i += 1;
        } else if new_axis[j + 1] < old_axis[i + 1] {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
}

/// Conservative histogram rebin onto `new_axis`.
///
/// Each input bin contributes `frac * y` and `frac^2 * var` to every output bin
/// it overlaps, `frac` being the overlapped fraction of the input bin. Output
/// bins outside the input range stay at zero.
pub fn rebin_axis_1d(
    old_axis: &[f64],
    old_y: &[f64],
    old_var_y: &[f64],
    new_axis: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), ReductionError> {
    let (values, variances, _) = rebin_axis_1d_frac(old_axis, old_y, old_var_y, new_axis)?;
    Ok((values, variances))
}

/// Like [`rebin_axis_1d`], additionally returning the covered fraction of each output bin.
pub fn rebin_axis_1d_frac(
    old_axis: &[f64],
    old_y: &[f64],
    old_var_y: &[f64],
    new_axis: &[f64],
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), ReductionError> {
    check_histogram(old_axis, old_y, old_var_y, "input")?;
    validate_edges(new_axis, "output")?;
    let n_out = new_axis.len() - 1;
    let mut values = vec![0.0; n_out];
    let mut variances = vec![0.0; n_out];
    let mut covered = vec![0.0; n_out];
    let old_widths = calc_bin_widths(old_axis);
    let new_widths = calc_bin_widths(new_axis);
    sweep_overlaps(old_axis, new_axis, |j, i, overlap| {
        let frac = overlap / old_widths[i];
        values[j] += frac * old_y[i];
        variances[j] += frac * frac * old_var_y[i];
        covered[j] += overlap / new_widths[j];
    });
    Ok((values, variances, covered))
}
