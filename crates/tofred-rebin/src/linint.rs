//! Linear-interpolation resampling.

use tofred_core::{ErrorInfo, ReductionError};
use tofred_num::{bisect_helper, calc_bin_centers, linear_fit, validate_edges, validate_increasing};
use tofred_som::{Axis, AxisKind};

fn nearest_center(centers: &[f64], target: f64) -> usize {
    let right = centers.partition_point(|&c| c < target).min(centers.len() - 1);
    if right > 0 && (target - centers[right - 1]).abs() <= (centers[right] - target).abs() {
        right - 1
    } else {
        right
    }
}

/// Resamples values onto `new_axis` by local straight-line fits.
///
/// For each output bin the input bin centres inside `[lo, hi]` are located by
/// bisection. With zero or one centre inside, the nearest input value is
/// copied; otherwise an error-weighted line through the covered points is
/// evaluated at the output bin centre. The output variance is the plain mean
/// of the covered input variances, not a propagated error. Values within
/// `zero_tolerance` of zero get a zero variance. Output bins entirely outside
/// the input range receive `(0, 0)`.
pub fn rebin_axis_1d_linint(
    old_axis: &Axis,
    old_y: &[f64],
    old_var_y: &[f64],
    new_axis: &[f64],
    zero_tolerance: f64,
) -> Result<(Vec<f64>, Vec<f64>), ReductionError> {
    validate_edges(new_axis, "output")?;
    if old_axis.bin_count() != old_y.len() || old_var_y.len() != old_y.len() || old_y.is_empty() {
        return Err(ReductionError::MalformedAxis(
            ErrorInfo::new("histogram-length", "input values do not match the input axis")
                .with_context("bins", old_axis.bin_count())
                .with_context("y", old_y.len())
                .with_context("var_y", old_var_y.len()),
        ));
    }
    let (centers, range) = match old_axis.kind {
        AxisKind::Histogram => {
            validate_edges(&old_axis.values, "input")?;
            let (centers, _) = calc_bin_centers(&old_axis.values, None)?;
            let last = old_axis.values.len() - 1;
            (centers, (old_axis.values[0], old_axis.values[last]))
        }
        AxisKind::Point => {
            validate_increasing(&old_axis.values, "input")?;
            let last = old_axis.values.len() - 1;
            (
                old_axis.values.clone(),
                (old_axis.values[0], old_axis.values[last]),
            )
        }
    };

    let n_out = new_axis.len() - 1;
    let mut values = vec![0.0; n_out];
    let mut variances = vec![0.0; n_out];
    for j in 0..n_out {
        let (lo, hi) = (new_axis[j], new_axis[j + 1]);
        if hi <= range.0 || lo >= range.1 {
            continue;
        }
        let mid = 0.5 * (lo + hi);
        let i0 = centers.partition_point(|&c| c < lo);
        let i_end = centers.partition_point(|&c| c <= hi);
        let covered = i_end.saturating_sub(i0);

        let (value, variance) = if covered <= 1 {
            let idx = if covered == 1 {
                i0
            } else if old_axis.kind == AxisKind::Histogram {
                bisect_helper(&old_axis.values, mid)?
            } else {
                nearest_center(&centers, mid)
            };
            (old_y[idx], old_var_y[idx])
        } else {
            let fit = linear_fit(&centers, old_y, old_var_y, i0, i_end - 1)?;
            let mean_var = old_var_y[i0..i_end].iter().sum::<f64>() / covered as f64;
            (fit.eval(mid), mean_var)
        };

        values[j] = value;
        variances[j] = if value.abs() <= zero_tolerance {
            0.0
        } else {
            variance
        };
    }
    Ok((values, variances))
}
