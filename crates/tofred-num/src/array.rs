//! Elementwise "no-correlation error" arithmetic over value/variance arrays.

use std::fmt;

use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, ReductionError, ValueErr};

/// Binary operations understood by the primitives and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// Inverse-variance weighted mean of `a` and `b`.
    SumWeighted,
}

impl ArithOp {
    /// Short name recorded in provenance logs.
    pub fn name(&self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
            ArithOp::SumWeighted => "sumw",
        }
    }

    /// Operations whose operands must share physical meaning (units and axis).
    pub fn requires_matching_axes(&self) -> bool {
        matches!(self, ArithOp::Add | ArithOp::Sub | ArithOp::SumWeighted)
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combines two scalar pairs with first-order uncorrelated error propagation.
pub fn combine(op: ArithOp, a: ValueErr, b: ValueErr) -> ValueErr {
    match op {
        ArithOp::Add => ValueErr::new(a.value + b.value, a.variance + b.variance),
        ArithOp::Sub => ValueErr::new(a.value - b.value, a.variance + b.variance),
        ArithOp::Mul => ValueErr::new(
            a.value * b.value,
            b.value * b.value * a.variance + a.value * a.value * b.variance,
        ),
        ArithOp::Div => {
            let ratio = a.value / b.value;
            ValueErr::new(
                ratio,
                (a.variance + ratio * ratio * b.variance) / (b.value * b.value),
            )
        }
        ArithOp::SumWeighted => {
            let total = a.variance + b.variance;
            if total == 0.0 {
                ValueErr::new(0.5 * (a.value + b.value), 0.0)
            } else {
                ValueErr::new(
                    (a.value * b.variance + b.value * a.variance) / total,
                    a.variance * b.variance / total,
                )
            }
        }
    }
}

fn check_lengths(
    values: &[f64],
    variances: &[f64],
    label: &str,
) -> Result<(), ReductionError> {
    if values.len() != variances.len() {
        return Err(ReductionError::IncompatibleAxis(
            ErrorInfo::new("value-variance-length", "values and variances differ in length")
                .with_context("operand", label)
                .with_context("values", values.len())
                .with_context("variances", variances.len()),
        ));
    }
    Ok(())
}

/// Applies `op` elementwise to two value/variance arrays of equal length.
pub fn combine_arrays(
    op: ArithOp,
    left: (&[f64], &[f64]),
    right: (&[f64], &[f64]),
) -> Result<(Vec<f64>, Vec<f64>), ReductionError> {
    check_lengths(left.0, left.1, "left")?;
    check_lengths(right.0, right.1, "right")?;
    if left.0.len() != right.0.len() {
        return Err(ReductionError::IncompatibleAxis(
            ErrorInfo::new("array-length", "operands have different bin counts")
                .with_context("left", left.0.len())
                .with_context("right", right.0.len()),
        ));
    }
    let mut values = Vec::with_capacity(left.0.len());
    let mut variances = Vec::with_capacity(left.0.len());
    for idx in 0..left.0.len() {
        let out = combine(
            op,
            ValueErr::new(left.0[idx], left.1[idx]),
            ValueErr::new(right.0[idx], right.1[idx]),
        );
        values.push(out.value);
        variances.push(out.variance);
    }
    Ok((values, variances))
}

/// Which side of the operation the scalar occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarSide {
    /// `array op scalar`
    Right,
    /// `scalar op array`
    Left,
}

/// Applies `op` between every element of an array and one scalar pair.
pub fn combine_array_scalar(
    op: ArithOp,
    array: (&[f64], &[f64]),
    scalar: ValueErr,
    side: ScalarSide,
) -> Result<(Vec<f64>, Vec<f64>), ReductionError> {
    check_lengths(array.0, array.1, "array")?;
    let (values, variances) = array
        .0
        .iter()
        .zip(array.1)
        .map(|(&value, &variance)| {
            let element = ValueErr::new(value, variance);
            let out = match side {
                ScalarSide::Right => combine(op, element, scalar),
                ScalarSide::Left => combine(op, scalar, element),
            };
            (out.value, out.variance)
        })
        .unzip();
    Ok((values, variances))
}

/// Returns a reversed copy of `values`; the input is left untouched.
pub fn reverse_array_cp(values: &[f64]) -> Vec<f64> {
    values.iter().rev().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_propagates_relative_errors() {
        let out = combine(ArithOp::Mul, ValueErr::new(2.0, 0.04), ValueErr::new(3.0, 0.09));
        assert_eq!(out.value, 6.0);
        assert!((out.variance - (9.0 * 0.04 + 4.0 * 0.09)).abs() < 1e-12);
    }

    #[test]
    fn weighted_sum_prefers_precise_operand() {
        let out = combine(
            ArithOp::SumWeighted,
            ValueErr::new(1.0, 0.0),
            ValueErr::new(5.0, 2.0),
        );
        assert_eq!(out, ValueErr::new(1.0, 0.0));

        let out = combine(
            ArithOp::SumWeighted,
            ValueErr::new(1.0, 1.0),
            ValueErr::new(3.0, 1.0),
        );
        assert_eq!(out, ValueErr::new(2.0, 0.5));
    }

    #[test]
    fn scalar_on_left_subtracts_array() {
        let (values, variances) = combine_array_scalar(
            ArithOp::Sub,
            (&[1.0, 2.0], &[0.1, 0.2]),
            ValueErr::new(10.0, 1.0),
            ScalarSide::Left,
        )
        .unwrap();
        assert_eq!(values, vec![9.0, 8.0]);
        assert!((variances[0] - 1.1).abs() < 1e-12);
        assert!((variances[1] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = combine_arrays(ArithOp::Add, (&[1.0], &[1.0]), (&[1.0, 2.0], &[1.0, 1.0]))
            .unwrap_err();
        assert_eq!(err.info().code, "array-length");
    }
}
