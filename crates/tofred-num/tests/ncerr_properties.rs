use proptest::prelude::*;
use tofred_core::ValueErr;
use tofred_num::{combine, rebin_axis_1d, ArithOp};

proptest! {
    #[test]
    fn mul_then_div_recovers_value(
        a in -1.0e3f64..1.0e3,
        var_a in 0.0f64..10.0,
        b in prop_oneof![-1.0e3f64..-1.0e-2, 1.0e-2f64..1.0e3],
        var_b in 0.0f64..10.0,
    ) {
        let left = ValueErr::new(a, var_a);
        let right = ValueErr::new(b, var_b);
        let product = combine(ArithOp::Mul, left, right);
        let back = combine(ArithOp::Div, product, right);
        prop_assert!((back.value - a).abs() <= 1e-9 * a.abs().max(1.0));
        prop_assert!(back.variance >= 0.0);
    }

    #[test]
    fn add_and_sub_share_variance(
        a in -1.0e3f64..1.0e3,
        var_a in 0.0f64..10.0,
        b in -1.0e3f64..1.0e3,
        var_b in 0.0f64..10.0,
    ) {
        let sum = combine(ArithOp::Add, ValueErr::new(a, var_a), ValueErr::new(b, var_b));
        let diff = combine(ArithOp::Sub, ValueErr::new(a, var_a), ValueErr::new(b, var_b));
        prop_assert_eq!(sum.variance, diff.variance);
        prop_assert!((sum.value - diff.value - 2.0 * b).abs() <= 1e-9 * b.abs().max(1.0));
    }

    #[test]
    fn subdividing_rebin_conserves_counts(
        counts in prop::collection::vec(0.0f64..1.0e4, 1..40),
        splits in 1usize..5,
    ) {
        let old_axis: Vec<f64> = (0..=counts.len()).map(|i| i as f64 * 0.5).collect();
        let variances = counts.clone();
        let mut new_axis = Vec::with_capacity(counts.len() * splits + 1);
        for i in 0..counts.len() {
            for k in 0..splits {
                new_axis.push(old_axis[i] + 0.5 * k as f64 / splits as f64);
            }
        }
        new_axis.push(*old_axis.last().unwrap());

        let (values, _) = rebin_axis_1d(&old_axis, &counts, &variances, &new_axis).unwrap();
        let before: f64 = counts.iter().sum();
        let after: f64 = values.iter().sum();
        prop_assert!((before - after).abs() <= 1e-9 * before.max(1.0));
    }
}

#[test]
fn division_by_zero_follows_ieee() {
    let out = combine(ArithOp::Div, ValueErr::new(1.0, 0.0), ValueErr::new(0.0, 0.0));
    assert!(out.value.is_infinite());
}
