mod common;

use common::{assert_close, histogram, init_logging, log_of, unit_edges};
use proptest::prelude::*;
use tofred_core::{ErrorKind, ReductionConfig};
use tofred_rebin::{
    integrate_set, integrate_spectrum, sum_all_spectra, sum_by_rebin_frac, FracAccumulator,
};
use tofred_som::{div, Dispatcher, SpectrumId, SpectrumSet};

#[test]
fn fold_in_averages_by_covered_area() {
    init_logging();
    let set = SpectrumSet::from_spectra(vec![
        histogram(0, &[0.0, 1.0, 2.0], &[2.0, 2.0], &[1.0, 1.0]),
        histogram(1, &[1.0, 2.0, 3.0], &[4.0, 4.0], &[1.0, 1.0]),
    ])
    .expect("set")
    .with_attribute("title", "bank 1");
    let out = sum_by_rebin_frac(&set, &[0.0, 1.0, 2.0, 3.0], &ReductionConfig::default())
        .expect("fold-in");
    assert_eq!(out.len(), 1);
    let folded = &out.spectra[0];
    assert_eq!(folded.id, SpectrumId::new(1, 0, 0));
    assert_close(folded.y[0], 2.0, 1e-12);
    assert_close(folded.y[1], 3.0, 1e-12);
    assert_close(folded.y[2], 4.0, 1e-12);
    assert_close(folded.var_y[1], 0.5, 1e-12);
    assert_eq!(out.attr("title").and_then(|v| v.as_str()), Some("bank 1"));
    assert_eq!(log_of(&out), vec!["sum_by_rebin_frac(set[2], axis[4])".to_string()]);
}

#[test]
fn accumulator_leaves_unreached_bins_empty() {
    let mut acc = FracAccumulator::new(&[0.0, 1.0, 5.0, 6.0]).expect("axis");
    acc.accumulate(&histogram(0, &[0.0, 2.0], &[8.0], &[4.0]))
        .expect("accumulate");
    assert_eq!(acc.contributions(), 1);
    assert_close(acc.covered()[1], 0.25, 1e-12);
    let (raw, _) = acc.raw();
    assert_close(raw[0] + raw[1], 8.0, 1e-12);
    let out = acc.finish(SpectrumId::new(1, 0, 0));
    assert_close(out.y[0], 4.0, 1e-12);
    assert_close(out.y[1], 16.0, 1e-12);
    assert_eq!((out.y[2], out.var_y[2]), (0.0, 0.0));
}

#[test]
fn empty_sets_cannot_be_folded() {
    let config = ReductionConfig::default();
    let err = sum_by_rebin_frac(&SpectrumSet::new(), &[0.0, 1.0], &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CardinalityMismatch);
    let err = sum_all_spectra(&SpectrumSet::new(), &Dispatcher::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CardinalityMismatch);
}

#[test]
fn sum_all_spectra_adds_bin_by_bin() {
    let edges = unit_edges(3);
    let set = SpectrumSet::from_spectra(vec![
        histogram(0, &edges, &[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3]),
        histogram(1, &edges, &[4.0, 5.0, 6.0], &[0.4, 0.5, 0.6]),
    ])
    .expect("set");
    let out = sum_all_spectra(&set, &Dispatcher::default()).expect("sum");
    let total = &out.spectra[0];
    assert_eq!(total.id, SpectrumId::new(1, 0, 0));
    assert_eq!(total.y, vec![5.0, 7.0, 9.0]);
    assert_close(total.var_y[2], 0.9, 1e-12);
    assert_eq!(log_of(&out), vec!["sum_all_spectra(set[2])".to_string()]);

    let mismatched = SpectrumSet::from_spectra(vec![
        histogram(0, &edges, &[1.0; 3], &[1.0; 3]),
        histogram(1, &[0.0, 1.0, 2.0, 4.0], &[1.0; 3], &[1.0; 3]),
    ])
    .expect("set");
    let err = sum_all_spectra(&mismatched, &Dispatcher::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleAxis);
}

#[test]
fn integration_weights_partial_end_bins() {
    let spectrum = histogram(0, &unit_edges(4), &[1.0, 2.0, 3.0, 4.0], &[1.0; 4]);
    let full = integrate_spectrum(&spectrum, None).expect("full");
    assert_eq!((full.value, full.variance), (10.0, 4.0));

    let part = integrate_spectrum(&spectrum, Some((0.5, 2.5))).expect("partial");
    assert_close(part.value, 4.0, 1e-12);
    assert_close(part.variance, 1.5, 1e-12);

    let err = integrate_spectrum(&spectrum, Some((2.0, 1.0))).unwrap_err();
    assert_eq!(err.info().code, "integration-range");
}

#[test]
fn integrals_normalise_a_set_through_sequence_broadcast() {
    let edges = unit_edges(2);
    let set = SpectrumSet::from_spectra(vec![
        histogram(0, &edges, &[4.0, 6.0], &[4.0, 6.0]),
        histogram(1, &edges, &[15.0, 5.0], &[15.0, 5.0]),
    ])
    .expect("set");
    let integrals = integrate_set(&set, None).expect("integrals");
    assert_eq!(integrals.len(), 2);
    let normalised = div(&set, &integrals)
        .expect("div")
        .into_set()
        .expect("set result");
    for spectrum in &normalised {
        assert_close(spectrum.total().value, 1.0, 1e-12);
    }
}

proptest! {
    #[test]
    fn folding_identical_spectra_matches_one_alone(
        y in prop::collection::vec(0.0f64..500.0, 2..16),
        copies in 1usize..6,
        shift in 0.0f64..1.0,
    ) {
        let edges = unit_edges(y.len());
        let spectrum = histogram(0, &edges, &y, &y);
        let target: Vec<f64> = (0..y.len()).map(|i| i as f64 * 1.5 - shift).collect();

        let mut single = FracAccumulator::new(&target).expect("axis");
        single.accumulate(&spectrum).expect("accumulate");
        let mut many = FracAccumulator::new(&target).expect("axis");
        for _ in 0..copies {
            many.accumulate(&spectrum).expect("accumulate");
        }
        let one = single.finish(spectrum.id);
        let folded = many.finish(spectrum.id);
        for (a, b) in one.y.iter().zip(&folded.y) {
            prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0));
        }
    }
}
