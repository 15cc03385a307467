#![allow(dead_code)]

use tofred_som::{AttrValue, Spectrum, SpectrumId, SpectrumSet};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn histogram(pixel: u32, edges: &[f64], y: &[f64], var_y: &[f64]) -> Spectrum {
    Spectrum::histogram_1d(
        SpectrumId::new(1, pixel, 0),
        edges.to_vec(),
        y.to_vec(),
        var_y.to_vec(),
    )
    .expect("valid spectrum")
}

pub fn unit_edges(bins: usize) -> Vec<f64> {
    (0..=bins).map(|i| i as f64).collect()
}

pub fn log_of(set: &SpectrumSet) -> Vec<String> {
    match set.attr("operations") {
        Some(AttrValue::List(entries)) => entries.clone(),
        _ => Vec::new(),
    }
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}
