#![allow(dead_code)]

use tofred_som::{AttrValue, Spectrum, SpectrumId, SpectrumSet};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn spectrum(bank: u32, pixel: u32, y: &[f64], var_y: &[f64]) -> Spectrum {
    let edges = (0..=y.len()).map(|i| i as f64).collect();
    Spectrum::histogram_1d(
        SpectrumId::new(bank, pixel, 0),
        edges,
        y.to_vec(),
        var_y.to_vec(),
    )
    .expect("valid spectrum")
}

pub fn two_spectrum_set(x_units: &str) -> SpectrumSet {
    let y = [1.0, 2.0, 3.0, 4.0, 5.0];
    let var = [1.0; 5];
    SpectrumSet::from_spectra(vec![spectrum(1, 0, &y, &var), spectrum(1, 1, &y, &var)])
        .expect("valid set")
        .with_attribute("x_units", x_units)
        .with_attribute("y_units", "Counts")
}

pub fn log_of(set: &SpectrumSet) -> Vec<String> {
    match set.attr("operations") {
        Some(AttrValue::List(entries)) => entries.clone(),
        _ => Vec::new(),
    }
}
