mod common;

use common::two_spectrum_set;
use tofred_core::{ErrorKind, ValueErr};
use tofred_som::{
    canonical_hash, div, from_bytes, from_json, to_bytes, to_json, AttrValue, PixelGeometry,
    SpectrumId, TabulatedInstrument,
};

fn instrument() -> TabulatedInstrument {
    TabulatedInstrument::new(
        "ARCS",
        vec![PixelGeometry {
            id: SpectrumId::new(1, 0, 0),
            primary: ValueErr::new(13.6, 0.0),
            secondary: ValueErr::new(3.0, 0.01),
            polar: ValueErr::new(0.5, 1e-6),
            azimuthal: ValueErr::new(0.0, 0.0),
        }],
    )
}

#[test]
fn json_round_trip_preserves_set() {
    let set = two_spectrum_set("meV")
        .with_attribute("instrument", instrument())
        .with_attribute("incident_energy", ValueErr::new(50.0, 0.25))
        .with_attribute("operations", vec!["load(run 42)".to_string()]);
    let json = to_json(&set).expect("serialize");
    let decoded = from_json(&json).expect("deserialize");
    assert_eq!(decoded, set);
    assert_eq!(canonical_hash(&decoded), canonical_hash(&set));
}

#[test]
fn binary_round_trip_preserves_set() {
    let set = two_spectrum_set("Angstroms");
    let bytes = to_bytes(&set).expect("encode");
    assert_eq!(from_bytes(&bytes).expect("decode"), set);
}

#[test]
fn tampered_payload_fails_hash_check() {
    let set = two_spectrum_set("Angstroms");
    let json = to_json(&set).expect("serialize").replace("\"Counts\"", "\"Monitor\"");
    let err = from_json(&json).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serde);
    assert_eq!(err.info().code, "hash-mismatch");
}

#[test]
fn hash_changes_with_content() {
    let a = two_spectrum_set("Angstroms");
    let mut b = a.clone();
    b.spectra[0].y[0] += 1.0;
    assert_ne!(canonical_hash(&a), canonical_hash(&b));
}

#[test]
fn division_by_zero_results_round_trip() {
    let set = two_spectrum_set("meV").with_attribute("scale", f64::NAN);
    let quotient = div(&set, (0.0, 0.0))
        .expect("div")
        .into_set()
        .expect("set result");
    assert!(quotient.spectra[0].y.iter().all(|v| *v == f64::INFINITY));
    assert!(quotient.spectra[0].var_y.iter().all(|v| v.is_nan()));

    let json = to_json(&quotient).expect("serialize");
    assert!(json.contains("\"inf\""));
    let decoded = from_json(&json).expect("deserialize");
    assert_eq!(canonical_hash(&decoded), canonical_hash(&quotient));
    assert_eq!(decoded.spectra[1].y, quotient.spectra[1].y);
    assert!(decoded.spectra[1].var_y.iter().all(|v| v.is_nan()));
    assert!(matches!(decoded.attr("scale"), Some(AttrValue::Float(v)) if v.is_nan()));

    let restored = from_bytes(&to_bytes(&quotient).expect("encode")).expect("decode");
    assert_eq!(restored.spectra[0].y, quotient.spectra[0].y);
}

#[test]
fn hash_distinguishes_attribute_types() {
    let text = two_spectrum_set("meV").with_attribute("run", "42");
    let number = two_spectrum_set("meV").with_attribute("run", 42_i64);
    assert_ne!(canonical_hash(&text), canonical_hash(&number));

    let a = two_spectrum_set("meV").with_attribute("scale", f64::NAN);
    let b = two_spectrum_set("meV").with_attribute("scale", -f64::NAN);
    assert_eq!(canonical_hash(&a), canonical_hash(&b));
}
