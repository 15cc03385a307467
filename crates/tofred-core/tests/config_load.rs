use std::io::Write;

use tofred_core::{ErrorKind, ReductionConfig};

#[test]
fn empty_yaml_yields_defaults() {
    let config = ReductionConfig::from_yaml_str("{}").expect("parse");
    assert_eq!(config, ReductionConfig::default());
    assert_eq!(config.keys.x_units, "x_units");
    assert_eq!(config.keys.operations, "operations");
}

#[test]
fn partial_yaml_overrides_keys() {
    let text = "keys:\n  x_units: axis_units\nzero_tolerance: 1.0e-9\n";
    let config = ReductionConfig::from_yaml_str(text).expect("parse");
    assert_eq!(config.keys.x_units, "axis_units");
    assert_eq!(config.keys.y_units, "y_units");
    assert_eq!(config.zero_tolerance, 1.0e-9);
}

#[test]
fn negative_tolerance_is_rejected() {
    let err = ReductionConfig::from_json_str(r#"{"geometry_tolerance": -1.0}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.info().code, "invalid-tolerance");
}

#[test]
fn loads_from_yaml_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("tempfile");
    writeln!(file, "keys:\n  title: run_title").expect("write");
    let config = ReductionConfig::from_path(file.path()).expect("load");
    assert_eq!(config.keys.title, "run_title");
}

#[test]
fn unknown_extension_is_rejected() {
    let file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    let err = ReductionConfig::from_path(file.path()).unwrap_err();
    assert_eq!(err.info().code, "config-extension");
}
