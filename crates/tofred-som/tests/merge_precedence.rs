mod common;

use common::{log_of, two_spectrum_set};
use tofred_core::{AttributeKeys, OperationRecord};
use tofred_som::{add, merge_attributes, record_operation, AttrValue, SpectrumSet};

#[test]
fn left_operand_attributes_win() {
    let left = two_spectrum_set("Angstroms")
        .with_attribute("title", "sample run")
        .with_attribute("run_number", 4321i64);
    let right = two_spectrum_set("Angstroms")
        .with_attribute("title", "background run")
        .with_attribute("run_number", 1234i64)
        .with_attribute("background_only", true);

    let result = add(&left, &right).expect("add").into_set().expect("set");
    assert_eq!(result.attr("title"), Some(&AttrValue::from("sample run")));
    assert_eq!(result.attr("run_number"), Some(&AttrValue::Integer(4321)));
    assert_eq!(result.attr("background_only"), Some(&AttrValue::Bool(true)));
}

#[test]
fn merge_is_last_writer_wins() {
    let keys = AttributeKeys::default();
    let first = SpectrumSet::new().with_attribute("title", "first");
    let second = SpectrumSet::new().with_attribute("title", "second");

    let mut result = SpectrumSet::new();
    merge_attributes(&mut result, &[&first, &second], &keys);
    assert_eq!(result.title(&keys), Some("second"));

    let mut result = SpectrumSet::new();
    merge_attributes(&mut result, &[&second, &first], &keys);
    assert_eq!(result.title(&keys), Some("first"));
}

#[test]
fn provenance_entries_accumulate() {
    let keys = AttributeKeys::default();
    let left = SpectrumSet::new().with_attribute(
        "operations",
        vec!["load(sample)".to_string(), "rebin(set[2])".to_string()],
    );
    let right = SpectrumSet::new().with_attribute("operations", vec!["load(empty can)".to_string()]);

    let mut result = SpectrumSet::new();
    merge_attributes(&mut result, &[&right, &left], &keys);
    record_operation(&mut result, &OperationRecord::new("sub").with_operand("x"), &keys);

    assert_eq!(
        result.operations(&keys),
        vec![
            "load(empty can)".to_string(),
            "load(sample)".to_string(),
            "rebin(set[2])".to_string(),
            "sub(x)".to_string(),
        ]
    );
}

#[test]
fn chained_operations_extend_the_log() {
    let a = two_spectrum_set("Angstroms");
    let once = add(&a, (1.0, 0.0)).expect("add").into_set().expect("set");
    let twice = add(&once, (1.0, 0.0)).expect("add").into_set().expect("set");
    assert_eq!(log_of(&twice).len(), 2);
    assert!(log_of(&twice)[1].starts_with("add(set[2]"));
}

#[test]
fn merged_values_are_copies() {
    let keys = AttributeKeys::default();
    let source = SpectrumSet::new().with_attribute("title", "original");
    let mut result = SpectrumSet::new();
    merge_attributes(&mut result, &[&source], &keys);
    result
        .attributes
        .insert("title".to_string(), AttrValue::from("changed"));
    assert_eq!(source.title(&keys), Some("original"));
}
