mod common;

use common::two_spectrum_set;
use serde_json::json;
use tofred_core::{ErrorKind, ValueErr};
use tofred_som::{classify_json, OperandKind, OwnedOperand};

#[test]
fn pairs_and_sequences() {
    let pair = classify_json(&json!([2.0, 0.5])).expect("pair");
    assert_eq!(pair, OwnedOperand::ScalarPair(ValueErr::new(2.0, 0.5)));

    let object_pair = classify_json(&json!({"value": 1.0, "variance": 0.1})).expect("pair");
    assert_eq!(object_pair.kind(), OperandKind::ScalarPair);

    let sequence = classify_json(&json!([[1.0, 0.1], [2.0, 0.2], [3, 0]])).expect("sequence");
    match sequence {
        OwnedOperand::Sequence(pairs) => assert_eq!(pairs[2], ValueErr::new(3.0, 0.0)),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn spectra_and_sets_decode() {
    let set = two_spectrum_set("Angstroms");
    let value = serde_json::to_value(&set).expect("encode");
    let classified = classify_json(&value).expect("set");
    assert_eq!(classified, OwnedOperand::Set(set.clone()));
    assert_eq!(classified.as_operand().kind(), OperandKind::Set);

    let single = serde_json::to_value(&set.spectra[0]).expect("encode");
    assert_eq!(classify_json(&single).expect("single").kind(), OperandKind::Single);
}

#[test]
fn unknown_shapes_are_rejected() {
    for value in [
        json!("hello"),
        json!(3.0),
        json!([1.0, 2.0, 3.0]),
        json!([[1.0, 2.0], "x"]),
        json!({"title": "no spectra"}),
    ] {
        let err = classify_json(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedOperand, "{value}");
    }
}

#[test]
fn spectrum_with_bad_lengths_is_malformed() {
    let value = json!({
        "id": {"bank": 1, "x": 0, "y": 0},
        "axes": [{"kind": "histogram", "values": [0.0, 1.0, 2.0]}],
        "y": [1.0],
        "var_y": [1.0]
    });
    let err = classify_json(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAxis);
    assert_eq!(err.info().code, "bin-count");
}
