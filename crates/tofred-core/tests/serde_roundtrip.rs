use tofred_core::{OperationRecord, SchemaVersion, ValueErr};

#[test]
fn operation_record_display_and_json() {
    let record = OperationRecord::new("add")
        .with_operand("set[2]")
        .with_operand("(1, 0.1)");
    assert_eq!(record.to_string(), "add(set[2], (1, 0.1))");

    let json = serde_json::to_string_pretty(&record).expect("serialize");
    let decoded: OperationRecord = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, record);
}

#[test]
fn value_err_converts_from_tuple() {
    let pair: ValueErr = (2.0, 0.25).into();
    assert_eq!(pair, ValueErr::new(2.0, 0.25));
    assert_eq!(pair.sigma(), 0.5);
    let back: (f64, f64) = pair.into();
    assert_eq!(back, (2.0, 0.25));
}

#[test]
fn schema_version_orders_and_prints() {
    assert!(SchemaVersion::new(1, 2, 0) > SchemaVersion::default());
    assert_eq!(SchemaVersion::default().to_string(), "1.0.0");
}
