use tofred_core::errors::{ErrorInfo, ErrorKind, ReductionError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("spectrum", "bank1_(0,0)")
        .with_context("index", 3)
}

#[test]
fn unit_mismatch_surface() {
    let err = ReductionError::UnitMismatch(sample_info("x-units", "units differ"));
    assert_eq!(err.kind(), ErrorKind::UnitMismatch);
    assert_eq!(err.info().code, "x-units");
    assert_eq!(err.info().context["index"], "3");
}

#[test]
fn display_includes_context_and_hint() {
    let err = ReductionError::MalformedAxis(
        ErrorInfo::new("non-increasing", "axis must increase")
            .with_context("index", 4)
            .with_hint("sort the axis first"),
    );
    let text = err.to_string();
    assert!(text.starts_with("malformed axis: axis must increase (code: non-increasing)"));
    assert!(text.contains("index=4"));
    assert!(text.contains("hint: sort the axis first"));
}

#[test]
fn malformed_axis_shorthand() {
    let err = ReductionError::malformed_axis("short-axis", "need two edges");
    assert_eq!(err.kind(), ErrorKind::MalformedAxis);
    assert!(err.info().context.is_empty());
}

#[test]
fn errors_round_trip_json() {
    let err = ReductionError::DegenerateGeometry(sample_info("zero-area", "no footprint"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"DegenerateGeometry\""));
    let decoded: ReductionError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
