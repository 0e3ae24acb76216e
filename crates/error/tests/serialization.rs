use quarry_error::{ErrorCode, ErrorContext, QuarryError};
use serde_json::Value;

#[test]
fn test_json_serialization() {
    let error = QuarryError::new(ErrorCode::FieldNotFound, "Column 'hostnme' not found")
        .with_context(ErrorContext::FieldNotFound {
            field: "hostnme".to_string(),
            available_fields: vec!["hostname".to_string(), "region".to_string()],
        })
        .with_hint("Did you mean 'hostname'?");

    let json = error.to_json();
    let v: Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(v["code"], "QUARRY-2004");
    assert_eq!(v["message"], "Column 'hostnme' not found");
    assert_eq!(v["hint"], "Did you mean 'hostname'?");
    assert_eq!(v["context"]["type"], "field_not_found");
    assert_eq!(v["context"]["field"], "hostnme");
}

#[test]
fn test_job_context_round_trip() {
    let error = QuarryError::job_timeout("A", "1f2e", Some("ENQUEUED"));
    let json = error.to_json();

    let parsed: QuarryError = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(parsed, error);

    let v: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["context"]["type"], "job");
    assert_eq!(v["context"]["request_id"], "A");
    assert_eq!(v["context"]["state"], "ENQUEUED");
    assert_eq!(v["trace_id"], "A");
}

#[test]
fn test_error_code_parsing() {
    let code: ErrorCode = "QUARRY-4001".to_string().try_into().unwrap();
    assert_eq!(code, ErrorCode::AuthenticationFailed);
}
