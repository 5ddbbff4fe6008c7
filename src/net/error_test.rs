use super::*;
use serde_json::json;

fn status_error(body: Value) -> ApiError {
    ApiError::Status { status: 400, body }
}

// =============================================================
// String detail
// =============================================================

#[test]
fn string_detail_is_returned_verbatim() {
    let err = status_error(json!({ "detail": "Email already registered." }));
    assert_eq!(extract_error_message(&err, "fallback"), "Email already registered.");
}

#[test]
fn unauthorized_detail_is_used_too() {
    let err = ApiError::Unauthorized { body: json!({ "detail": "Invalid email or password." }) };
    assert_eq!(extract_error_message(&err, "Authentication failed."), "Invalid email or password.");
}

#[test]
fn empty_string_detail_falls_back() {
    let err = status_error(json!({ "detail": "" }));
    assert_eq!(extract_error_message(&err, "fallback"), "fallback");
}

// =============================================================
// List detail
// =============================================================

#[test]
fn list_detail_joins_msg_fields() {
    let err = status_error(json!({
        "detail": [
            { "loc": ["body", "email"], "msg": "value is not a valid email address" },
            { "loc": ["body", "password"], "msg": "ensure this value has at least 8 characters" }
        ]
    }));
    assert_eq!(
        extract_error_message(&err, "fallback"),
        "value is not a valid email address; ensure this value has at least 8 characters"
    );
}

#[test]
fn list_item_without_msg_is_serialized() {
    let err = status_error(json!({ "detail": [{ "msg": "bad" }, { "code": 7 }] }));
    assert_eq!(extract_error_message(&err, "fallback"), r#"bad; {"code":7}"#);
}

#[test]
fn list_item_that_is_not_an_object_is_serialized() {
    let err = status_error(json!({ "detail": ["plain", 3] }));
    assert_eq!(extract_error_message(&err, "fallback"), r#""plain"; 3"#);
}

#[test]
fn empty_list_detail_falls_back() {
    let err = status_error(json!({ "detail": [] }));
    assert_eq!(extract_error_message(&err, "fallback"), "fallback");
}

// =============================================================
// Unusable detail
// =============================================================

#[test]
fn missing_detail_falls_back() {
    let err = status_error(json!({ "error": "nope" }));
    assert_eq!(extract_error_message(&err, "Something went wrong."), "Something went wrong.");
}

#[test]
fn object_or_number_detail_falls_back() {
    assert_eq!(extract_error_message(&status_error(json!({ "detail": { "a": 1 } })), "fb"), "fb");
    assert_eq!(extract_error_message(&status_error(json!({ "detail": 42 })), "fb"), "fb");
    assert_eq!(extract_error_message(&status_error(json!({ "detail": null })), "fb"), "fb");
}

#[test]
fn non_object_payload_falls_back() {
    assert_eq!(extract_error_message(&status_error(Value::Null), "fb"), "fb");
    assert_eq!(extract_error_message(&status_error(json!("oops")), "fb"), "fb");
    assert_eq!(extract_error_message(&status_error(json!([1, 2])), "fb"), "fb");
}

#[test]
fn transport_error_falls_back() {
    let err = ApiError::Transport("connection refused".to_owned());
    assert_eq!(extract_error_message(&err, "Failed to post comment."), "Failed to post comment.");
}

// =============================================================
// Accessors
// =============================================================

#[test]
fn status_accessor_reports_http_status() {
    assert_eq!(ApiError::Unauthorized { body: Value::Null }.status(), Some(401));
    assert_eq!(status_error(Value::Null).status(), Some(400));
    assert_eq!(ApiError::Decode("x".to_owned()).status(), None);
}
