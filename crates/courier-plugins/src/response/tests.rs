//! Unit tests for response construction and serialization.

use rstest::rstest;
use serde_json::json;

use super::*;

#[test]
fn success_serialises_flat_object() {
    let response = Response::success("OK").with("Sum", 5);
    let value = serde_json::to_value(&response).expect("serialise");
    assert_eq!(value, json!({"Error": 0, "Message": "OK", "Sum": 5}));
}

#[test]
fn metadata_is_serialised_when_attached() {
    let uid = Uuid::nil();
    let mut response = Response::not_found("X.Y");
    response.attach_metadata("X.Y", 0, uid);

    let value = serde_json::to_value(&response).expect("serialise");

    assert_eq!(
        value,
        json!({
            "Error": 1,
            "Message": "Method X.Y not found.",
            "Name": "X.Y",
            "Instance": 0,
            "Uid": "00000000-0000-0000-0000-000000000000"
        })
    );
}

#[rstest]
#[case("Error")]
#[case("Message")]
#[case("Name")]
#[case("Uid")]
fn reserved_keys_cannot_be_overwritten(#[case] key: &str) {
    let mut response = Response::success("OK");
    assert!(!response.insert(key, "spoofed"));
    assert!(response.get(key).is_none());
    assert_eq!(response.error_code(), Response::SUCCESS);
}

#[test]
fn failure_carries_trace() {
    let response = Response::invocation_failed(
        "Method Math.Divide failed in plugin math: division by zero",
        vec![String::from("division by zero")],
    );
    assert!(!response.is_success());
    assert_eq!(response.error_code(), Response::INVOCATION_FAILED);
    assert_eq!(response.trace(), ["division by zero"]);
}

#[test]
fn round_trips_extra_keys() {
    let text = r#"{"Error":0,"Message":"OK","Count":2,"Name":"Up.Save","Instance":0}"#;
    let response: Response = serde_json::from_str(text).expect("parse");
    assert_eq!(response.name(), Some("Up.Save"));
    assert_eq!(response.get("Count"), Some(&json!(2)));
}

#[test]
fn rename_updates_only_name() {
    let mut response = Response::success("OK");
    response.attach_metadata("Foo.Bar", 0, Uuid::nil());
    response.rename("Foo.Bar_0");
    assert_eq!(response.name(), Some("Foo.Bar_0"));
    assert_eq!(response.instance(), Some(0));
}
