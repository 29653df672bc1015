// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;
use counter_core::ProviderError;
use serde_json::{json, Value};
use test_case::test_case;

use super::{JsonRpcRequest, JsonRpcResponse};

fn response(value: Value) -> JsonRpcResponse {
    serde_json::from_value(value).expect("Response should deserialize")
}

/// Test that responses are matched to their request whatever the type of the echoed id.
#[test_case(json!(7), true; "numeric id")]
#[test_case(json!("7"), true; "string id")]
#[test_case(Value::Null, true; "null id")]
#[test_case(json!(8), false; "other numeric id")]
#[test_case(json!("eight"), false; "other string id")]
fn responses_answer_their_request(id: Value, answers: bool) {
    let response = response(json!({ "jsonrpc": "2.0", "id": id, "result": "0x1" }));

    assert_eq!(response.answers(7), answers);
}

/// Test that a response without an id is accepted.
#[test]
fn missing_id_is_accepted() {
    let response = response(json!({ "jsonrpc": "2.0", "result": ["0x1"] }));

    assert!(response.answers(1));
    assert_eq!(response.into_result(), Ok(json!(["0x1"])));
}

/// Test that the error object takes precedence over the result.
#[test]
fn error_responses() {
    let response = response(json!({
        "jsonrpc": "2.0",
        "id": "3",
        "error": { "code": 4001, "message": "User rejected the request." },
    }));

    assert!(response.answers(3));
    assert_matches!(
        response.into_result(),
        Err(ProviderError::Rejected { code: 4001, .. })
    );
}

/// Test the serialized shape of a request.
#[test]
fn request_shape() {
    let request = JsonRpcRequest::new(5, "eth_call", json!([{ "to": "0x00" }, "latest"]));

    assert_eq!(
        serde_json::to_value(&request).expect("Request should serialize"),
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "eth_call",
            "params": [{ "to": "0x00" }, "latest"],
        })
    );
}
