// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the [`BrowserClient`], run in a headless browser with `wasm-bindgen-test`.

use assert_matches::assert_matches;
use counter_core::{CounterSession, ProviderError, SessionConfig, SessionError};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

use super::{into_provider_error, BrowserClient};
use crate::JsonRpcWallet;

wasm_bindgen_test_configure!(run_in_browser);

/// Builds an error object like the ones EIP-1193 wallets reject their promises with.
fn wallet_error(code: Option<f64>, message: &str) -> JsValue {
    let error = Object::new();
    if let Some(code) = code {
        Reflect::set(&error, &JsValue::from_str("code"), &JsValue::from_f64(code))
            .expect("Setting a property of a plain object should not fail");
    }
    Reflect::set(
        &error,
        &JsValue::from_str("message"),
        &JsValue::from_str(message),
    )
    .expect("Setting a property of a plain object should not fail");
    error.into()
}

/// Test that a page without an injected wallet has no provider.
#[wasm_bindgen_test]
fn no_injected_wallet() {
    assert!(BrowserClient::detect().is_none());
}

/// Test that a session in a page without a wallet reports the provider as unavailable.
#[wasm_bindgen_test]
async fn session_without_injected_wallet() {
    let session = CounterSession::new(
        BrowserClient::detect().map(JsonRpcWallet::new),
        SessionConfig::default(),
    );

    assert_eq!(session.connect().await, Err(SessionError::ProviderUnavailable));
    assert!(!session.is_connected());
}

/// Test that the EIP-1193 user rejection code becomes a rejection.
#[wasm_bindgen_test]
fn user_rejection_is_mapped() {
    let error = into_provider_error(wallet_error(Some(4001.0), "User rejected the request."));

    assert_eq!(
        error,
        ProviderError::Rejected {
            code: 4001,
            message: "User rejected the request.".to_owned(),
        }
    );
}

/// Test that other error codes are reported as RPC errors.
#[wasm_bindgen_test]
fn other_codes_are_rpc_errors() {
    let error = into_provider_error(wallet_error(Some(-32603.0), "Internal JSON-RPC error."));

    assert_eq!(
        error,
        ProviderError::Rpc {
            code: -32603,
            message: "Internal JSON-RPC error.".to_owned(),
        }
    );
}

/// Test that errors without a code are reported as transport errors.
#[wasm_bindgen_test]
fn errors_without_code_are_transport_errors() {
    assert_eq!(
        into_provider_error(wallet_error(None, "Failed to fetch")),
        ProviderError::Transport("Failed to fetch".to_owned())
    );
    assert_matches!(
        into_provider_error(JsValue::from_str("disconnected")),
        ProviderError::Transport(_)
    );
}
