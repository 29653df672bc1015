// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A [`JsonRpcClient`] forwarding requests to the wallet injected in the browser as
//! `window.ethereum` (EIP-1193).

use async_trait::async_trait;
use counter_core::provider::ProviderError;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize as _;
use serde_json::Value;
use tracing::trace;
use wasm_bindgen::{JsCast as _, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::client::{JsonRpcClient, USER_REJECTED_REQUEST};

#[cfg(test)]
#[path = "unit_tests/browser.rs"]
mod tests;

/// A client for the wallet injected in the page.
pub struct BrowserClient {
    ethereum: JsValue,
}

impl BrowserClient {
    /// Looks for an injected wallet, returning [`None`] if the page has none.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(BrowserClient { ethereum })
    }

    fn request_function(&self) -> Result<Function, ProviderError> {
        Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(into_provider_error)?
            .dyn_into::<Function>()
            .map_err(|_| {
                ProviderError::Transport("the injected wallet has no `request` method".to_owned())
            })
    }
}

#[async_trait(?Send)]
impl JsonRpcClient for BrowserClient {
    async fn request_value(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let params = params
            .serialize(&serializer)
            .map_err(|error| ProviderError::InvalidResponse(error.to_string()))?;
        let arguments = Object::new();
        Reflect::set(&arguments, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(into_provider_error)?;
        Reflect::set(&arguments, &JsValue::from_str("params"), &params)
            .map_err(into_provider_error)?;

        trace!(method, "Forwarding request to the injected wallet");
        let promise = self
            .request_function()?
            .call1(&self.ethereum, &arguments)
            .map_err(into_provider_error)?
            .dyn_into::<Promise>()
            .map_err(|_| {
                ProviderError::InvalidResponse("`request` did not return a promise".to_owned())
            })?;
        let result = JsFuture::from(promise)
            .await
            .map_err(into_provider_error)?;

        if result.is_undefined() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result)
            .map_err(|error| ProviderError::InvalidResponse(error.to_string()))
    }
}

/// Converts a thrown JavaScript value or rejected promise into a [`ProviderError`].
///
/// EIP-1193 errors carry a numeric `code` and a `message`.
fn into_provider_error(error: JsValue) -> ProviderError {
    let code = Reflect::get(&error, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64());
    let message = Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{error:?}"));
    match code {
        Some(code) if code as i64 == USER_REJECTED_REQUEST => ProviderError::Rejected {
            code: code as i64,
            message,
        },
        Some(code) => ProviderError::Rpc {
            code: code as i64,
            message,
        },
        None => ProviderError::Transport(message),
    }
}
