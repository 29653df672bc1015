// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The JSON-RPC transport used by [`JsonRpcWallet`][crate::JsonRpcWallet].

use async_trait::async_trait;
use counter_core::provider::{MaybeSendSync, ProviderError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

#[cfg(all(test, not(target_arch = "wasm32")))]
#[path = "unit_tests/client.rs"]
mod tests;

/// The error code EIP-1193 wallets use when the user rejects a request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// A client able to perform JSON-RPC requests.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait JsonRpcClient: MaybeSendSync {
    /// Performs the request for `method` with the given `params`, returning the `result`
    /// member of the response.
    async fn request_value(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Performs the request for `method` and deserializes its result.
    async fn request<R>(&self, method: &str, params: Value) -> Result<R, ProviderError>
    where
        R: DeserializeOwned,
    {
        let value = self.request_value(method, params).await?;
        serde_json::from_value(value).map_err(|error| {
            ProviderError::InvalidResponse(format!("unexpected result for {method}: {error}"))
        })
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    /// Creates a request with the given `id`.
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    /// The identifier of the request this responds to, as echoed by the server.
    #[serde(default)]
    pub id: Value,
    /// The result, absent if the request failed.
    #[serde(default)]
    pub result: Value,
    /// The error, if the request failed.
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Returns [`true`] unless the response carries the identifier of another request.
    ///
    /// Servers may echo the identifier as a string, or leave it null when they could not
    /// read the request.
    pub fn answers(&self, id: u64) -> bool {
        match &self.id {
            Value::Null => true,
            Value::String(echoed) => *echoed == id.to_string(),
            echoed => *echoed == json!(id),
        }
    }

    /// Returns the result, or the error converted into a [`ProviderError`].
    pub fn into_result(self) -> Result<Value, ProviderError> {
        match self.error {
            Some(error) => Err(error.into()),
            None => Ok(self.result),
        }
    }
}

/// The error object of a failed JSON-RPC request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct JsonRpcError {
    /// The error code.
    pub code: i64,
    /// A short description of the error.
    pub message: String,
}

impl From<JsonRpcError> for ProviderError {
    fn from(error: JsonRpcError) -> Self {
        let JsonRpcError { code, message } = error;
        if code == USER_REJECTED_REQUEST {
            ProviderError::Rejected { code, message }
        } else {
            ProviderError::Rpc { code, message }
        }
    }
}
