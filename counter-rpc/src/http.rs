// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A [`JsonRpcClient`] posting requests to a node over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use counter_core::provider::ProviderError;
use serde_json::Value;
use tracing::trace;

use crate::client::{JsonRpcClient, JsonRpcRequest, JsonRpcResponse};

/// A JSON-RPC client for an HTTP endpoint, such as a development node with unlocked
/// accounts.
#[derive(Debug)]
pub struct HttpClient {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpClient {
    /// Creates a client for the endpoint at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        HttpClient {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The URL of the endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl JsonRpcClient for HttpClient {
    async fn request_value(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        trace!(id, method, "Sending JSON-RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| ProviderError::Transport(error.to_string()))?;
        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::InvalidResponse(error.to_string()))?;

        if !response.answers(id) {
            return Err(ProviderError::InvalidResponse(format!(
                "expected a response to request {id}, got one for {}",
                response.id
            )));
        }
        trace!(id, method, "Received JSON-RPC response");
        response.into_result()
    }
}
