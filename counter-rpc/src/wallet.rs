// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A [`WalletProvider`] speaking the standard Ethereum JSON-RPC methods.

use std::time::Duration;

use alloy_primitives::{Bytes, U64};
use async_trait::async_trait;
use counter_core::{Address, ProviderError, TransactionHash, TransactionReceipt, WalletProvider};
use serde::Deserialize;
use serde_json::json;
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;
use tracing::{debug, trace};
#[cfg(target_arch = "wasm32")]
use wasmtimer::tokio::sleep;

use crate::client::JsonRpcClient;

#[cfg(all(test, not(target_arch = "wasm32")))]
#[path = "unit_tests/wallet.rs"]
mod tests;

/// The default interval between two polls for a transaction receipt.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration parameters for a [`JsonRpcWallet`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JsonRpcWalletConfig {
    /// How long to wait between two polls for a transaction receipt.
    pub poll_interval: Duration,
}

impl Default for JsonRpcWalletConfig {
    fn default() -> Self {
        JsonRpcWalletConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// A wallet reached through a [`JsonRpcClient`].
pub struct JsonRpcWallet<C> {
    client: C,
    config: JsonRpcWalletConfig,
}

impl<C> JsonRpcWallet<C> {
    /// Creates a wallet using the default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, JsonRpcWalletConfig::default())
    }

    /// Creates a wallet using the given configuration.
    pub fn with_config(client: C, config: JsonRpcWalletConfig) -> Self {
        JsonRpcWallet { client, config }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

/// The fields of a transaction receipt this wallet looks at.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: TransactionHash,
    block_number: Option<U64>,
    status: Option<U64>,
}

impl RpcReceipt {
    fn into_receipt(self) -> Result<TransactionReceipt, ProviderError> {
        if self.status == Some(U64::ZERO) {
            return Err(ProviderError::Reverted(self.transaction_hash));
        }
        Ok(TransactionReceipt {
            transaction_hash: self.transaction_hash,
            block_number: self.block_number.map(|number| number.to::<u64>()),
        })
    }
}

impl<C> JsonRpcWallet<C>
where
    C: JsonRpcClient,
{
    async fn wait_for_receipt(
        &self,
        transaction_hash: TransactionHash,
    ) -> Result<TransactionReceipt, ProviderError> {
        loop {
            let receipt: Option<RpcReceipt> = self
                .client
                .request("eth_getTransactionReceipt", json!([transaction_hash]))
                .await?;
            match receipt {
                Some(receipt) => return receipt.into_receipt(),
                None => {
                    trace!(%transaction_hash, "Transaction not included yet");
                    sleep(self.config.poll_interval).await;
                }
            }
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<C> WalletProvider for JsonRpcWallet<C>
where
    C: JsonRpcClient,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.client.request("eth_requestAccounts", json!([])).await
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ProviderError> {
        let output: Bytes = self
            .client
            .request(
                "eth_call",
                json!([{ "to": to, "data": Bytes::from(data) }, "latest"]),
            )
            .await?;
        Ok(output.to_vec())
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
    ) -> Result<TransactionReceipt, ProviderError> {
        let transaction_hash: TransactionHash = self
            .client
            .request(
                "eth_sendTransaction",
                json!([{ "from": from, "to": to, "data": Bytes::from(data) }]),
            )
            .await?;
        debug!(%transaction_hash, "Transaction submitted");
        self.wait_for_receipt(transaction_hash).await
    }
}
