// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The capability a [`CounterSession`][crate::CounterSession] needs from a wallet.
//!
//! A wallet provider grants access to the user's accounts and relays calls and signed
//! transactions to a blockchain node. In a browser this is the injected EIP-1193 object,
//! elsewhere it can be a JSON-RPC endpoint or an in-memory fake for tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::data_types::{Address, TransactionHash, TransactionReceipt};

/// Types that can be shared across threads, except when compiling for
/// `wasm32-unknown-unknown`, where JavaScript handles are neither [`Send`] nor [`Sync`].
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSendSync for T {}

/// Types that can be shared across threads, except when compiling for
/// `wasm32-unknown-unknown`, where JavaScript handles are neither [`Send`] nor [`Sync`].
#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> MaybeSendSync for T {}

/// An error reported by a [`WalletProvider`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ProviderError {
    /// The user refused the request in the wallet.
    #[error("request rejected by the user: {message}")]
    Rejected {
        /// The error code reported by the wallet.
        code: i64,
        /// The message reported by the wallet.
        message: String,
    },

    /// The node or wallet answered with an error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// The JSON-RPC error code.
        code: i64,
        /// The JSON-RPC error message.
        message: String,
    },

    /// The transaction was included but its execution reverted.
    #[error("transaction {0} reverted")]
    Reverted(TransactionHash),

    /// The provider could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with something that could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A wallet that grants account access and relays requests to a blockchain node.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait WalletProvider: MaybeSendSync {
    /// Requests permission to use the user's accounts, returning the granted accounts.
    ///
    /// This may suspend for as long as the wallet waits for the user to decide.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Executes a read-only call of the contract at `to` with the given `data`, returning
    /// the raw return data.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ProviderError>;

    /// Signs and submits a transaction from the `from` account to the contract at `to`,
    /// resolving once it has been included.
    ///
    /// A transaction that is included but reverts results in [`ProviderError::Reverted`].
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
    ) -> Result<TransactionReceipt, ProviderError>;
}
