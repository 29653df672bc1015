// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A [`WalletProvider`][counter_core::WalletProvider] for the counter client based on the
//! Ethereum JSON-RPC API.
//!
//! The wallet itself is transport-agnostic: requests go through a [`JsonRpcClient`], which
//! is either an [`HttpClient`] posting to a node, or, with the `web` feature on
//! `wasm32`, a `BrowserClient` forwarding to the wallet injected in the page.

#![deny(missing_docs)]

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod browser;
pub mod client;
#[cfg(all(feature = "reqwest", not(target_arch = "wasm32")))]
pub mod http;
pub mod wallet;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use self::browser::BrowserClient;
#[cfg(all(feature = "reqwest", not(target_arch = "wasm32")))]
pub use self::http::HttpClient;
pub use self::{
    client::{JsonRpcClient, JsonRpcError},
    wallet::{JsonRpcWallet, JsonRpcWalletConfig},
};
