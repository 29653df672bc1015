// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core of the counter client: the types exchanged with a wallet, the binding for the
//! counter contract and the [`CounterSession`] that orchestrates them.
//!
//! A session is created with an injected [`WalletProvider`], connects to it to obtain an
//! account, and then issues `increment`, `decrement` and `reset` transactions against the
//! counter contract. The counter value shown by the session is only ever taken from a fresh
//! read of the contract, never computed locally.

#![deny(missing_docs)]

pub mod config;
pub mod contract;
pub mod data_types;
pub mod notifier;
pub mod provider;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use self::{
    config::SessionConfig,
    contract::{CounterContract, CounterMethod},
    data_types::{Address, TransactionHash, TransactionReceipt},
    provider::{ProviderError, WalletProvider},
    session::{CounterSession, SessionError, SessionEvent, SessionSnapshot, TransactionStatus},
};
