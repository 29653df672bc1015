// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core data types exchanged with the wallet provider.
//!
//! Addresses and hashes are the [`alloy_primitives`] types, so they parse from and
//! serialize to `0x`-prefixed hexadecimal the way Ethereum nodes and wallets expect.

pub use alloy_primitives::{Address, Bytes, TxHash as TransactionHash, U256};

#[cfg(test)]
#[path = "unit_tests/data_types.rs"]
mod tests;

/// The receipt of a transaction that was included without reverting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionReceipt {
    /// The hash of the transaction.
    pub transaction_hash: TransactionHash,

    /// The block the transaction was included in, if the provider reported it.
    pub block_number: Option<u64>,
}
