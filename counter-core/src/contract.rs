// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A typed binding for the deployed counter contract.
//!
//! The contract exposes a single view method, `getCounter() returns (uint256)`, and three
//! state-mutating methods without arguments: `increment()`, `decrement()` and `reset()`.

use std::{fmt, sync::Arc};

use alloy_sol_types::{SolCall, SolValue};

use self::abi::{decrementCall, getCounterCall, incrementCall, resetCall};
use crate::{
    data_types::{Address, TransactionReceipt, U256},
    provider::{ProviderError, WalletProvider},
};

#[cfg(test)]
#[path = "unit_tests/contract.rs"]
mod tests;

mod abi {
    #![allow(missing_docs)]

    alloy_sol_types::sol! {
        function getCounter() external view returns (uint256);
        function increment() external;
        function decrement() external;
        function reset() external;
    }
}

/// The signature of the view method returning the counter.
pub const GET_COUNTER_SIGNATURE: &str = getCounterCall::SIGNATURE;

/// The ABI selector of the view method returning the counter.
pub const GET_COUNTER_SELECTOR: [u8; 4] = getCounterCall::SELECTOR;

/// The calldata reading the counter.
pub fn get_counter_calldata() -> Vec<u8> {
    getCounterCall {}.abi_encode()
}

/// ABI-encodes a counter value the way `getCounter` returns it.
pub fn encode_counter(value: u64) -> Vec<u8> {
    U256::from(value).abi_encode()
}

/// Decodes the `uint256` returned by `getCounter`.
///
/// Values that don't fit in a [`u64`] are reported as an invalid response.
pub fn decode_counter(output: &[u8]) -> Result<u64, ProviderError> {
    let counter = getCounterCall::abi_decode_returns(output, false)
        .map_err(|error| {
            ProviderError::InvalidResponse(format!("invalid getCounter return data: {error}"))
        })?
        ._0;
    u64::try_from(counter).map_err(|_| {
        ProviderError::InvalidResponse(format!("counter value {counter} does not fit in 64 bits"))
    })
}

/// One of the state-mutating methods of the counter contract.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CounterMethod {
    /// Adds one to the counter.
    Increment,
    /// Subtracts one from the counter.
    Decrement,
    /// Sets the counter back to zero.
    Reset,
}

impl CounterMethod {
    /// All the state-mutating methods.
    pub const ALL: [CounterMethod; 3] = [
        CounterMethod::Increment,
        CounterMethod::Decrement,
        CounterMethod::Reset,
    ];

    /// The Solidity signature of the method.
    pub fn signature(self) -> &'static str {
        match self {
            CounterMethod::Increment => incrementCall::SIGNATURE,
            CounterMethod::Decrement => decrementCall::SIGNATURE,
            CounterMethod::Reset => resetCall::SIGNATURE,
        }
    }

    /// The ABI selector of the method.
    pub fn selector(self) -> [u8; 4] {
        match self {
            CounterMethod::Increment => incrementCall::SELECTOR,
            CounterMethod::Decrement => decrementCall::SELECTOR,
            CounterMethod::Reset => resetCall::SELECTOR,
        }
    }

    /// The calldata invoking this method.
    pub fn calldata(self) -> Vec<u8> {
        match self {
            CounterMethod::Increment => incrementCall {}.abi_encode(),
            CounterMethod::Decrement => decrementCall {}.abi_encode(),
            CounterMethod::Reset => resetCall {}.abi_encode(),
        }
    }

    /// Finds the method whose calldata is `data`.
    pub fn from_calldata(data: &[u8]) -> Option<Self> {
        let selector = <[u8; 4]>::try_from(data).ok()?;
        Self::ALL
            .into_iter()
            .find(|method| method.selector() == selector)
    }
}

impl fmt::Display for CounterMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CounterMethod::Increment => "increment",
            CounterMethod::Decrement => "decrement",
            CounterMethod::Reset => "reset",
        };
        formatter.write_str(name)
    }
}

/// A handle to the counter contract deployed at a fixed address.
pub struct CounterContract<P> {
    address: Address,
    provider: Arc<P>,
}

impl<P> Clone for CounterContract<P> {
    fn clone(&self) -> Self {
        CounterContract {
            address: self.address,
            provider: self.provider.clone(),
        }
    }
}

impl<P> CounterContract<P>
where
    P: WalletProvider,
{
    /// Binds the contract at `address` to the `provider`.
    pub fn new(address: Address, provider: Arc<P>) -> Self {
        CounterContract { address, provider }
    }

    /// The address of the contract.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Reads the current counter value.
    pub async fn get_counter(&self) -> Result<u64, ProviderError> {
        let output = self
            .provider
            .call(self.address, get_counter_calldata())
            .await?;
        decode_counter(&output)
    }

    /// Sends a transaction invoking `method` from the `from` account.
    pub async fn send(
        &self,
        method: CounterMethod,
        from: Address,
    ) -> Result<TransactionReceipt, ProviderError> {
        self.provider
            .send_transaction(from, self.address, method.calldata())
            .await
    }
}
