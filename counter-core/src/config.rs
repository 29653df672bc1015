// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration of a [`CounterSession`][crate::CounterSession].

use std::time::Duration;

use alloy_primitives::address;

use crate::data_types::Address;

/// The address of the deployed counter contract.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("f650edca5d3cb7649af37bd49b87b79253f96e76");

/// How long a command may stay pending before it is considered failed.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration parameters for a [`CounterSession`][crate::CounterSession].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    /// The address of the counter contract.
    pub contract_address: Address,

    /// The maximum time to wait for a submitted transaction.
    pub command_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl SessionConfig {
    /// Returns this configuration with a different contract address.
    pub fn with_contract_address(mut self, contract_address: Address) -> Self {
        self.contract_address = contract_address;
        self
    }

    /// Returns this configuration with a different command timeout.
    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }
}
