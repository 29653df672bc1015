// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Command-line options of the `counter` client.

use std::time::Duration;

use clap::{Parser, Subcommand};
use counter_core::{
    config::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONTRACT_ADDRESS},
    Address, SessionConfig,
};
use counter_rpc::JsonRpcWalletConfig;

#[cfg(test)]
#[path = "unit_tests/options.rs"]
mod tests;

/// Options for the counter client.
#[derive(Debug, Parser)]
#[command(
    name = "counter",
    version,
    about = "Reads and updates the counter contract through a JSON-RPC wallet"
)]
pub struct CounterOptions {
    /// The JSON-RPC endpoint of the node holding the accounts.
    #[arg(long, env = "COUNTER_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// The address of the counter contract.
    #[arg(long, default_value_t = DEFAULT_CONTRACT_ADDRESS)]
    pub contract_address: Address,

    /// Seconds to wait for a transaction before giving up on it.
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub command_timeout: u64,

    /// Milliseconds between two polls for a transaction receipt.
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// The operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

impl CounterOptions {
    /// The configuration of the session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_contract_address(self.contract_address)
            .with_command_timeout(Duration::from_secs(self.command_timeout))
    }

    /// The configuration of the JSON-RPC wallet.
    pub fn wallet_config(&self) -> JsonRpcWalletConfig {
        JsonRpcWalletConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// An operation of the counter client.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Subcommand)]
pub enum Command {
    /// Show the current counter value.
    Get,
    /// Add one to the counter.
    Increment,
    /// Subtract one from the counter.
    Decrement,
    /// Set the counter back to zero.
    Reset,
    /// Read operations from the standard input, one per line.
    Shell,
}
