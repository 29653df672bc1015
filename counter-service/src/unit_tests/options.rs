// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use clap::Parser as _;
use counter_core::{config::DEFAULT_CONTRACT_ADDRESS, Address, SessionConfig};
use test_case::test_case;

use super::{Command, CounterOptions};

/// Test that the defaults match the default session configuration.
#[test]
fn defaults() {
    let options = CounterOptions::try_parse_from(["counter", "get"]).expect("Valid arguments");

    assert_eq!(options.command, Command::Get);
    assert_eq!(options.contract_address, DEFAULT_CONTRACT_ADDRESS);
    assert_eq!(options.session_config(), SessionConfig::default());
    assert_eq!(
        options.wallet_config().poll_interval,
        Duration::from_secs(1)
    );
}

/// Test that the flags map onto the configurations.
#[test]
fn flags_override_configuration() {
    let options = CounterOptions::try_parse_from([
        "counter",
        "--rpc-url",
        "http://node:8545",
        "--contract-address",
        "0x2222222222222222222222222222222222222222",
        "--command-timeout",
        "30",
        "--poll-interval-ms",
        "250",
        "increment",
    ])
    .expect("Valid arguments");

    assert_eq!(options.rpc_url, "http://node:8545");
    assert_eq!(options.command, Command::Increment);
    assert_eq!(
        options.session_config(),
        SessionConfig::default()
            .with_contract_address(Address::new([0x22; 20]))
            .with_command_timeout(Duration::from_secs(30))
    );
    assert_eq!(
        options.wallet_config().poll_interval,
        Duration::from_millis(250)
    );
}

/// Test that invalid invocations are rejected.
#[test_case(&["counter"]; "without a subcommand")]
#[test_case(&["counter", "--contract-address", "0x1234", "get"]; "with a short address")]
#[test_case(&["counter", "multiply"]; "with an unknown subcommand")]
fn invalid_arguments(arguments: &[&str]) {
    assert!(CounterOptions::try_parse_from(arguments.iter().copied()).is_err());
}
