// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;
use counter_core::{
    contract::CounterMethod, test_utils::FakeWallet, CounterSession, SessionConfig,
};
use test_case::test_case;

use super::{run, Intent};

#[test_case("+", Intent::Command(CounterMethod::Increment); "plus")]
#[test_case("Increment", Intent::Command(CounterMethod::Increment); "increment")]
#[test_case(" - ", Intent::Command(CounterMethod::Decrement); "minus")]
#[test_case("reset", Intent::Command(CounterMethod::Reset); "reset")]
#[test_case("get", Intent::Refresh; "get")]
#[test_case("quit", Intent::Quit; "quit")]
fn intents_are_parsed(input: &str, expected: Intent) {
    assert_eq!(input.parse::<Intent>().ok(), Some(expected));
}

#[test]
fn unknown_intent_is_rejected() {
    assert_matches!("double".parse::<Intent>(), Err(_));
}

/// Test that operations are forwarded in order, that failures don't stop the loop and
/// that nothing after `quit` runs.
#[test_log::test(tokio::test)]
async fn shell_forwards_intents() -> anyhow::Result<()> {
    let wallet = FakeWallet::new(0);
    let session = CounterSession::new(Some(wallet.clone()), SessionConfig::default());
    session.connect().await?;

    let input: &[u8] = b"+\n+\nbogus\n\n-\n-\n-\nget\nquit\nreset\n";
    run(&session, input).await?;

    let methods = wallet
        .sent_methods()
        .into_iter()
        .map(|(_, method)| method)
        .collect::<Vec<_>>();
    assert_eq!(
        methods,
        vec![
            CounterMethod::Increment,
            CounterMethod::Increment,
            CounterMethod::Decrement,
            CounterMethod::Decrement,
            CounterMethod::Decrement,
        ]
    );
    assert_eq!(session.counter(), Some(0));

    Ok(())
}
