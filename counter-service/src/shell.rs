// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An interactive loop forwarding operations typed by the user into a session.

use std::str::FromStr;

use anyhow::Result;
use counter_core::{contract::CounterMethod, CounterSession, WalletProvider};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

#[cfg(test)]
#[path = "unit_tests/shell.rs"]
mod tests;

/// Something the user asked for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Intent {
    /// Send a transaction.
    Command(CounterMethod),
    /// Read the counter again.
    Refresh,
    /// Leave the shell.
    Quit,
}

impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "+" | "inc" | "increment" => Ok(Intent::Command(CounterMethod::Increment)),
            "-" | "dec" | "decrement" => Ok(Intent::Command(CounterMethod::Decrement)),
            "0" | "reset" => Ok(Intent::Command(CounterMethod::Reset)),
            "get" | "refresh" => Ok(Intent::Refresh),
            "q" | "quit" | "exit" => Ok(Intent::Quit),
            other => anyhow::bail!(
                "unknown operation {other:?}, expected one of: increment, decrement, reset, get, quit"
            ),
        }
    }
}

/// Reads intents from `input` and forwards them to the `session` until the input ends or
/// the user quits.
///
/// Failed operations are reported and the loop continues, the session has already turned
/// them into status messages.
pub async fn run<P, R>(session: &CounterSession<P>, input: R) -> Result<()>
where
    P: WalletProvider,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let intent = match line.parse::<Intent>() {
            Ok(intent) => intent,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };
        let result = match intent {
            Intent::Command(method) => session.command(method).await.map(drop),
            Intent::Refresh => session.refresh().await.map(drop),
            Intent::Quit => break,
        };
        if let Err(error) = result {
            tracing::debug!(%error, "Operation failed");
        }
    }
    Ok(())
}
