// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `counter` command-line client.

mod options;
mod render;
mod shell;

use anyhow::Result;
use clap::Parser as _;
use counter_core::CounterSession;
use counter_rpc::{HttpClient, JsonRpcWallet};
use tokio::io::BufReader;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::options::{Command, CounterOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let options = CounterOptions::parse();
    let wallet = JsonRpcWallet::with_config(
        HttpClient::new(options.rpc_url.clone()),
        options.wallet_config(),
    );
    let session = CounterSession::new(Some(wallet), options.session_config());
    let printer = tokio::spawn(render::print_events(session.subscribe()));

    let result = run(&session, options.command).await;
    drop(session);
    printer.await?;
    result
}

async fn run(session: &CounterSession<JsonRpcWallet<HttpClient>>, command: Command) -> Result<()> {
    session.connect().await?;
    match command {
        // Connecting already read the counter.
        Command::Get => {}
        Command::Increment => {
            session.increment().await?;
        }
        Command::Decrement => {
            session.decrement().await?;
        }
        Command::Reset => {
            session.reset().await?;
        }
        Command::Shell => shell::run(session, BufReader::new(tokio::io::stdin())).await?,
    }
    Ok(())
}
