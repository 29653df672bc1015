// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Printing of session events on the terminal.

use colored::{ColoredString, Colorize as _};
use counter_core::{SessionEvent, TransactionStatus};
use tokio::sync::mpsc;

/// Prints every event until the session goes away.
pub async fn print_events(mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        if let Some(line) = describe(&event) {
            println!("{line}");
        }
    }
}

/// Formats an event for the terminal, skipping the return to idle.
pub fn describe(event: &SessionEvent) -> Option<ColoredString> {
    let line = match event {
        SessionEvent::Connected { account } => format!("Account: {account}").bold(),
        SessionEvent::CounterUpdated(counter) => format!("Counter: {counter}").normal(),
        SessionEvent::StatusChanged { status, message } => match status {
            TransactionStatus::Idle => return None,
            TransactionStatus::Pending => message.yellow(),
            TransactionStatus::Confirmed => message.green(),
            TransactionStatus::Failed => message.red(),
        },
        SessionEvent::Notice { message } => message.red(),
    };
    Some(line)
}
