// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the [`CounterSession`] lifecycle.

use std::time::Duration;

use assert_matches::assert_matches;
use tokio::sync::mpsc;

use super::{
    CounterSession, SessionError, SessionEvent, TransactionStatus, CONFIRMED_MESSAGE,
    PENDING_MESSAGE,
};
use crate::{
    config::SessionConfig, contract::CounterMethod, provider::ProviderError,
    test_utils::FakeWallet, Address,
};

/// Creates a session using a [`FakeWallet`] whose counter starts at `counter`.
fn session_with_counter(counter: u64) -> (CounterSession<FakeWallet>, FakeWallet) {
    let wallet = FakeWallet::new(counter);
    let session = CounterSession::new(Some(wallet.clone()), SessionConfig::default());
    (session, wallet)
}

/// Collects the events that are already queued.
fn drain(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Extracts the status transitions from a list of events.
fn statuses(events: &[SessionEvent]) -> Vec<TransactionStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::StatusChanged { status, .. } => Some(*status),
            _ => None,
        })
        .collect()
}

/// Test that a fresh session connects and shows the on-chain counter.
#[test_log::test(tokio::test)]
async fn connect_reads_initial_counter() -> Result<(), SessionError> {
    let (session, _wallet) = session_with_counter(0);
    let mut events = session.subscribe();

    assert!(!session.is_connected());
    assert_eq!(session.counter(), None);

    let account = session.connect().await?;

    assert_eq!(account, FakeWallet::default_account());
    assert_eq!(session.account(), Some(account));
    assert_eq!(session.counter(), Some(0));
    assert_eq!(session.status(), TransactionStatus::Idle);
    assert_eq!(
        drain(&mut events),
        vec![
            SessionEvent::Connected { account },
            SessionEvent::CounterUpdated(0)
        ]
    );

    Ok(())
}

/// Test that the first granted account becomes the active one.
#[test_log::test(tokio::test)]
async fn connect_uses_first_account() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(3);
    let first = Address::new([0xaa; 20]);
    wallet.set_accounts(vec![first, Address::new([0xbb; 20])]);

    assert_eq!(session.connect().await?, first);
    assert_eq!(session.snapshot().account, Some(first));

    Ok(())
}

/// Test that connecting without a wallet fails and leaves the session disconnected.
#[test_log::test(tokio::test)]
async fn connect_without_provider() {
    let session = CounterSession::<FakeWallet>::new(None, SessionConfig::default());

    assert_matches!(
        session.connect().await,
        Err(SessionError::ProviderUnavailable)
    );
    assert!(!session.is_connected());
    assert!(session.snapshot().message.is_some());
}

/// Test that a rejected account request is reported as a denial and sets no state.
#[test_log::test(tokio::test)]
async fn connect_denied_by_user() {
    let (session, wallet) = session_with_counter(5);
    wallet.deny_account_access();

    assert_matches!(
        session.connect().await,
        Err(SessionError::AuthorizationDenied(_))
    );
    assert_eq!(session.account(), None);
    assert_eq!(session.counter(), None);
    assert_eq!(wallet.read_count(), 0);
}

/// Test that an empty account list counts as a denial.
#[test_log::test(tokio::test)]
async fn connect_without_accounts() {
    let (session, wallet) = session_with_counter(5);
    wallet.set_accounts(vec![]);

    assert_matches!(
        session.connect().await,
        Err(SessionError::AuthorizationDenied(_))
    );
    assert!(!session.is_connected());
}

/// Test that a failed initial read leaves neither the account nor the contract set.
#[test_log::test(tokio::test)]
async fn connect_is_all_or_nothing() {
    let (session, wallet) = session_with_counter(5);
    wallet.fail_reads(true);

    assert_matches!(
        session.connect().await,
        Err(SessionError::Rpc(ProviderError::Transport(_)))
    );
    assert_eq!(session.account(), None);
    assert_eq!(session.counter(), None);
    assert_matches!(session.refresh().await, Err(SessionError::NotConnected));
    assert_matches!(session.increment().await, Err(SessionError::NotConnected));
    assert!(wallet.sent_methods().is_empty());
}

/// Test that a failed reconnection keeps the previous connection.
#[test_log::test(tokio::test)]
async fn failed_reconnect_keeps_connection() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(2);
    let account = session.connect().await?;

    wallet.deny_account_access();
    assert_matches!(
        session.connect().await,
        Err(SessionError::AuthorizationDenied(_))
    );

    assert_eq!(session.account(), Some(account));
    assert_eq!(session.counter(), Some(2));

    Ok(())
}

/// Test that commands and reads need a connection and don't change the status.
#[test_log::test(tokio::test)]
async fn operations_require_connection() {
    let (session, wallet) = session_with_counter(0);
    let mut events = session.subscribe();

    for method in CounterMethod::ALL {
        assert_matches!(
            session.command(method).await,
            Err(SessionError::NotConnected)
        );
    }
    assert_matches!(session.refresh().await, Err(SessionError::NotConnected));

    assert!(statuses(&drain(&mut events)).is_empty());
    assert_eq!(session.status(), TransactionStatus::Idle);
    assert!(wallet.sent_methods().is_empty());
}

/// Test a successful increment and the status sequence it reports.
#[test_log::test(tokio::test)]
async fn increment_confirms_and_refreshes() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(0);
    session.connect().await?;
    let mut events = session.subscribe();

    let receipt = session.increment().await?;

    assert_eq!(receipt.block_number, Some(1));
    assert_eq!(session.counter(), Some(1));
    assert_eq!(session.status(), TransactionStatus::Idle);
    assert_eq!(
        drain(&mut events),
        vec![
            SessionEvent::StatusChanged {
                status: TransactionStatus::Pending,
                message: PENDING_MESSAGE.to_owned(),
            },
            SessionEvent::StatusChanged {
                status: TransactionStatus::Confirmed,
                message: CONFIRMED_MESSAGE.to_owned(),
            },
            SessionEvent::CounterUpdated(1),
            SessionEvent::StatusChanged {
                status: TransactionStatus::Idle,
                message: CONFIRMED_MESSAGE.to_owned(),
            },
        ]
    );
    assert_eq!(
        wallet.sent_methods(),
        vec![(FakeWallet::default_account(), CounterMethod::Increment)]
    );

    Ok(())
}

/// Test that a transaction rejected in the wallet fails, and that the counter is still
/// refreshed but not changed.
#[test_log::test(tokio::test)]
async fn rejected_decrement_fails_and_refreshes() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(4);
    session.connect().await?;
    let reads_before = wallet.read_count();
    let mut events = session.subscribe();

    wallet.reject_next_send();
    assert_matches!(
        session.decrement().await,
        Err(SessionError::Rpc(ProviderError::Rejected { code: 4001, .. }))
    );

    let events = drain(&mut events);
    assert_eq!(
        statuses(&events),
        vec![
            TransactionStatus::Pending,
            TransactionStatus::Failed,
            TransactionStatus::Idle
        ]
    );
    assert!(events.contains(&SessionEvent::CounterUpdated(4)));
    assert_eq!(wallet.read_count(), reads_before + 1);
    assert_eq!(session.counter(), Some(4));
    assert_matches!(
        session.snapshot().message,
        Some(message) if message.starts_with("Transaction failed")
    );

    Ok(())
}

/// Test that a reverted transaction leaves the counter as the chain reports it.
#[test_log::test(tokio::test)]
async fn reverted_decrement_keeps_counter() -> Result<(), SessionError> {
    let (session, _wallet) = session_with_counter(0);
    session.connect().await?;

    assert_matches!(
        session.decrement().await,
        Err(SessionError::Rpc(ProviderError::Reverted(_)))
    );
    assert_eq!(session.counter(), Some(0));
    assert_eq!(session.status(), TransactionStatus::Idle);

    Ok(())
}

/// Test that a second command is rejected while the first one is pending, and that the
/// first one is unaffected.
#[test_log::test(tokio::test)]
async fn concurrent_command_is_rejected() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(0);
    session.connect().await?;
    wallet.hold_sends();

    let (first, second) = tokio::join!(session.increment(), async {
        wallet.wait_for_held_send().await;
        assert_eq!(session.status(), TransactionStatus::Pending);
        let mut events = session.subscribe();

        let second = session.increment().await;

        assert_eq!(session.status(), TransactionStatus::Pending);
        assert!(drain(&mut events).is_empty());
        wallet.release_send();
        second
    });

    assert_matches!(second, Err(SessionError::CommandInProgress));
    assert!(first.is_ok());
    assert_eq!(session.counter(), Some(1));
    assert_eq!(wallet.sent_methods().len(), 1);

    // The slot is free again once the first command finished.
    wallet.release_send();
    session.increment().await?;
    assert_eq!(session.counter(), Some(2));

    Ok(())
}

/// Test that reading the counter is allowed while a command is pending.
#[test_log::test(tokio::test)]
async fn refresh_while_pending() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(9);
    session.connect().await?;
    wallet.hold_sends();

    let (command, refreshed) = tokio::join!(session.reset(), async {
        wallet.wait_for_held_send().await;
        let refreshed = session.refresh().await;
        wallet.release_send();
        refreshed
    });

    assert_eq!(refreshed?, 9);
    command?;
    assert_eq!(session.counter(), Some(0));

    Ok(())
}

/// Test that a read that started before a command finished cannot overwrite the value
/// read after the command.
#[test_log::test(tokio::test)]
async fn stale_refresh_keeps_newer_counter() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(5);
    session.connect().await?;
    wallet.hold_next_read();
    let mut events = session.subscribe();

    let (refreshed, command) = tokio::join!(session.refresh(), async {
        wallet.wait_for_held_read().await;
        let command = session.reset().await;
        assert_eq!(session.counter(), Some(0));
        wallet.release_read();
        command
    });

    command?;
    assert_eq!(refreshed?, 0);
    assert_eq!(wallet.counter(), 0);
    assert_eq!(session.counter(), Some(0));

    let counters = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            SessionEvent::CounterUpdated(counter) => Some(counter),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(counters, vec![0]);

    Ok(())
}

/// Test that a transaction that never completes fails with a timeout.
#[test_log::test(tokio::test(start_paused = true))]
async fn pending_command_times_out() -> Result<(), SessionError> {
    let wallet = FakeWallet::new(6);
    let config = SessionConfig::default().with_command_timeout(Duration::from_secs(5));
    let session = CounterSession::new(Some(wallet.clone()), config);
    session.connect().await?;
    wallet.hold_sends();
    let mut events = session.subscribe();

    assert_matches!(
        session.increment().await,
        Err(SessionError::Timeout(timeout)) if timeout == Duration::from_secs(5)
    );

    let events = drain(&mut events);
    assert_eq!(
        statuses(&events),
        vec![
            TransactionStatus::Pending,
            TransactionStatus::Failed,
            TransactionStatus::Idle
        ]
    );
    assert!(events.contains(&SessionEvent::CounterUpdated(6)));
    assert_eq!(session.counter(), Some(6));

    Ok(())
}

/// Test that a failed refresh after a confirmed transaction doesn't fail the command
/// and keeps the stale value.
#[test_log::test(tokio::test)]
async fn failed_refresh_after_confirmation() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(1);
    session.connect().await?;
    wallet.fail_reads(true);

    session.increment().await?;

    assert_eq!(wallet.counter(), 2);
    assert_eq!(session.counter(), Some(1));
    assert_eq!(session.status(), TransactionStatus::Idle);
    assert_matches!(
        session.snapshot().message,
        Some(message) if message.starts_with(CONFIRMED_MESSAGE) && message.contains("counter")
    );

    wallet.fail_reads(false);
    assert_eq!(session.refresh().await?, 2);

    Ok(())
}

/// Test that the counter always mirrors the latest read, including external changes.
#[test_log::test(tokio::test)]
async fn counter_follows_chain_reads() -> Result<(), SessionError> {
    let (session, wallet) = session_with_counter(10);
    session.connect().await?;

    assert_eq!(session.refresh().await?, 10);
    assert_eq!(session.refresh().await?, 10);

    wallet.set_counter(100);
    session.decrement().await?;
    assert_eq!(session.counter(), Some(99));

    wallet.set_counter(50);
    assert_eq!(session.counter(), Some(99));
    assert_eq!(session.refresh().await?, 50);

    session.reset().await?;
    assert_eq!(session.counter(), Some(0));

    Ok(())
}

/// Test that dropped subscribers are pruned while live ones keep receiving events.
#[test_log::test(tokio::test)]
async fn dropped_subscribers_are_pruned() -> Result<(), SessionError> {
    let (session, _wallet) = session_with_counter(0);
    let dropped = session.subscribe();
    let mut kept = session.subscribe();
    drop(dropped);

    session.connect().await?;

    assert_eq!(session.notifier.subscriber_count(), 1);
    assert_eq!(drain(&mut kept).len(), 2);

    Ok(())
}
