// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The [`CounterSession`], which connects to a wallet and drives the counter contract.
//!
//! Every accepted command goes through the same lifecycle:
//!
//! ```text
//! Idle -> Pending -> Confirmed | Failed -> (refresh) -> Idle
//! ```
//!
//! Only one command may be pending at a time. The counter value is refreshed from the
//! contract after every command, whatever its outcome, and is never updated from local
//! arithmetic.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use thiserror::Error;
use tokio::sync::mpsc;
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::timeout;
use tracing::{debug, instrument, warn};
#[cfg(target_arch = "wasm32")]
use wasmtimer::tokio::timeout;

use crate::{
    config::SessionConfig,
    contract::{CounterContract, CounterMethod},
    data_types::{Address, TransactionReceipt},
    notifier::Notifier,
    provider::{ProviderError, WalletProvider},
};

#[cfg(test)]
#[path = "unit_tests/session.rs"]
mod tests;

/// The message shown while a transaction is pending.
pub const PENDING_MESSAGE: &str = "Transaction in progress...";

/// The message shown once a transaction is confirmed.
pub const CONFIRMED_MESSAGE: &str = "Transaction confirmed!";

/// An error performing a session operation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    /// No wallet provider was injected.
    #[error("no wallet provider is available")]
    ProviderUnavailable,

    /// The user did not grant access to an account.
    #[error("account access was denied: {0}")]
    AuthorizationDenied(String),

    /// The operation needs a connected session.
    #[error("the session is not connected")]
    NotConnected,

    /// The wallet provider or the node failed.
    #[error(transparent)]
    Rpc(#[from] ProviderError),

    /// Another command is still pending.
    #[error("another transaction is still in progress")]
    CommandInProgress,

    /// The command did not complete in time.
    #[error("the transaction did not complete within {0:?}")]
    Timeout(Duration),
}

impl SessionError {
    /// Converts an error requesting accounts, treating a user rejection as a denial.
    fn from_account_request(error: ProviderError) -> Self {
        match error {
            ProviderError::Rejected { message, .. } => SessionError::AuthorizationDenied(message),
            other => SessionError::Rpc(other),
        }
    }
}

/// The status of the current command.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TransactionStatus {
    /// No command is running.
    #[default]
    Idle,
    /// A transaction was submitted and has not completed.
    Pending,
    /// The transaction completed without error.
    Confirmed,
    /// The transaction failed, was rejected or timed out.
    Failed,
}

impl TransactionStatus {
    /// Returns [`true`] if a command is in flight.
    pub fn is_pending(self) -> bool {
        self == TransactionStatus::Pending
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Idle => "idle",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Failed => "failed",
        };
        formatter.write_str(name)
    }
}

/// A change in the observable state of a [`CounterSession`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionEvent {
    /// The session connected with the given account.
    Connected {
        /// The active account.
        account: Address,
    },

    /// A fresh read of the contract returned a counter value.
    CounterUpdated(u64),

    /// The status of the current command changed.
    StatusChanged {
        /// The new status.
        status: TransactionStatus,
        /// The message to show to the user.
        message: String,
    },

    /// An operation outside of a command failed.
    Notice {
        /// The message to show to the user.
        message: String,
    },
}

/// A copy of the observable state of a [`CounterSession`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionSnapshot {
    /// The active account, once connected.
    pub account: Option<Address>,
    /// The last counter value read from the contract.
    pub counter: Option<u64>,
    /// The status of the current command.
    pub status: TransactionStatus,
    /// The last message for the user.
    pub message: Option<String>,
}

impl SessionSnapshot {
    /// Returns [`true`] if the session is connected.
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

/// The account and contract handle, which are only ever set together.
struct Connection<P> {
    account: Address,
    contract: CounterContract<P>,
}

/// The mutable state of a session.
struct SessionState<P> {
    connection: Option<Arc<Connection<P>>>,
    counter: Option<u64>,
    status: TransactionStatus,
    message: Option<String>,
    /// The ticket handed to the next read of the counter.
    next_read: u64,
    /// The ticket of the read that produced `counter`.
    stored_read: u64,
}

impl<P> Default for SessionState<P> {
    fn default() -> Self {
        SessionState {
            connection: None,
            counter: None,
            status: TransactionStatus::Idle,
            message: None,
            next_read: 1,
            stored_read: 0,
        }
    }
}

impl<P> SessionState<P> {
    /// Hands out the ticket of a read that is about to start.
    fn start_read(&mut self) -> u64 {
        let ticket = self.next_read;
        self.next_read += 1;
        ticket
    }

    /// Stores the `counter` returned by the read holding `ticket`, unless a read that
    /// started later was already stored. Returns [`true`] if the value was stored.
    fn store_read(&mut self, ticket: u64, counter: u64) -> bool {
        if ticket <= self.stored_read {
            return false;
        }
        self.stored_read = ticket;
        self.counter = Some(counter);
        true
    }
}

/// A session driving the counter contract through a [`WalletProvider`].
pub struct CounterSession<P> {
    provider: Option<Arc<P>>,
    config: SessionConfig,
    state: Mutex<SessionState<P>>,
    command_slot: tokio::sync::Mutex<()>,
    notifier: Notifier<SessionEvent>,
}

impl<P> CounterSession<P>
where
    P: WalletProvider,
{
    /// Creates a disconnected session.
    ///
    /// `provider` is [`None`] when no wallet is available, in which case
    /// [`CounterSession::connect`] fails with [`SessionError::ProviderUnavailable`].
    pub fn new(provider: Option<P>, config: SessionConfig) -> Self {
        CounterSession {
            provider: provider.map(Arc::new),
            config,
            state: Mutex::new(SessionState::default()),
            command_slot: tokio::sync::Mutex::new(()),
            notifier: Notifier::default(),
        }
    }

    /// The configuration of this session.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribes to the events of this session.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        self.notifier.subscribe()
    }

    /// Returns a copy of the observable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            account: state.connection.as_ref().map(|connection| connection.account),
            counter: state.counter,
            status: state.status,
            message: state.message.clone(),
        }
    }

    /// The active account, once connected.
    pub fn account(&self) -> Option<Address> {
        self.connection().map(|connection| connection.account)
    }

    /// The last counter value read from the contract.
    pub fn counter(&self) -> Option<u64> {
        self.state().counter
    }

    /// The status of the current command.
    pub fn status(&self) -> TransactionStatus {
        self.state().status
    }

    /// Returns [`true`] if the session has an account and a contract handle.
    pub fn is_connected(&self) -> bool {
        self.state().connection.is_some()
    }

    /// Requests account access, binds the contract and reads the initial counter value.
    ///
    /// Nothing is changed unless every step succeeds. Connecting an already connected
    /// session repeats the bootstrap and replaces the previous connection.
    #[instrument(level = "debug", skip(self))]
    pub async fn connect(&self) -> Result<Address, SessionError> {
        let result = self.bootstrap().await;
        if let Err(error) = &result {
            warn!(%error, "Failed to connect");
            self.publish_notice(format!("Failed to connect: {error}"));
        }
        result
    }

    async fn bootstrap(&self) -> Result<Address, SessionError> {
        let provider = self
            .provider
            .clone()
            .ok_or(SessionError::ProviderUnavailable)?;
        let accounts = provider
            .request_accounts()
            .await
            .map_err(SessionError::from_account_request)?;
        let account = accounts.first().copied().ok_or_else(|| {
            SessionError::AuthorizationDenied("the wallet returned no accounts".to_owned())
        })?;
        let contract = CounterContract::new(self.config.contract_address, provider);
        let ticket = self.state().start_read();
        let counter = contract.get_counter().await?;

        let connection = Arc::new(Connection { account, contract });
        let mut state = self.state();
        state.connection = Some(connection);
        let stored = state.store_read(ticket, counter);
        debug!(%account, counter, "Connected");
        self.notifier.notify(&SessionEvent::Connected { account });
        if stored {
            self.notifier.notify(&SessionEvent::CounterUpdated(counter));
        }
        Ok(account)
    }

    /// Reads the counter from the contract.
    ///
    /// Returns the counter value held by the session afterwards. If a read that started
    /// later completed first, its newer value is kept and returned instead.
    #[instrument(level = "debug", skip(self))]
    pub async fn refresh(&self) -> Result<u64, SessionError> {
        let result = match self.connection() {
            Some(connection) => self.read_counter(&connection).await,
            None => Err(SessionError::NotConnected),
        };
        if let Err(error) = &result {
            warn!(%error, "Failed to refresh the counter");
            self.publish_notice(format!("Failed to read the counter: {error}"));
        }
        result
    }

    /// Sends an `increment()` transaction.
    pub async fn increment(&self) -> Result<TransactionReceipt, SessionError> {
        self.command(CounterMethod::Increment).await
    }

    /// Sends a `decrement()` transaction.
    pub async fn decrement(&self) -> Result<TransactionReceipt, SessionError> {
        self.command(CounterMethod::Decrement).await
    }

    /// Sends a `reset()` transaction.
    pub async fn reset(&self) -> Result<TransactionReceipt, SessionError> {
        self.command(CounterMethod::Reset).await
    }

    /// Sends a transaction invoking `method` and refreshes the counter afterwards.
    ///
    /// Fails immediately with [`SessionError::CommandInProgress`] if another command is
    /// pending, without touching the status. The returned result is the outcome of the
    /// transaction itself; a failure to refresh the counter afterwards is only reported
    /// through the status message.
    #[instrument(level = "debug", skip(self))]
    pub async fn command(&self, method: CounterMethod) -> Result<TransactionReceipt, SessionError> {
        let Some(connection) = self.connection() else {
            self.publish_notice(format!("Cannot {method}: {}", SessionError::NotConnected));
            return Err(SessionError::NotConnected);
        };
        let Ok(_slot) = self.command_slot.try_lock() else {
            debug!("Rejecting command while another one is pending");
            return Err(SessionError::CommandInProgress);
        };

        self.transition(TransactionStatus::Pending, PENDING_MESSAGE.to_owned());
        let outcome = match timeout(
            self.config.command_timeout,
            connection.contract.send(method, connection.account),
        )
        .await
        {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(error)) => Err(SessionError::Rpc(error)),
            Err(_) => Err(SessionError::Timeout(self.config.command_timeout)),
        };

        let mut message = match &outcome {
            Ok(receipt) => {
                debug!(transaction = %receipt.transaction_hash, "Transaction confirmed");
                self.transition(TransactionStatus::Confirmed, CONFIRMED_MESSAGE.to_owned());
                CONFIRMED_MESSAGE.to_owned()
            }
            Err(error) => {
                warn!(%error, "Transaction failed");
                let message = format!("Transaction failed: {error}");
                self.transition(TransactionStatus::Failed, message.clone());
                message
            }
        };

        if let Err(error) = self.read_counter(&connection).await {
            warn!(%error, "Failed to refresh the counter after the transaction");
            message = format!("{message} Failed to read the counter: {error}");
        }
        self.transition(TransactionStatus::Idle, message);
        outcome
    }

    /// Reads the counter, storing the result only if no later read was stored already.
    async fn read_counter(&self, connection: &Connection<P>) -> Result<u64, SessionError> {
        let ticket = self.state().start_read();
        let counter = connection.contract.get_counter().await?;
        let mut state = self.state();
        if !state.store_read(ticket, counter) {
            debug!(counter, ticket, "Discarding the result of a stale read");
            return Ok(state.counter.unwrap_or(counter));
        }
        debug!(counter, "Counter refreshed");
        self.notifier.notify(&SessionEvent::CounterUpdated(counter));
        Ok(counter)
    }

    fn transition(&self, status: TransactionStatus, message: String) {
        let mut state = self.state();
        state.status = status;
        state.message = Some(message.clone());
        debug!(%status, "Transaction status changed");
        self.notifier
            .notify(&SessionEvent::StatusChanged { status, message });
    }

    fn publish_notice(&self, message: String) {
        let mut state = self.state();
        state.message = Some(message.clone());
        self.notifier.notify(&SessionEvent::Notice { message });
    }

    fn connection(&self) -> Option<Arc<Connection<P>>> {
        self.state().connection.clone()
    }

    fn state(&self) -> MutexGuard<'_, SessionState<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
