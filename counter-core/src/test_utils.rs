// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Helpers for testing code that talks to a wallet.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    contract::{encode_counter, get_counter_calldata, CounterMethod},
    data_types::{Address, TransactionHash, TransactionReceipt},
    provider::{ProviderError, WalletProvider},
};

/// The error code EIP-1193 wallets use when the user rejects a request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// An in-memory wallet backed by a fake chain holding a single counter contract.
///
/// Clones share the same chain, so a test can keep a handle to inspect and script the
/// wallet after giving it to a session.
#[derive(Clone)]
pub struct FakeWallet {
    chain: Arc<Mutex<FakeChain>>,
    send_arrived: Arc<Notify>,
    send_released: Arc<Notify>,
    read_arrived: Arc<Notify>,
    read_released: Arc<Notify>,
}

struct FakeChain {
    accounts: Vec<Address>,
    deny_accounts: bool,
    counter: u64,
    block_number: u64,
    reads: usize,
    fail_reads: bool,
    hold_next_read: bool,
    reject_next_send: bool,
    hold_sends: bool,
    sent: Vec<(Address, CounterMethod)>,
}

impl FakeWallet {
    /// Creates a wallet with one account and a counter holding `counter`.
    pub fn new(counter: u64) -> Self {
        FakeWallet {
            chain: Arc::new(Mutex::new(FakeChain {
                accounts: vec![Self::default_account()],
                deny_accounts: false,
                counter,
                block_number: 0,
                reads: 0,
                fail_reads: false,
                hold_next_read: false,
                reject_next_send: false,
                hold_sends: false,
                sent: Vec::new(),
            })),
            send_arrived: Arc::new(Notify::new()),
            send_released: Arc::new(Notify::new()),
            read_arrived: Arc::new(Notify::new()),
            read_released: Arc::new(Notify::new()),
        }
    }

    /// The account granted by default.
    pub fn default_account() -> Address {
        Address::new([0x11; 20])
    }

    /// Replaces the accounts returned when access is granted.
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.chain().accounts = accounts;
    }

    /// Makes the user reject requests for account access.
    pub fn deny_account_access(&self) {
        self.chain().deny_accounts = true;
    }

    /// Makes reads of the counter fail with an RPC error while `fail` is [`true`].
    pub fn fail_reads(&self, fail: bool) {
        self.chain().fail_reads = fail;
    }

    /// Makes the next read of the counter wait, after taking its value, until
    /// [`FakeWallet::release_read`] is called.
    pub fn hold_next_read(&self) {
        self.chain().hold_next_read = true;
    }

    /// Waits until a read is being held.
    pub async fn wait_for_held_read(&self) {
        self.read_arrived.notified().await;
    }

    /// Lets the held read return.
    pub fn release_read(&self) {
        self.read_released.notify_one();
    }

    /// Makes the user reject the next transaction.
    pub fn reject_next_send(&self) {
        self.chain().reject_next_send = true;
    }

    /// Makes transactions wait until [`FakeWallet::release_send`] is called.
    pub fn hold_sends(&self) {
        self.chain().hold_sends = true;
    }

    /// Waits until a transaction is being held.
    pub async fn wait_for_held_send(&self) {
        self.send_arrived.notified().await;
    }

    /// Lets one held transaction proceed.
    pub fn release_send(&self) {
        self.send_released.notify_one();
    }

    /// Changes the counter without going through the wallet.
    pub fn set_counter(&self, counter: u64) {
        self.chain().counter = counter;
    }

    /// The counter value on the fake chain.
    pub fn counter(&self) -> u64 {
        self.chain().counter
    }

    /// The number of times the counter was read.
    pub fn read_count(&self) -> usize {
        self.chain().reads
    }

    /// The transactions that were applied to the chain, including reverted ones.
    pub fn sent_methods(&self) -> Vec<(Address, CounterMethod)> {
        self.chain().sent.clone()
    }

    fn chain(&self) -> MutexGuard<'_, FakeChain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(
        &self,
        from: Address,
        method: CounterMethod,
    ) -> Result<TransactionReceipt, ProviderError> {
        let mut chain = self.chain();
        chain.sent.push((from, method));
        chain.block_number += 1;

        let mut hash = [0; 32];
        hash[24..].copy_from_slice(&(chain.sent.len() as u64).to_be_bytes());
        let transaction_hash = TransactionHash::new(hash);

        let counter = match method {
            CounterMethod::Increment => chain.counter + 1,
            CounterMethod::Decrement => match chain.counter.checked_sub(1) {
                Some(counter) => counter,
                None => return Err(ProviderError::Reverted(transaction_hash)),
            },
            CounterMethod::Reset => 0,
        };
        chain.counter = counter;
        Ok(TransactionReceipt {
            transaction_hash,
            block_number: Some(chain.block_number),
        })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let chain = self.chain();
        if chain.deny_accounts {
            return Err(ProviderError::Rejected {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".to_owned(),
            });
        }
        Ok(chain.accounts.clone())
    }

    async fn call(&self, _to: Address, data: Vec<u8>) -> Result<Vec<u8>, ProviderError> {
        let (output, hold) = {
            let mut chain = self.chain();
            if chain.fail_reads {
                return Err(ProviderError::Transport("connection refused".to_owned()));
            }
            if data != get_counter_calldata() {
                return Err(ProviderError::Rpc {
                    code: 3,
                    message: "execution reverted".to_owned(),
                });
            }
            chain.reads += 1;
            let hold = std::mem::take(&mut chain.hold_next_read);
            (encode_counter(chain.counter), hold)
        };
        if hold {
            self.read_arrived.notify_one();
            self.read_released.notified().await;
        }
        Ok(output)
    }

    async fn send_transaction(
        &self,
        from: Address,
        _to: Address,
        data: Vec<u8>,
    ) -> Result<TransactionReceipt, ProviderError> {
        let method = CounterMethod::from_calldata(&data).ok_or_else(|| ProviderError::Rpc {
            code: 3,
            message: "execution reverted".to_owned(),
        })?;

        let (hold, reject) = {
            let mut chain = self.chain();
            let reject = std::mem::take(&mut chain.reject_next_send);
            (chain.hold_sends, reject)
        };
        if hold {
            self.send_arrived.notify_one();
            self.send_released.notified().await;
        }
        if reject {
            return Err(ProviderError::Rejected {
                code: USER_REJECTED_CODE,
                message: "User denied transaction signature.".to_owned(),
            });
        }
        self.apply(from, method)
    }
}
