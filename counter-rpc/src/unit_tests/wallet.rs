// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the [`JsonRpcWallet`], using a scripted client.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use assert_matches::assert_matches;
use async_trait::async_trait;
use counter_core::{
    contract::{encode_counter, CounterMethod},
    data_types::Bytes,
    Address, CounterSession, ProviderError, SessionConfig, SessionError, TransactionHash,
    WalletProvider,
};
use serde_json::{json, Value};

use super::{JsonRpcWallet, JsonRpcWalletConfig};
use crate::client::{JsonRpcClient, JsonRpcError};

/// A [`JsonRpcClient`] answering with prepared responses and recording the requests.
#[derive(Default)]
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Value, ProviderError>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedClient {
    fn with_responses(responses: impl IntoIterator<Item = Result<Value, ProviderError>>) -> Self {
        ScriptedClient {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    fn requests(&self) -> Vec<(String, Value)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl JsonRpcClient for ScriptedClient {
    async fn request_value(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((method.to_owned(), params));
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected request for {method}"))
    }
}

fn contract_address() -> Address {
    Address::new([0xcc; 20])
}

fn sender() -> Address {
    Address::new([0x11; 20])
}

fn transaction_hash() -> TransactionHash {
    TransactionHash::new([0xee; 32])
}

fn receipt_json(status: &str) -> Value {
    json!({
        "transactionHash": transaction_hash(),
        "blockNumber": "0x1a",
        "status": status,
    })
}

/// Test that accounts are requested with `eth_requestAccounts`.
#[test_log::test(tokio::test)]
async fn requests_accounts() -> Result<(), ProviderError> {
    let wallet = JsonRpcWallet::new(ScriptedClient::with_responses([Ok(json!([
        "0x1111111111111111111111111111111111111111",
        "0x2222222222222222222222222222222222222222"
    ]))]));

    let accounts = wallet.request_accounts().await?;

    assert_eq!(accounts, vec![sender(), Address::new([0x22; 20])]);
    assert_eq!(
        wallet.client().requests(),
        vec![("eth_requestAccounts".to_owned(), json!([]))]
    );

    Ok(())
}

/// Test the shape of `eth_call` and the decoding of its result.
#[test_log::test(tokio::test)]
async fn calls_contract() -> Result<(), ProviderError> {
    let wallet = JsonRpcWallet::new(ScriptedClient::with_responses([Ok(json!(Bytes::from(
        encode_counter(3)
    )))]));

    let output = wallet.call(contract_address(), vec![0x8a, 0xda, 0x06, 0x6e]).await?;

    assert_eq!(output, encode_counter(3));
    assert_eq!(
        wallet.client().requests(),
        vec![(
            "eth_call".to_owned(),
            json!([
                {
                    "to": "0xcccccccccccccccccccccccccccccccccccccccc",
                    "data": "0x8ada066e",
                },
                "latest"
            ])
        )]
    );

    Ok(())
}

/// Test that a transaction is submitted and its receipt polled until it appears.
#[test_log::test(tokio::test(start_paused = true))]
async fn sends_and_polls_for_receipt() -> Result<(), ProviderError> {
    let wallet = JsonRpcWallet::with_config(
        ScriptedClient::with_responses([
            Ok(json!(transaction_hash())),
            Ok(Value::Null),
            Ok(Value::Null),
            Ok(receipt_json("0x1")),
        ]),
        JsonRpcWalletConfig {
            poll_interval: Duration::from_millis(500),
        },
    );

    let receipt = wallet
        .send_transaction(sender(), contract_address(), CounterMethod::Reset.calldata())
        .await?;

    assert_eq!(receipt.transaction_hash, transaction_hash());
    assert_eq!(receipt.block_number, Some(26));

    let requests = wallet.client().requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(
        requests[0],
        (
            "eth_sendTransaction".to_owned(),
            json!([{
                "from": "0x1111111111111111111111111111111111111111",
                "to": "0xcccccccccccccccccccccccccccccccccccccccc",
                "data": "0xd826f88f",
            }])
        )
    );
    for request in &requests[1..] {
        assert_eq!(
            request,
            &(
                "eth_getTransactionReceipt".to_owned(),
                json!([transaction_hash()])
            )
        );
    }

    Ok(())
}

/// Test that a receipt with a failed status is reported as a revert.
#[test_log::test(tokio::test)]
async fn reverted_receipt_is_an_error() {
    let wallet = JsonRpcWallet::new(ScriptedClient::with_responses([
        Ok(json!(transaction_hash())),
        Ok(receipt_json("0x0")),
    ]));

    let result = wallet
        .send_transaction(sender(), contract_address(), CounterMethod::Decrement.calldata())
        .await;

    assert_eq!(result, Err(ProviderError::Reverted(transaction_hash())));
}

/// Test that JSON-RPC error objects map onto provider errors.
#[test]
fn error_codes_are_mapped() {
    let rejected = JsonRpcError {
        code: 4001,
        message: "User rejected the request.".to_owned(),
    };
    let internal = JsonRpcError {
        code: -32000,
        message: "insufficient funds".to_owned(),
    };

    assert_matches!(
        ProviderError::from(rejected),
        ProviderError::Rejected { code: 4001, .. }
    );
    assert_matches!(
        ProviderError::from(internal),
        ProviderError::Rpc { code: -32000, .. }
    );
}

/// Test that malformed results are reported instead of being misread.
#[test_log::test(tokio::test)]
async fn malformed_results_are_rejected() {
    let wallet = JsonRpcWallet::new(ScriptedClient::with_responses([
        Ok(json!(["not an address"])),
        Ok(json!("0xzz")),
        Ok(json!(transaction_hash())),
        Ok(receipt_json("0xzz")),
    ]));

    assert_matches!(
        wallet.request_accounts().await,
        Err(ProviderError::InvalidResponse(_))
    );
    assert_matches!(
        wallet.call(contract_address(), vec![]).await,
        Err(ProviderError::InvalidResponse(_))
    );
    assert_matches!(
        wallet
            .send_transaction(sender(), contract_address(), vec![])
            .await,
        Err(ProviderError::InvalidResponse(_))
    );
}

/// Test a whole session running on top of the JSON-RPC wallet, with the user rejecting
/// account access.
#[test_log::test(tokio::test)]
async fn session_denied_through_json_rpc() {
    let wallet = JsonRpcWallet::new(ScriptedClient::with_responses([Err(
        JsonRpcError {
            code: 4001,
            message: "User rejected the request.".to_owned(),
        }
        .into(),
    )]));
    let session = CounterSession::new(Some(wallet), SessionConfig::default());

    assert_matches!(
        session.connect().await,
        Err(SessionError::AuthorizationDenied(message)) if message == "User rejected the request."
    );
    assert!(!session.is_connected());
}

/// Test a whole session running on top of the JSON-RPC wallet.
#[test_log::test(tokio::test(start_paused = true))]
async fn session_over_json_rpc() -> Result<(), SessionError> {
    let wallet = JsonRpcWallet::new(ScriptedClient::with_responses([
        Ok(json!(["0x1111111111111111111111111111111111111111"])),
        Ok(json!(Bytes::from(encode_counter(7)))),
        Ok(json!(transaction_hash())),
        Ok(receipt_json("0x1")),
        Ok(json!(Bytes::from(encode_counter(8)))),
    ]));
    let session = CounterSession::new(
        Some(wallet),
        SessionConfig::default().with_contract_address(contract_address()),
    );

    assert_eq!(session.connect().await?, sender());
    assert_eq!(session.counter(), Some(7));

    session.increment().await?;
    assert_eq!(session.counter(), Some(8));

    Ok(())
}
