// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use assert_matches::assert_matches;
use test_case::test_case;

use super::{
    decode_counter, encode_counter, get_counter_calldata, CounterContract, CounterMethod,
    GET_COUNTER_SELECTOR, GET_COUNTER_SIGNATURE,
};
use crate::{data_types::U256, provider::ProviderError, test_utils::FakeWallet, Address};

/// Test that selectors match the Solidity ABI of the counter contract.
#[test_case(CounterMethod::Increment, "increment()", [0xd0, 0x9d, 0xe0, 0x8a]; "increment")]
#[test_case(CounterMethod::Decrement, "decrement()", [0x2b, 0xae, 0xce, 0xb7]; "decrement")]
#[test_case(CounterMethod::Reset, "reset()", [0xd8, 0x26, 0xf8, 0x8f]; "reset")]
fn known_selectors(method: CounterMethod, signature: &str, selector: [u8; 4]) {
    assert_eq!(method.signature(), signature);
    assert_eq!(method.selector(), selector);
    assert_eq!(method.calldata(), selector.to_vec());
}

/// Test the calldata of the view method.
#[test]
fn get_counter_selector() {
    assert_eq!(GET_COUNTER_SIGNATURE, "getCounter()");
    assert_eq!(GET_COUNTER_SELECTOR, [0x8a, 0xda, 0x06, 0x6e]);
    assert_eq!(get_counter_calldata(), GET_COUNTER_SELECTOR.to_vec());
}

/// Test that each method is recovered from its own calldata only.
#[test]
fn methods_are_recovered_from_calldata() {
    for method in CounterMethod::ALL {
        assert_eq!(
            CounterMethod::from_calldata(&method.calldata()),
            Some(method)
        );
    }
    assert_eq!(CounterMethod::from_calldata(&get_counter_calldata()), None);
    assert_eq!(CounterMethod::from_calldata(&[0xd0, 0x9d, 0xe0]), None);
}

/// Test decoding of the returned word.
#[test]
fn counter_word_decoding() {
    assert_eq!(encode_counter(7).len(), 32);
    assert_eq!(encode_counter(7)[31], 7);
    assert_eq!(decode_counter(&encode_counter(0)), Ok(0));
    assert_eq!(decode_counter(&encode_counter(u64::MAX)), Ok(u64::MAX));
}

/// Test that malformed return data is reported instead of being truncated.
#[test]
fn invalid_counter_words_are_rejected() {
    assert_matches!(
        decode_counter(&[0; 31]),
        Err(ProviderError::InvalidResponse(_))
    );

    let huge = (U256::from(u64::MAX) + U256::from(1)).to_be_bytes::<32>();
    assert_matches!(
        decode_counter(&huge),
        Err(ProviderError::InvalidResponse(_))
    );
}

/// Test reading and updating the counter through the binding.
#[test_log::test(tokio::test)]
async fn binding_reads_and_sends() -> Result<(), ProviderError> {
    let wallet = FakeWallet::new(41);
    let contract = CounterContract::new(Address::new([7; 20]), Arc::new(wallet.clone()));

    assert_eq!(contract.get_counter().await?, 41);

    let receipt = contract
        .send(CounterMethod::Increment, FakeWallet::default_account())
        .await?;
    assert_eq!(receipt.block_number, Some(1));
    assert_eq!(contract.get_counter().await?, 42);
    assert_eq!(
        wallet.sent_methods(),
        vec![(FakeWallet::default_account(), CounterMethod::Increment)]
    );

    Ok(())
}
