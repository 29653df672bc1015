// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::address;
use test_case::test_case;

use super::{Address, Bytes, TransactionHash};

/// Test that addresses are parsed regardless of case.
#[test_case("0xF650EDcA5D3Cb7649AF37bd49b87B79253f96e76"; "with mixed case")]
#[test_case("0xf650edca5d3cb7649af37bd49b87b79253f96e76"; "in lowercase")]
#[test_case("f650edca5d3cb7649af37bd49b87b79253f96e76"; "without prefix")]
fn address_parsing(input: &str) {
    let address: Address = input.parse().expect("Address should be valid");

    assert_eq!(address, address!("f650edca5d3cb7649af37bd49b87b79253f96e76"));
    assert_eq!(address[0], 0xf6);
    assert_eq!(address[19], 0x76);
    assert_eq!(
        address.to_string().to_lowercase(),
        "0xf650edca5d3cb7649af37bd49b87b79253f96e76"
    );
}

/// Test that inputs with the wrong size or invalid digits are rejected.
#[test_case("0x1234"; "too short")]
#[test_case("0x11111111111111111111111111111111111111111111"; "too long")]
#[test_case("0xzz11111111111111111111111111111111111111"; "with invalid digits")]
fn invalid_addresses_are_rejected(input: &str) {
    assert!(input.parse::<Address>().is_err());
}

/// Test that transaction hashes must have 32 bytes.
#[test]
fn transaction_hash_length() {
    assert!("0x1234".parse::<TransactionHash>().is_err());
    assert_eq!(
        format!("0x{}", "ee".repeat(32))
            .parse::<TransactionHash>()
            .ok(),
        Some(TransactionHash::repeat_byte(0xee))
    );
}

/// Test that addresses and call data are serialized as JSON hexadecimal strings.
#[test]
fn values_serialize_as_hex_strings() {
    let address = Address::repeat_byte(0xab);

    let json = serde_json::to_value(address).expect("Serialization should not fail");
    assert_eq!(
        json.as_str().map(str::to_lowercase),
        Some(format!("0x{}", "ab".repeat(20)))
    );
    let parsed: Address = serde_json::from_value(json).expect("Deserialization should not fail");
    assert_eq!(parsed, address);

    let data = Bytes::from(vec![0x8a, 0xda, 0x06, 0x6e]);
    assert_eq!(
        serde_json::to_value(&data).expect("Serialization should not fail"),
        serde_json::json!("0x8ada066e")
    );
    let empty: Bytes =
        serde_json::from_value(serde_json::json!("0x")).expect("Deserialization should not fail");
    assert!(empty.is_empty());
}
