//! Byte vectors for every registered type, driven through the type registry.

use eosio_abi::{AbiEncode, AbiType, AbiValue, CodecError};
use serde_json::{json, Value};

fn encode(type_name: &str, value: Value) -> String {
    let ty = AbiType::from_name(type_name).unwrap();
    let abi_value = ty.value_from_json(&value).unwrap();
    hex::encode(abi_value.to_bytes())
}

fn check(type_name: &str, value: Value, expected: &str) {
    assert_eq!(encode(type_name, value.clone()), expected, "{} {}", type_name, value);
    let ty = AbiType::from_name(type_name).unwrap();
    let decoded = ty.from_bytes(&hex::decode(expected).unwrap()).unwrap();
    assert_eq!(hex::encode(decoded.to_bytes()), expected);
}

// ===== Integers =====

#[test]
fn test_bool_vectors() {
    check("bool", json!(true), "01");
    check("bool", json!(false), "00");
}

#[test]
fn test_int8_vectors() {
    check("int8", json!(-128), "80");
    check("int8", json!(-1), "ff");
    check("int8", json!(0), "00");
    check("int8", json!(127), "7f");
}

#[test]
fn test_unsigned_vectors() {
    check("uint8", json!(255), "ff");
    check("uint16", json!(0), "0000");
    check("uint16", json!(1), "0100");
    check("uint16", json!(65535), "ffff");
    check("uint32", json!(10800), "302a0000");
    check("uint32", json!(123456), "40e20100");
    check("uint64", json!(u64::MAX), "ffffffffffffffff");
}

#[test]
fn test_varuint32_vectors() {
    check("varuint32", json!(0), "00");
    check("varuint32", json!(255), "ff01");
    check("varuint32", json!(256), "8002");
    check("varuint32", json!(4294967295u64), "ffffffff0f");
    check("varuint32", json!(4294967296u64), "8080808010");
    check("varuint32", json!(20989371979u64), "cbccc1984e");
}

#[test]
fn test_out_of_range_names_the_type() {
    let err = AbiType::Uint16.value_from_json(&json!(65536)).unwrap_err();
    assert!(err.to_string().contains("uint16"));
    assert!(err.to_string().contains("[0, 65536)"));

    let err = AbiType::Varuint32.value_from_json(&json!(20989371980u64)).unwrap_err();
    assert!(matches!(err, CodecError::OutOfRange { type_name: "varuint32", .. }));
}

// ===== Domain types =====

#[test]
fn test_name_vectors() {
    check("name", json!("a"), "0000000000000030");
    check("name", json!("b"), "0000000000000038");
    check("name", json!("zzzzzzzzzzzzj"), "ffffffffffffffff");
    check("name", json!("kacjndfvdfa"), "00cc4a7ba5f99081");
    check("name", json!("user2"), "00000000007115d6");
    check("name", json!(""), "0000000000000000");
    assert_eq!(encode("name", json!("a.")), "0000000000000030");
}

#[test]
fn test_string_vectors() {
    check("string", json!("a"), "0161");
    check("string", json!(""), "00");
    check("string", json!("kcjansdcd"), "096b636a616e73646364");
}

#[test]
fn test_timestamp_vectors() {
    check("unixtimestamp", json!("1970-01-01T00:00:00Z"), "00000000");
    check("unixtimestamp", json!("2040-12-31T23:59:00Z"), "44038d85");
    assert_eq!(
        encode("unixtimestamp", json!("2021-08-26T14:01:47.184549Z")),
        "cb9e2761"
    );
}

#[test]
fn test_symbol_vectors() {
    check("symbol", json!("0,W"), "0057000000000000");
    check("symbol", json!("0,WAXXXXX"), "0057415858585858");
    check("symbol", json!("1,WAX"), "0157415800000000");
    check("symbol", json!("16,WAX"), "1057415800000000");
}

#[test]
fn test_asset_vectors() {
    check("asset", json!("99.9 WAX"), "e7030000000000000157415800000000");
    check("asset", json!("99 WAX"), "63000000000000000057415800000000");
}

#[test]
fn test_array_vectors() {
    check("uint8[]", json!([]), "00");
    check("uint16[]", json!([1, 2]), "0201000200");
    check("name[]", json!(["a", "b"]), "0200000000000000300000000000000038");
    check("bytes", json!("deadbeef"), "deadbeef");
}

#[test]
fn test_registry_roundtrip_through_json() {
    let cases = [
        ("bool", json!(true)),
        ("uint32", json!(42)),
        ("name", json!("eosio.token")),
        ("asset", json!("1.0000 WAX")),
        ("string[]", json!(["hello", "world"])),
        ("unixtimestamp", json!("2021-08-30T13:03:31Z")),
    ];
    for (type_name, value) in cases {
        let ty = AbiType::from_name(type_name).unwrap();
        let abi_value: AbiValue = ty.value_from_json(&value).unwrap();
        assert_eq!(abi_value.to_json(), value, "{}", type_name);
    }
}
