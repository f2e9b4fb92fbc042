//! Transaction pipeline tests against a known-good chain fixture

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use eosio_abi::{AbiEncode, AbiString, Name};
use eosio_crypto::PrivateKey;
use eosio_primitives::{ChainId, Checksum256};
use eosio_sdk::{
    Action, Authorization, ChainInfo, Data, MockNet, Net, SdkError, Transaction, MOCK_CHAIN_ID,
    MOCK_LIB_ID,
};
use serde_json::json;

const WIF: &str = "5K5UHY2LjHw2QQFJKCd2PdF7hxPJnknMfQLhxbEguJJttr1DFdp";
const PACKED: &str = "23d72c614f5c456a2daf000000000100000000007115d6000000806199a6c20100000000007115d600000000a8ed32320e00000000007115d60568656c6c6f00";
const TX_ID: &str = "1a634bb62717cb1a94f5312c7d369b95fe7ea3f1f955a8c1907a74cf0d4153d6";
const SIGNATURE: &str = "SIG_K1_HMzTApq6UiSA7Ldr6mCKqPKQkrsmUknHiZi4HZt7HMz3ktHHMv4MuRTEUx9Za8VbB6NzcUFh35EBj4Y9wtVjw9qL3t4xYX";

// ===== Helpers =====

fn sendmsg() -> Action {
    Action::new(
        "user2",
        "sendmsg",
        vec![Authorization::new("user2", "active").unwrap()],
        vec![
            Data::new("from", Name::new("user2").unwrap()),
            Data::new("message", AbiString::new("hello").unwrap()),
        ],
    )
    .unwrap()
}

fn chain_info() -> ChainInfo {
    ChainInfo::new(
        ChainId::from_hex(MOCK_CHAIN_ID).unwrap(),
        Checksum256::from_hex(MOCK_LIB_ID).unwrap(),
    )
}

/// Link time that expires at 2021-08-30T13:03:31Z with the default delay
fn link_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 8, 30, 12, 53, 31).unwrap()
}

fn net() -> Arc<dyn Net> {
    Arc::new(MockNet::new())
}

fn key() -> PrivateKey {
    PrivateKey::from_wif(WIF).unwrap()
}

// ===== Serialization =====

#[test]
fn test_fixture_serialization() {
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), link_time())
        .unwrap();

    assert_eq!(linked.ref_block_num(), 23631);
    assert_eq!(linked.ref_block_prefix(), 2938989125);
    assert_eq!(linked.expiration().to_string(), "2021-08-30T13:03:31Z");
    assert_eq!(linked.pack(), PACKED);
    assert_eq!(linked.id().to_hex(), TX_ID);
}

#[test]
fn test_expiration_truncates_subseconds() {
    let now = link_time() + chrono::Duration::milliseconds(999);
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), now)
        .unwrap();
    assert_eq!(linked.pack(), PACKED);
}

#[test]
fn test_builder_fields_reach_the_wire() {
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .expiration_delay_sec(0)
        .delay_sec(300)
        .max_cpu_usage_ms(5)
        .max_net_usage_words(200)
        .link_with(net(), &chain_info(), link_time())
        .unwrap();

    let bytes = linked.to_bytes();
    // expiration(4) ref_block_num(2) ref_block_prefix(4)
    assert_eq!(&bytes[..4], &link_time().timestamp().to_le_bytes()[..4]);
    // varuint32(200) = c8 01, cpu 05, varuint32(300) = ac 02
    assert_eq!(&bytes[10..15], &[0xc8, 0x01, 0x05, 0xac, 0x02]);
    assert_eq!(bytes.len(), PACKED.len() / 2 + 2);
    assert_ne!(linked.id().to_hex(), TX_ID);
}

#[test]
fn test_expiration_out_of_range() {
    let far = Utc.with_ymd_and_hms(2106, 2, 7, 6, 28, 0).unwrap();
    let result = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), far);
    assert!(matches!(result, Err(SdkError::Codec(_))));
}

// ===== Limits =====

#[test]
fn test_action_count_limits() {
    assert!(matches!(
        Transaction::new(vec![]),
        Err(SdkError::Validation(_))
    ));
    assert!(Transaction::new(vec![sendmsg(); 10]).is_ok());
    assert!(matches!(
        Transaction::new(vec![sendmsg(); 11]),
        Err(SdkError::Validation(_))
    ));
}

#[test]
fn test_signature_count_limit() {
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), link_time())
        .unwrap();
    let key = key();

    let mut signed = linked.sign(&key).unwrap();
    for _ in 1..10 {
        signed = signed.sign(&key).unwrap();
    }
    assert_eq!(signed.signatures().len(), 10);
    assert!(matches!(signed.sign(&key), Err(SdkError::Validation(_))));
}

// ===== Signing =====

#[test]
fn test_fixture_signature() {
    let signed = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), link_time())
        .unwrap()
        .sign(&key())
        .unwrap();

    assert_eq!(signed.signatures().len(), 1);
    assert_eq!(signed.signatures()[0].to_string(), SIGNATURE);
    assert_eq!(signed.id().to_hex(), TX_ID);
}

#[test]
fn test_signature_recovers_signer() {
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), link_time())
        .unwrap();
    let signed = linked.sign(&key()).unwrap();

    let recovered = signed.signatures()[0]
        .recover(&linked.signing_digest())
        .unwrap();
    assert_eq!(recovered, key().public_key());
}

#[test]
fn test_signing_is_append_only() {
    let other = PrivateKey::from_wif("5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3").unwrap();
    let once = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), link_time())
        .unwrap()
        .sign(&key())
        .unwrap();
    let twice = once.sign(&other).unwrap();

    assert_eq!(once.signatures().len(), 1);
    assert_eq!(twice.signatures().len(), 2);
    assert_eq!(twice.signatures()[0], once.signatures()[0]);
    assert_eq!(twice.pack(), once.pack());
    assert_ne!(once, twice);
}

#[test]
fn test_signing_twice_with_same_key() {
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &chain_info(), link_time())
        .unwrap();
    let key = key();
    let signed = linked.sign(&key).unwrap().sign(&key).unwrap();

    assert_eq!(signed.signatures().len(), 2);
    let digest = linked.signing_digest();
    for signature in signed.signatures() {
        assert!(signature.is_canonical());
        assert!(signature.verify(&digest, &key.public_key()).unwrap());
    }
}

#[test]
fn test_chain_id_changes_signature_not_id() {
    let mut info = chain_info();
    info.chain_id = ChainId::from_bytes([0x11; 32]);
    let signed = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(net(), &info, link_time())
        .unwrap()
        .sign(&key())
        .unwrap();

    assert_eq!(signed.id().to_hex(), TX_ID);
    assert_ne!(signed.signatures()[0].to_string(), SIGNATURE);
}

// ===== Network =====

#[tokio::test]
async fn test_link_queries_chain_state() {
    let mock = Arc::new(MockNet::new());
    let linked = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link(mock.clone())
        .await
        .unwrap();

    assert_eq!(linked.chain_id().to_hex(), MOCK_CHAIN_ID);
    assert_eq!(linked.ref_block_num(), 23631);
    let now = Utc::now().timestamp();
    let expiration = i64::from(linked.expiration().secs());
    assert!((expiration - now - 600).abs() <= 2);
    assert_eq!(mock.requests()[0].0, "get_info");
}

#[tokio::test]
async fn test_link_fails_without_chain_state() {
    let mock = Arc::new(MockNet::new());
    mock.set_response("get_info", json!({ "server_version": "x" }));
    let result = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link(mock)
        .await;
    assert!(matches!(result, Err(SdkError::Serialization(_))));
}

#[tokio::test]
async fn test_send_pushes_packed_transaction() {
    let mock = Arc::new(MockNet::new());
    mock.set_response("push_transaction", json!({ "transaction_id": TX_ID }));

    let signed = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(mock.clone(), &chain_info(), link_time())
        .unwrap()
        .sign(&key())
        .unwrap();
    let reply = signed.send().await.unwrap();
    assert_eq!(reply, json!({ "transaction_id": TX_ID }));

    let requests = mock.requests();
    let (endpoint, payload) = requests.last().unwrap();
    assert_eq!(endpoint, "push_transaction");
    assert_eq!(
        payload,
        &json!({
            "signatures": [SIGNATURE],
            "compression": false,
            "packed_context_free_data": "",
            "packed_trx": PACKED,
        })
    );
}

#[tokio::test]
async fn test_send_returns_node_errors_unchanged() {
    let mock = Arc::new(MockNet::new());
    let failure = json!({
        "code": 500,
        "message": "Internal Service Error",
        "error": { "code": 3040005, "name": "expired_tx_exception" }
    });
    mock.set_response("push_transaction", failure.clone());

    let signed = Transaction::new(vec![sendmsg()])
        .unwrap()
        .link_with(mock, &chain_info(), link_time())
        .unwrap()
        .sign(&key())
        .unwrap();
    assert_eq!(signed.send().await.unwrap(), failure);
}
