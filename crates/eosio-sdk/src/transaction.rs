//! Transaction lifecycle: build, link, sign, send

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use eosio_abi::{AbiEncode, UnixTimestamp, Varuint32};
use eosio_crypto::{sha256, sign_digest, PrivateKey, Signature};
use eosio_primitives::{ChainId, Checksum256, TransactionId};
use serde_json::Value;
use tracing::debug;

use crate::action::{Action, LinkedAction};
use crate::net::Net;
use crate::types::{ChainInfo, PushTransactionRequest};
use crate::SdkError;

/// Maximum actions per transaction
pub const MAX_ACTIONS: usize = 10;
/// Maximum signatures per transaction
pub const MAX_SIGNATURES: usize = 10;
/// Seconds from linking until a transaction expires, unless overridden
pub const DEFAULT_EXPIRATION_DELAY_SEC: u32 = 600;

/// Unlinked transaction with a fluent builder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    actions: Vec<Action>,
    expiration_delay_sec: u32,
    delay_sec: u32,
    max_cpu_usage_ms: u8,
    max_net_usage_words: u32,
}

impl Transaction {
    /// Create a transaction with 1 to 10 actions
    pub fn new(actions: Vec<Action>) -> Result<Self, SdkError> {
        if actions.is_empty() || actions.len() > MAX_ACTIONS {
            return Err(SdkError::Validation(format!(
                "transaction needs 1 to {} actions, got {}",
                MAX_ACTIONS,
                actions.len()
            )));
        }
        Ok(Self {
            actions,
            expiration_delay_sec: DEFAULT_EXPIRATION_DELAY_SEC,
            delay_sec: 0,
            max_cpu_usage_ms: 0,
            max_net_usage_words: 0,
        })
    }

    /// Set the expiration delay counted from link time
    pub fn expiration_delay_sec(mut self, secs: u32) -> Self {
        self.expiration_delay_sec = secs;
        self
    }

    /// Set the execution delay
    pub fn delay_sec(mut self, secs: u32) -> Self {
        self.delay_sec = secs;
        self
    }

    /// Set the CPU limit (0 = no limit beyond the account's)
    pub fn max_cpu_usage_ms(mut self, ms: u8) -> Self {
        self.max_cpu_usage_ms = ms;
        self
    }

    /// Set the NET limit in 8-byte words
    pub fn max_net_usage_words(mut self, words: u32) -> Self {
        self.max_net_usage_words = words;
        self
    }

    /// Actions in order
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Query chain state from `net` and bind to it
    pub async fn link(self, net: Arc<dyn Net>) -> Result<LinkedTransaction, SdkError> {
        let info = net.get_info().await?;
        self.link_with(net, &info, Utc::now())
    }

    /// Bind using known chain state and clock
    pub fn link_with(
        self,
        net: Arc<dyn Net>,
        info: &ChainInfo,
        now: DateTime<Utc>,
    ) -> Result<LinkedTransaction, SdkError> {
        let expiration = now
            .checked_add_signed(Duration::seconds(i64::from(self.expiration_delay_sec)))
            .ok_or_else(|| SdkError::Validation("expiration overflows".into()))?;
        let expiration = UnixTimestamp::from_datetime(expiration)?;
        let tapos = info.tapos();

        debug!(
            chain_id = %info.chain_id,
            ref_block_num = tapos.ref_block_num,
            ref_block_prefix = tapos.ref_block_prefix,
            %expiration,
            "linked transaction"
        );

        let actions = self
            .actions
            .into_iter()
            .map(|action| action.link(Arc::clone(&net)))
            .collect();

        Ok(LinkedTransaction {
            chain_id: info.chain_id,
            ref_block_num: tapos.ref_block_num,
            ref_block_prefix: tapos.ref_block_prefix,
            expiration,
            actions,
            delay_sec: self.delay_sec,
            max_cpu_usage_ms: self.max_cpu_usage_ms,
            max_net_usage_words: self.max_net_usage_words,
            net,
        })
    }
}

/// Transaction bound to a chain, ready to serialize and sign
///
/// Equality and hashing ignore the network handle.
#[derive(Clone)]
pub struct LinkedTransaction {
    chain_id: ChainId,
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: UnixTimestamp,
    actions: Vec<LinkedAction>,
    delay_sec: u32,
    max_cpu_usage_ms: u8,
    max_net_usage_words: u32,
    net: Arc<dyn Net>,
}

impl LinkedTransaction {
    /// Chain the transaction is signed for
    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    /// TAPOS block number (low 16 bits)
    pub fn ref_block_num(&self) -> u16 {
        self.ref_block_num
    }

    /// TAPOS block prefix
    pub fn ref_block_prefix(&self) -> u32 {
        self.ref_block_prefix
    }

    /// Absolute expiration
    pub fn expiration(&self) -> UnixTimestamp {
        self.expiration
    }

    /// Execution delay
    pub fn delay_sec(&self) -> u32 {
        self.delay_sec
    }

    /// CPU limit
    pub fn max_cpu_usage_ms(&self) -> u8 {
        self.max_cpu_usage_ms
    }

    /// NET limit
    pub fn max_net_usage_words(&self) -> u32 {
        self.max_net_usage_words
    }

    /// Linked actions in order
    pub fn actions(&self) -> &[LinkedAction] {
        &self.actions
    }

    /// SHA-256 of the serialized transaction
    pub fn id(&self) -> TransactionId {
        sha256(&self.to_bytes())
    }

    /// Digest the signatures cover: `sha256(chain_id || trx || 0^32)`
    pub fn signing_digest(&self) -> Checksum256 {
        let mut payload = Vec::with_capacity(64 + self.encoded_len());
        payload.extend_from_slice(self.chain_id.as_bytes());
        self.encode(&mut payload);
        payload.extend_from_slice(&[0u8; 32]);
        sha256(&payload)
    }

    /// Lowercase hex of the serialized transaction
    pub fn pack(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Sign, producing a transaction with one signature
    pub fn sign(&self, key: &PrivateKey) -> Result<SignedTransaction, SdkError> {
        SignedTransaction {
            transaction: self.clone(),
            signatures: Vec::new(),
        }
        .sign(key)
    }
}

impl AbiEncode for LinkedTransaction {
    fn encode(&self, out: &mut Vec<u8>) {
        self.expiration.encode(out);
        self.ref_block_num.encode(out);
        self.ref_block_prefix.encode(out);
        Varuint32::from(self.max_net_usage_words).encode(out);
        self.max_cpu_usage_ms.encode(out);
        Varuint32::from(self.delay_sec).encode(out);
        // context-free actions
        Varuint32::from(0u32).encode(out);
        Varuint32::from(self.actions.len() as u32).encode(out);
        for action in &self.actions {
            action.encode(out);
        }
        // transaction extensions
        Varuint32::from(0u32).encode(out);
    }
}

impl fmt::Debug for LinkedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedTransaction")
            .field("chain_id", &self.chain_id)
            .field("ref_block_num", &self.ref_block_num)
            .field("ref_block_prefix", &self.ref_block_prefix)
            .field("expiration", &self.expiration)
            .field("actions", &self.actions)
            .field("delay_sec", &self.delay_sec)
            .field("max_cpu_usage_ms", &self.max_cpu_usage_ms)
            .field("max_net_usage_words", &self.max_net_usage_words)
            .finish_non_exhaustive()
    }
}

impl PartialEq for LinkedTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id
            && self.ref_block_num == other.ref_block_num
            && self.ref_block_prefix == other.ref_block_prefix
            && self.expiration == other.expiration
            && self.actions == other.actions
            && self.delay_sec == other.delay_sec
            && self.max_cpu_usage_ms == other.max_cpu_usage_ms
            && self.max_net_usage_words == other.max_net_usage_words
    }
}

impl Eq for LinkedTransaction {}

impl Hash for LinkedTransaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.ref_block_num.hash(state);
        self.ref_block_prefix.hash(state);
        self.expiration.hash(state);
        self.actions.hash(state);
        self.delay_sec.hash(state);
        self.max_cpu_usage_ms.hash(state);
        self.max_net_usage_words.hash(state);
    }
}

/// Linked transaction carrying 1 to 10 signatures
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedTransaction {
    transaction: LinkedTransaction,
    signatures: Vec<Signature>,
}

impl SignedTransaction {
    /// Add a signature, returning the extended transaction
    pub fn sign(&self, key: &PrivateKey) -> Result<SignedTransaction, SdkError> {
        if self.signatures.len() >= MAX_SIGNATURES {
            return Err(SdkError::Validation(format!(
                "transaction already carries {} signatures",
                MAX_SIGNATURES
            )));
        }
        let digest = self.transaction.signing_digest();
        let signature = sign_digest(&digest, key)?;
        debug!(
            id = %self.transaction.id(),
            signer = %key.public_key(),
            count = self.signatures.len() + 1,
            "signed transaction"
        );

        let mut signatures = self.signatures.clone();
        signatures.push(signature);
        Ok(SignedTransaction {
            transaction: self.transaction.clone(),
            signatures,
        })
    }

    /// Signatures in signing order
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// The transaction that was signed
    pub fn transaction(&self) -> &LinkedTransaction {
        &self.transaction
    }

    /// Transaction id; signatures do not affect it
    pub fn id(&self) -> TransactionId {
        self.transaction.id()
    }

    /// Lowercase hex of the serialized transaction
    pub fn pack(&self) -> String {
        self.transaction.pack()
    }

    /// Body for `push_transaction`
    pub fn push_request(&self) -> PushTransactionRequest {
        PushTransactionRequest {
            signatures: self.signatures.iter().map(ToString::to_string).collect(),
            compression: false,
            packed_context_free_data: String::new(),
            packed_trx: self.pack(),
        }
    }

    /// Submit through the linked network; the node's reply is returned unchanged
    pub async fn send(&self) -> Result<Value, SdkError> {
        debug!(id = %self.id(), "pushing transaction");
        self.transaction
            .net
            .push_transaction(&self.push_request())
            .await
    }
}

impl AbiEncode for SignedTransaction {
    fn encode(&self, out: &mut Vec<u8>) {
        self.transaction.encode(out);
    }
}
