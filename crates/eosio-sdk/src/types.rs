//! Node payload types

use eosio_primitives::{BlockId, ChainId};
use serde::{Deserialize, Serialize};

/// Subset of `get_info` used to link transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Chain id signed into every transaction
    pub chain_id: ChainId,
    /// TAPOS reference block
    pub last_irreversible_block_id: BlockId,
    /// Node software version
    #[serde(default)]
    pub server_version: String,
    /// Current head block number
    #[serde(default)]
    pub head_block_num: u32,
    /// Last irreversible block number
    #[serde(default)]
    pub last_irreversible_block_num: u32,
    /// Current head block id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_block_id: Option<BlockId>,
    /// Head block timestamp as reported by the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_block_time: Option<String>,
}

impl ChainInfo {
    /// Minimal chain state, as needed for linking
    pub fn new(chain_id: ChainId, last_irreversible_block_id: BlockId) -> Self {
        Self {
            chain_id,
            last_irreversible_block_id,
            server_version: String::new(),
            head_block_num: 0,
            last_irreversible_block_num: 0,
            head_block_id: None,
            head_block_time: None,
        }
    }

    /// TAPOS fields derived from the last irreversible block
    pub fn tapos(&self) -> TaposRef {
        TaposRef::from_block_id(&self.last_irreversible_block_id)
    }
}

/// Block reference embedded in a transaction header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaposRef {
    /// Low 16 bits of the block number
    pub ref_block_num: u16,
    /// Bytes 8..12 of the block id, little-endian
    pub ref_block_prefix: u32,
}

impl TaposRef {
    /// Derive from a block id
    pub fn from_block_id(block_id: &BlockId) -> Self {
        let bytes = block_id.as_bytes();
        Self {
            ref_block_num: u16::from_be_bytes([bytes[2], bytes[3]]),
            ref_block_prefix: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        }
    }
}

/// Body of `push_transaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTransactionRequest {
    /// `SIG_K1_…` signatures in signing order
    pub signatures: Vec<String>,
    /// Always false; packed_trx is sent uncompressed
    pub compression: bool,
    /// Always empty
    pub packed_context_free_data: String,
    /// Lowercase hex of the serialized transaction
    pub packed_trx: String,
}

/// Error payload returned by nodes on failed calls
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl NodeError {
    /// Recognize `{"code": .., "message": .., "error": {..}}`
    pub(crate) fn from_value(value: &serde_json::Value) -> Option<Self> {
        if value.get("error").is_none() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub(crate) fn describe(&self) -> String {
        let what = self
            .error
            .as_ref()
            .and_then(|e| e.get("what"))
            .and_then(|w| w.as_str());
        match what {
            Some(what) => format!("{}: {}", self.message, what),
            None => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tapos_from_block_id() {
        let id = BlockId::from_hex(
            "00c35c4f7b3a1e90456a2daf3c1f7e8d9a0b4c5d6e7f8091a2b3c4d5e6f70819",
        )
        .unwrap();
        let tapos = TaposRef::from_block_id(&id);
        assert_eq!(tapos.ref_block_num, 23631);
        assert_eq!(tapos.ref_block_prefix, 2938989125);
    }

    #[test]
    fn test_tapos_wraps_block_num() {
        // block 0x0001ffff + 1 = 0x00020000 -> low 16 bits are zero
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&0x0002_0000u32.to_be_bytes());
        let tapos = TaposRef::from_block_id(&BlockId::from_bytes(bytes));
        assert_eq!(tapos.ref_block_num, 0);
        assert_eq!(tapos.ref_block_prefix, 0);
    }

    #[test]
    fn test_chain_info_deserialize() {
        let info: ChainInfo = serde_json::from_value(json!({
            "server_version": "d1bc8d3",
            "chain_id": "8a34ec7df1b8cd06ff4a8abbaa7cc50300823350cadc59ab296cb00d104d2b8f",
            "head_block_num": 12803200,
            "last_irreversible_block_num": 12803151,
            "last_irreversible_block_id": "00c35c4f7b3a1e90456a2daf3c1f7e8d9a0b4c5d6e7f8091a2b3c4d5e6f70819",
            "head_block_time": "2021-08-30T12:53:31.000",
            "virtual_block_cpu_limit": 200000000
        }))
        .unwrap();
        assert_eq!(info.head_block_num, 12803200);
        assert_eq!(info.last_irreversible_block_id.block_num(), 12803151);
        assert_eq!(info.tapos().ref_block_num, 23631);
    }

    #[test]
    fn test_chain_info_missing_chain_id() {
        let result: Result<ChainInfo, _> = serde_json::from_value(json!({
            "last_irreversible_block_id": "00"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_push_request_serialize() {
        let request = PushTransactionRequest {
            signatures: vec!["SIG_K1_x".into()],
            compression: false,
            packed_context_free_data: String::new(),
            packed_trx: "abcd".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "signatures": ["SIG_K1_x"],
                "compression": false,
                "packed_context_free_data": "",
                "packed_trx": "abcd"
            })
        );
    }

    #[test]
    fn test_node_error_detection() {
        let payload = json!({
            "code": 500,
            "message": "Internal Service Error",
            "error": {"code": 3050003, "name": "eosio_assert_message_exception", "what": "eosio_assert_message assertion failure"}
        });
        let error = NodeError::from_value(&payload).unwrap();
        assert_eq!(error.code, 500);
        assert!(error.describe().contains("assertion failure"));
        assert!(NodeError::from_value(&json!({"rows": []})).is_none());
    }
}
