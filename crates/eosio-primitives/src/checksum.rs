//! 256-bit checksum type (chain ids, block ids, transaction ids, digests)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when an id from a node response or user input is malformed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChecksumError {
    /// Not hex, or an odd number of digits
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Decoded to something other than 32 bytes
    #[error("invalid checksum length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Always 32
        expected: usize,
        /// Decoded length
        got: usize,
    },
}

/// 256-bit checksum (32 bytes)
///
/// The chain prints these as bare lowercase hex without a `0x` prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Checksum256([u8; 32]);

/// Chain id as reported by `get_info`
pub type ChainId = Checksum256;

/// Block id; the first four bytes carry the block number (big-endian)
pub type BlockId = Checksum256;

/// Transaction id (SHA-256 of the packed transaction)
pub type TransactionId = Checksum256;

impl Checksum256 {
    /// Width of every id and SHA-256 digest on the chain
    pub const LEN: usize = 32;

    /// Placeholder id; never a real chain, block or transaction id
    pub const ZERO: Checksum256 = Checksum256([0u8; 32]);

    /// Wrap a raw digest, e.g. the output of SHA-256
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Checksum256(bytes)
    }

    /// Wrap a digest held in a slice; it must be exactly 32 bytes
    pub fn from_slice(slice: &[u8]) -> Result<Self, ChecksumError> {
        if slice.len() != Self::LEN {
            return Err(ChecksumError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Checksum256(bytes))
    }

    /// Parse the 64-digit hex form used in node JSON (`chain_id`,
    /// `last_irreversible_block_id`, `transaction_id`)
    ///
    /// A `0x` prefix is tolerated; node APIs never emit one.
    pub fn from_hex(s: &str) -> Result<Self, ChecksumError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| ChecksumError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Raw bytes, in the order they are hashed and signed
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// True for [`Checksum256::ZERO`]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase hex, no prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Block number embedded in a block id (first four bytes, big-endian)
    ///
    /// Only meaningful for block ids; TAPOS takes its low 16 bits.
    pub fn block_num(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Debug for Checksum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum256({})", self.to_hex())
    }
}

impl fmt::Display for Checksum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Checksum256 {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Checksum256 {
    fn from(bytes: [u8; 32]) -> Self {
        Checksum256(bytes)
    }
}

impl AsRef<[u8]> for Checksum256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// node JSON carries ids as bare hex strings
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Checksum256 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Checksum256 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Checksum256::from_hex(&s).map_err(de::Error::custom)
        }
    }
}
