//! SDK error types

use eosio_abi::CodecError;
use eosio_crypto::CryptoError;
use eosio_primitives::ChecksumError;
use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Node unreachable, timed out, or answered with an unexpected status
    #[error("connection error for {url}: {message}")]
    Connection {
        /// Requested URL
        url: String,
        /// HTTP status, if a response arrived
        status: Option<u16>,
        /// Error description
        message: String,
    },

    /// Error payload returned by the node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// ABI encoding or validation error
    #[error("codec error: {0}")]
    Codec(CodecError),

    /// Key parsing or signing error
    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    /// Malformed chain id, block id or transaction id
    #[error("invalid checksum: {0}")]
    Checksum(ChecksumError),

    /// Action or transaction limits violated
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl From<CodecError> for SdkError {
    fn from(e: CodecError) -> Self {
        SdkError::Codec(e)
    }
}

impl From<CryptoError> for SdkError {
    fn from(e: CryptoError) -> Self {
        SdkError::Crypto(e)
    }
}

impl From<ChecksumError> for SdkError {
    fn from(e: ChecksumError) -> Self {
        SdkError::Checksum(e)
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(e: toml::de::Error) -> Self {
        SdkError::Config(e.to_string())
    }
}
