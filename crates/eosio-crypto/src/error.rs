//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Nothing to sign
    #[error("can not sign empty bytes")]
    EmptyMessage,

    /// Text is not valid base58
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// Decoded key or signature has the wrong size
    #[error("invalid {what} length: expected {expected}, got {got}")]
    InvalidLength {
        /// Kind of object being decoded
        what: &'static str,
        /// Accepted sizes
        expected: &'static str,
        /// Decoded size
        got: usize,
    },

    /// Embedded checksum does not match the payload
    #[error("{0} checksum mismatch")]
    ChecksumMismatch(&'static str),

    /// WIF version byte is not 0x80
    #[error("invalid WIF version: expected 0x80, got 0x{0:02x}")]
    InvalidVersion(u8),

    /// Invalid private key
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid public key
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid recovery id
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Recovery failed
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// Key type other than K1
    #[error("{0} keys are not implemented")]
    NotImplemented(&'static str),

    /// Signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
