//! SHA-256 and RIPEMD-160 hashing

use eosio_primitives::Checksum256;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Checksum256 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Checksum256::from_bytes(hasher.finalize().into())
}

/// SHA-256 applied twice, as used by WIF checksums
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// Compute the RIPEMD-160 hash of the input data
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// First four bytes of `RIPEMD160(data || suffix)`
pub(crate) fn key_checksum(data: &[u8], suffix: &[u8]) -> [u8; 4] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.update(suffix);
    let digest = hasher.finalize();
    [digest[0], digest[1], digest[2], digest[3]]
}
