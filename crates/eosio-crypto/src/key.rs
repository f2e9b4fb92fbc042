//! WIF private keys and K1 public keys

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::Scalar;
use zeroize::Zeroize;

use crate::hash::{double_sha256, key_checksum};
use crate::CryptoError;

const WIF_VERSION: u8 = 0x80;
const WIF_COMPRESSED_FLAG: u8 = 0x01;
const WIF_LEN: usize = 37;
const WIF_COMPRESSED_LEN: usize = 38;

const LEGACY_PREFIX: &str = "EOS";
const PUB_K1_PREFIX: &str = "PUB_K1_";

/// secp256k1 private key decoded from WIF
///
/// Clone is not implemented; parse the WIF again if a second handle is
/// needed. Key material never appears in `Debug` output.
///
/// ```compile_fail
/// let key = eosio_crypto::PrivateKey::from_wif(
///     "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3",
/// ).unwrap();
/// let _copy = key.clone();
/// ```
pub struct PrivateKey {
    key: SigningKey,
    compressed: bool,
}

impl PrivateKey {
    /// Parse a legacy base58-check WIF key
    ///
    /// Layout: `0x80 || key(32) [|| 0x01] || double_sha256(..)[..4]`
    pub fn from_wif(wif: &str) -> Result<Self, CryptoError> {
        let mut decoded = bs58::decode(wif)
            .into_vec()
            .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
        let result = Self::from_wif_bytes(&decoded);
        decoded.zeroize();
        result
    }

    fn from_wif_bytes(decoded: &[u8]) -> Result<Self, CryptoError> {
        if decoded.len() != WIF_LEN && decoded.len() != WIF_COMPRESSED_LEN {
            return Err(CryptoError::InvalidLength {
                what: "WIF",
                expected: "37 or 38 bytes",
                got: decoded.len(),
            });
        }

        let (payload, checksum) = decoded.split_at(decoded.len() - 4);
        if double_sha256(payload)[..4] != *checksum {
            return Err(CryptoError::ChecksumMismatch("WIF"));
        }
        if payload[0] != WIF_VERSION {
            return Err(CryptoError::InvalidVersion(payload[0]));
        }

        let compressed = payload.len() == 34;
        if compressed && payload[33] != WIF_COMPRESSED_FLAG {
            return Err(CryptoError::InvalidPrivateKey(format!(
                "unexpected compression flag 0x{:02x}",
                payload[33]
            )));
        }

        let key = SigningKey::from_slice(&payload[1..33])
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { key, compressed })
    }

    /// Create from raw key bytes
    pub fn from_bytes(bytes: &[u8; 32], compressed: bool) -> Result<Self, CryptoError> {
        let key = SigningKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { key, compressed })
    }

    /// Encode back to WIF
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(WIF_COMPRESSED_LEN);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.key.to_bytes());
        if self.compressed {
            payload.push(WIF_COMPRESSED_FLAG);
        }
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..4]);
        let wif = bs58::encode(&payload).into_string();
        payload.zeroize();
        wif
    }

    /// True if the WIF carried the compression suffix
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Derive the public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey(VerifyingKey::from(&self.key))
    }

    pub(crate) fn scalar(&self) -> Scalar {
        let scalar: &Scalar = self.key.as_nonzero_scalar();
        *scalar
    }

    pub(crate) fn secret_bytes(&self) -> [u8; 32] {
        self.key.to_bytes().into()
    }
}

impl FromStr for PrivateKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivateKey::from_wif(s)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key().to_string())
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

/// Compressed secp256k1 public key
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse SEC1 bytes (compressed or uncompressed)
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(PublicKey)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// 33-byte compressed SEC1 encoding
    pub fn to_compressed_bytes(&self) -> [u8; 33] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Legacy `EOS…` text form
    pub fn to_legacy_string(&self) -> String {
        let raw = self.to_compressed_bytes();
        encode_key_text(LEGACY_PREFIX, &raw, b"")
    }

    /// Underlying k256 key
    pub fn as_verifying_key(&self) -> &VerifyingKey {
        &self.0
    }
}

fn encode_key_text(prefix: &str, raw: &[u8], suffix: &[u8]) -> String {
    let mut data = raw.to_vec();
    data.extend_from_slice(&key_checksum(raw, suffix));
    format!("{}{}", prefix, bs58::encode(data).into_string())
}

fn decode_key_text(body: &str, suffix: &[u8]) -> Result<[u8; 33], CryptoError> {
    let data = bs58::decode(body)
        .into_vec()
        .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
    if data.len() != 37 {
        return Err(CryptoError::InvalidLength {
            what: "public key",
            expected: "37 bytes",
            got: data.len(),
        });
    }
    let (raw, checksum) = data.split_at(33);
    if key_checksum(raw, suffix) != checksum {
        return Err(CryptoError::ChecksumMismatch("public key"));
    }
    let mut out = [0u8; 33];
    out.copy_from_slice(raw);
    Ok(out)
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        PublicKey(key)
    }
}

impl fmt::Display for PublicKey {
    /// `PUB_K1_…` text form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.to_compressed_bytes();
        f.write_str(&encode_key_text(PUB_K1_PREFIX, &raw, b"K1"))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    /// Accepts both `PUB_K1_…` and legacy `EOS…`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = if let Some(body) = s.strip_prefix(PUB_K1_PREFIX) {
            decode_key_text(body, b"K1")?
        } else if s.starts_with("PUB_R1_") {
            return Err(CryptoError::NotImplemented("R1"));
        } else if let Some(body) = s.strip_prefix(LEGACY_PREFIX) {
            decode_key_text(body, b"")?
        } else {
            return Err(CryptoError::InvalidPublicKey(format!(
                "unknown prefix in {:?}",
                s
            )));
        };
        PublicKey::from_sec1_bytes(&raw)
    }
}
