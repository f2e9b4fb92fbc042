//! Deterministic ECDSA signing over secp256k1 and `SIG_K1_` text

use std::fmt;
use std::str::FromStr;

use eosio_primitives::Checksum256;
use hmac::{Hmac, Mac};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::scalar::IsHigh;
use k256::{FieldBytes, ProjectivePoint, Scalar, U256};
use sha2::Sha256;
use tracing::trace;
use zeroize::Zeroize;

use crate::hash::{key_checksum, sha256};
use crate::{CryptoError, PrivateKey, PublicKey};

type HmacSha256 = Hmac<Sha256>;

const SIG_K1_PREFIX: &str = "SIG_K1_";
const SIG_R1_PREFIX: &str = "SIG_R1_";

/// `v` for an uncompressed key with even `R.y`
const V_BASE: u8 = 27;
/// Added to `v` when the signing WIF was compressed
const V_COMPRESSED: u8 = 4;

/// Half of the secp256k1 curve order (n/2)
/// n/2 = 0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0
const SECP256K1_N_DIV_2: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D,
    0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Key type byte of the binary signature form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    /// secp256k1
    K1 = 0,
    /// secp256r1
    R1 = 1,
}

impl TryFrom<u8> for KeyType {
    type Error = CryptoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyType::K1),
            1 => Ok(KeyType::R1),
            other => Err(CryptoError::InvalidSignature(format!(
                "unknown key type byte {}",
                other
            ))),
        }
    }
}

/// Recoverable K1 signature `(v, r, s)`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    /// 27 + recovery parity, plus 4 for compressed keys
    pub v: u8,
    /// r component (32 bytes, big-endian)
    pub r: [u8; 32],
    /// s component (32 bytes, big-endian, low-s)
    pub s: [u8; 32],
}

impl Signature {
    /// Create signature from v, r, s components
    pub fn new(v: u8, r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { v, r, s }
    }

    /// 65-byte `v || r || s`
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0] = self.v;
        bytes[1..33].copy_from_slice(&self.r);
        bytes[33..].copy_from_slice(&self.s);
        bytes
    }

    /// Parse from 65-byte `v || r || s`
    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..]);
        Signature { v: bytes[0], r, s }
    }

    /// Binary form: key type byte followed by `v || r || s`
    pub fn to_binary(&self) -> [u8; 66] {
        let mut out = [0u8; 66];
        out[0] = KeyType::K1 as u8;
        out[1..].copy_from_slice(&self.to_bytes());
        out
    }

    /// Parse the binary form
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (&key_type, body) = bytes
            .split_first()
            .ok_or_else(|| CryptoError::InvalidSignature("empty binary signature".into()))?;
        match KeyType::try_from(key_type)? {
            KeyType::K1 => {}
            KeyType::R1 => return Err(CryptoError::NotImplemented("R1")),
        }
        let body: &[u8; 65] = body.try_into().map_err(|_| CryptoError::InvalidLength {
            what: "signature",
            expected: "65 bytes after the key type",
            got: body.len(),
        })?;
        Ok(Signature::from_bytes(body))
    }

    /// Check if signature has low-s value
    pub fn is_low_s(&self) -> bool {
        self.s <= SECP256K1_N_DIV_2
    }

    /// True if `r` and `s` have no shorter DER encoding
    pub fn is_canonical(&self) -> bool {
        is_canonical(&self.to_bytes())
    }

    /// Recovery id with the compression offset removed
    pub fn recovery_id(&self) -> Result<RecoveryId, CryptoError> {
        let mut v = self.v;
        if v >= V_BASE + V_COMPRESSED {
            v -= V_COMPRESSED;
        }
        let recid = v
            .checked_sub(V_BASE)
            .filter(|id| *id < 4)
            .ok_or(CryptoError::InvalidRecoveryId(self.v))?;
        RecoveryId::from_byte(recid).ok_or(CryptoError::InvalidRecoveryId(self.v))
    }

    fn to_k256(&self) -> Result<K256Signature, CryptoError> {
        let r: FieldBytes = self.r.into();
        let s: FieldBytes = self.s.into();
        K256Signature::from_scalars(r, s).map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }

    /// Recover the signer's public key from a 32-byte digest
    pub fn recover(&self, digest: &Checksum256) -> Result<PublicKey, CryptoError> {
        let signature = self.to_k256()?;
        VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, self.recovery_id()?)
            .map(PublicKey::from)
            .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
    }

    /// Verify against a 32-byte digest and public key
    pub fn verify(&self, digest: &Checksum256, public_key: &PublicKey) -> Result<bool, CryptoError> {
        if !self.is_low_s() {
            return Ok(false);
        }
        let signature = self.to_k256()?;

        use k256::ecdsa::signature::hazmat::PrehashVerifier;
        Ok(public_key
            .as_verifying_key()
            .verify_prehash(digest.as_bytes(), &signature)
            .is_ok())
    }
}

impl fmt::Display for Signature {
    /// `SIG_K1_` + base58(`v || r || s` + 4-byte RIPEMD-160 checksum)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.to_bytes();
        let mut data = raw.to_vec();
        data.extend_from_slice(&key_checksum(&raw, b"K1"));
        write!(f, "{}{}", SIG_K1_PREFIX, bs58::encode(data).into_string())
    }
}

impl FromStr for Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = match s.strip_prefix(SIG_K1_PREFIX) {
            Some(body) => body,
            None if s.starts_with(SIG_R1_PREFIX) => return Err(CryptoError::NotImplemented("R1")),
            None => {
                return Err(CryptoError::InvalidSignature(format!(
                    "expected {} prefix",
                    SIG_K1_PREFIX
                )))
            }
        };
        let data = bs58::decode(body)
            .into_vec()
            .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
        if data.len() != 69 {
            return Err(CryptoError::InvalidLength {
                what: "signature",
                expected: "69 bytes",
                got: data.len(),
            });
        }
        let (raw, checksum) = data.split_at(65);
        if key_checksum(raw, b"K1") != checksum {
            return Err(CryptoError::ChecksumMismatch("signature"));
        }
        let mut bytes = [0u8; 65];
        bytes.copy_from_slice(raw);
        Ok(Signature::from_bytes(&bytes))
    }
}

/// Canonical predicate over the 65-byte `v || r || s` blob
///
/// Neither `r` nor `s` may have the high bit set, and neither may start
/// with a zero byte unless the next byte has the high bit set.
pub fn is_canonical(sig: &[u8; 65]) -> bool {
    sig[1] & 0x80 == 0
        && !(sig[1] == 0 && sig[2] & 0x80 == 0)
        && sig[33] & 0x80 == 0
        && !(sig[33] == 0 && sig[34] & 0x80 == 0)
}

/// Sign `bytes`: SHA-256 them, then [`sign_digest`]
pub fn sign_bytes(bytes: &[u8], key: &PrivateKey) -> Result<Signature, CryptoError> {
    if bytes.is_empty() {
        return Err(CryptoError::EmptyMessage);
    }
    sign_digest(&sha256(bytes), key)
}

/// Sign a 32-byte digest, retrying with a bumped nonce until canonical
///
/// The same digest and key always produce the same signature.
pub fn sign_digest(digest: &Checksum256, key: &PrivateKey) -> Result<Signature, CryptoError> {
    let mut secret = key.secret_bytes();
    let result = sign_with_secret(digest, key, &secret);
    secret.zeroize();
    result
}

fn sign_with_secret(
    digest: &Checksum256,
    key: &PrivateKey,
    secret: &[u8; 32],
) -> Result<Signature, CryptoError> {
    let d = key.scalar();
    let h = reduce(digest.as_bytes());

    let mut nonce: u64 = 0;
    loop {
        if let Some(signature) = sign_once(digest, secret, &d, &h, nonce, key.is_compressed())? {
            if signature.is_canonical() {
                trace!(nonce, "found canonical signature");
                return Ok(signature);
            }
        }
        trace!(nonce, "signature not canonical, retrying");
        nonce = nonce
            .checked_add(1)
            .ok_or_else(|| CryptoError::SigningFailed("nonce space exhausted".into()))?;
    }
}

fn sign_once(
    digest: &Checksum256,
    secret: &[u8; 32],
    d: &Scalar,
    h: &Scalar,
    nonce: u64,
    compressed: bool,
) -> Result<Option<Signature>, CryptoError> {
    let mut k_bytes = deterministic_k(digest, secret, nonce)?;
    let k = reduce(&k_bytes);
    k_bytes.zeroize();

    let point = (ProjectivePoint::GENERATOR * k).to_affine();
    let x = point.x();
    let r = <Scalar as Reduce<U256>>::reduce_bytes(&x);

    let k_inv: Option<Scalar> = k.invert().into();
    let Some(k_inv) = k_inv else {
        return Ok(None);
    };
    let mut s = k_inv * (*h + r * d);
    if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
        return Ok(None);
    }

    let mut y_odd = u8::from(bool::from(point.y_is_odd()));
    if bool::from(s.is_high()) {
        s = -s;
        y_odd ^= 1;
    }

    let mut v = V_BASE + y_odd;
    if compressed {
        v += V_COMPRESSED;
    }

    Ok(Some(Signature {
        v,
        r: x.into(),
        s: s.to_bytes().into(),
    }))
}

/// HMAC-SHA256 nonce over the key and `digest + nonce`
fn deterministic_k(digest: &Checksum256, secret: &[u8; 32], nonce: u64) -> Result<[u8; 32], CryptoError> {
    let message = add_be(digest.as_bytes(), nonce);
    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    k = hmac_sha256(&k, &[&v[..], &[0x00], &secret[..], &message[..]])?;
    v = hmac_sha256(&k, &[&v[..]])?;
    k = hmac_sha256(&k, &[&v[..], &[0x01], &secret[..], &message[..]])?;
    v = hmac_sha256(&k, &[&v[..]])?;
    let out = hmac_sha256(&k, &[&v[..]])?;

    k.zeroize();
    v.zeroize();
    Ok(out)
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 32], CryptoError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}

/// 256-bit big-endian `value + n`, wrapping
fn add_be(value: &[u8; 32], n: u64) -> [u8; 32] {
    let mut out = *value;
    let mut carry = u128::from(n);
    for byte in out.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = u128::from(*byte) + (carry & 0xff);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
    out
}

fn reduce(bytes: &[u8; 32]) -> Scalar {
    let field_bytes: FieldBytes = (*bytes).into();
    <Scalar as Reduce<U256>>::reduce_bytes(&field_bytes)
}
