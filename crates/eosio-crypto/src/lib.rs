//! # eosio-crypto
//!
//! Cryptographic primitives for EOSIO transactions.
//!
//! - SHA-256 / RIPEMD-160 hashing
//! - WIF private keys and `EOS…` / `PUB_K1_…` public keys
//! - Deterministic ECDSA signing (secp256k1) with canonical signature selection
//! - `SIG_K1_…` signature text, public key recovery and verification
//!
//! ```rust
//! use eosio_crypto::{sign_bytes, PrivateKey};
//!
//! let key: PrivateKey = "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3".parse().unwrap();
//! assert_eq!(
//!     key.public_key().to_legacy_string(),
//!     "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV"
//! );
//! let signature = sign_bytes(b"a", &key).unwrap();
//! assert!(signature.to_string().starts_with("SIG_K1_"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod key;
mod signature;

pub use error::CryptoError;
pub use hash::{double_sha256, ripemd160, sha256};
pub use key::{PrivateKey, PublicKey};
pub use signature::{is_canonical, sign_bytes, sign_digest, KeyType, Signature};
