//! # eosio-primitives
//!
//! Primitive types shared by the EOSIO codec, signer and SDK crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;

pub use checksum::{BlockId, ChainId, Checksum256, ChecksumError, TransactionId};
