//! # eosio-abi
//!
//! ABI binary codec for EOSIO chains.
//!
//! Every ABI type is a validated value with a deterministic byte encoding.
//! Validation only happens at construction; encoding a constructed value
//! cannot fail, and decoding fails only on truncated or corrupt input.
//!
//! ## Example
//!
//! ```rust
//! use eosio_abi::{AbiDecode, AbiEncode, Asset, Name};
//!
//! let name = Name::new("user2").unwrap();
//! assert_eq!(hex::encode(name.to_bytes()), "00000000007115d6");
//!
//! let asset: Asset = "99.9 WAX".parse().unwrap();
//! let decoded = Asset::from_bytes(&asset.to_bytes()).unwrap();
//! assert_eq!(decoded.to_string(), "99.9 WAX");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod asset;
mod error;
mod io;
mod name;
mod primitives;
mod string;
mod types;
mod value;

pub use asset::{Asset, Symbol};
pub use error::CodecError;
pub use io::{VARUINT32_MAX, VARUINT32_MAX_BYTES};
pub use name::Name;
pub use primitives::{UnixTimestamp, Varuint32};
pub use string::AbiString;
pub use types::AbiType;
pub use value::{write_blob, AbiValue, Array};

/// Canonical ABI binary encoding
pub trait AbiEncode {
    /// Append the encoding of `self` to `out`
    fn encode(&self, out: &mut Vec<u8>);

    /// Encode into a fresh buffer
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    /// Length of the encoding in bytes
    fn encoded_len(&self) -> usize {
        self.to_bytes().len()
    }
}

/// Decoding from ABI binary
pub trait AbiDecode: Sized {
    /// Decode one value from the front of `input`, advancing it
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError>;

    /// Decode a value that must span all of `bytes`
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = bytes;
        let value = Self::decode(&mut input)?;
        if !input.is_empty() {
            return Err(CodecError::TrailingBytes(input.len()));
        }
        Ok(value)
    }
}
