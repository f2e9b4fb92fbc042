//! Codec errors

use thiserror::Error;

/// ABI codec error
///
/// Validation variants are raised at construction time; the decode variants
/// only appear on truncated or corrupt input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before the value was complete
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes required by the value being decoded
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },

    /// Bytes left over after decoding a complete value
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// Integer outside the range of its ABI type
    #[error("{type_name} value {value} is out of range, expected {expected}")]
    OutOfRange {
        /// ABI type name
        type_name: &'static str,
        /// Offending value
        value: String,
        /// Accepted range
        expected: &'static str,
    },

    /// Malformed account/action name
    #[error("invalid name {value:?}: {reason}")]
    InvalidName {
        /// Offending input
        value: String,
        /// Violated constraint
        reason: String,
    },

    /// Malformed symbol
    #[error("invalid symbol {value:?}: {reason}")]
    InvalidSymbol {
        /// Offending input
        value: String,
        /// Violated constraint
        reason: String,
    },

    /// Malformed asset
    #[error("invalid asset {value:?}: {reason}")]
    InvalidAsset {
        /// Offending input
        value: String,
        /// Violated constraint
        reason: String,
    },

    /// String contains a character wider than one UTF-8 byte
    #[error(
        "string {value:?} has a multi-byte utf-8 character at byte {position}; \
         only single-byte characters are supported"
    )]
    MultiByteChar {
        /// Offending input
        value: String,
        /// Byte offset of the first multi-byte character
        position: usize,
    },

    /// Decoded string bytes are not UTF-8
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(String),

    /// Decoded bool byte is neither 0 nor 1
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    /// Varuint32 did not terminate within the byte budget
    #[error("varuint32 did not terminate within {0} bytes")]
    VarintOverflow(usize),

    /// Array element does not match the declared element type
    #[error("array element {index} has type {found}, expected {expected}")]
    ElementTypeMismatch {
        /// Element position
        index: usize,
        /// Declared element type
        expected: String,
        /// Type of the offending element
        found: String,
    },

    /// `bytes[]` element that is not exactly one byte long
    #[error("bytes array element {index} is {len} bytes long, expected 1")]
    ByteElementLength {
        /// Element position
        index: usize,
        /// Length of the offending element
        len: usize,
    },

    /// Type name missing from the registry
    #[error("unknown type {name:?}, known types: {known}")]
    UnknownType {
        /// Requested type name
        name: String,
        /// Comma separated list of registered names
        known: String,
    },

    /// JSON value of the wrong kind for the target type
    #[error("{type_name} expects {expected}, got {found}")]
    JsonMismatch {
        /// ABI type name
        type_name: String,
        /// Expected JSON kind
        expected: &'static str,
        /// Received JSON value
        found: String,
    },

    /// Structured field mapping is malformed
    #[error("invalid field mapping: {0}")]
    InvalidField(String),
}
