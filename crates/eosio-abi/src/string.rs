//! Length-prefixed strings

use std::fmt;

use crate::io::{read_len, take, write_varuint};
use crate::{AbiDecode, AbiEncode, CodecError};

/// String encoded as a varuint32 byte length followed by the bytes
///
/// Only single-byte UTF-8 characters are accepted. The chain itself allows
/// any UTF-8; the restriction keeps character and byte counts equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AbiString(String);

impl AbiString {
    /// Validate and wrap a string
    pub fn new(value: impl Into<String>) -> Result<Self, CodecError> {
        let value = value.into();
        if let Some((position, _)) = value.char_indices().find(|(_, c)| c.len_utf8() > 1) {
            return Err(CodecError::MultiByteChar { value, position });
        }
        Ok(AbiString(value))
    }

    /// String contents
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for AbiString {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        AbiString::new(value)
    }
}

impl AbiEncode for AbiString {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varuint(out, self.0.len() as u64);
        out.extend_from_slice(self.0.as_bytes());
    }
}

impl AbiDecode for AbiString {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let len = read_len(input)?;
        let bytes = take(input, len)?;
        let text = std::str::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8(e.to_string()))?;
        AbiString::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_vectors() {
        assert_eq!(hex::encode(AbiString::new("a").unwrap().to_bytes()), "0161");
        assert_eq!(hex::encode(AbiString::new("").unwrap().to_bytes()), "00");
        assert_eq!(
            hex::encode(AbiString::new("kcjansdcd").unwrap().to_bytes()),
            "096b636a616e73646364"
        );
    }

    #[test]
    fn test_string_long_prefix() {
        let text = "x".repeat(200);
        let bytes = AbiString::new(text.clone()).unwrap().to_bytes();
        assert_eq!(&bytes[..2], &[0xc8, 0x01]);
        assert_eq!(AbiString::from_bytes(&bytes).unwrap().as_str(), text);
    }

    #[test]
    fn test_string_rejects_multi_byte() {
        let err = AbiString::new("héllo").unwrap_err();
        assert_eq!(
            err,
            CodecError::MultiByteChar {
                value: "héllo".into(),
                position: 1
            }
        );
        assert!(AbiString::new("🙂").is_err());
    }

    #[test]
    fn test_string_decode_truncated() {
        assert!(matches!(
            AbiString::from_bytes(&[0x05, b'a', b'b']),
            Err(CodecError::UnexpectedEof { needed: 5, remaining: 2 })
        ));
    }

    #[test]
    fn test_string_decode_invalid_utf8() {
        assert!(matches!(
            AbiString::from_bytes(&[0x01, 0xff]),
            Err(CodecError::InvalidUtf8(_))
        ));
    }
}
