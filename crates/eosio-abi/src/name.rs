//! Account, permission and action names packed into a `u64`

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::{AbiDecode, AbiEncode, CodecError};

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum name length in characters
pub const NAME_MAX_LEN: usize = 13;

/// Validated EOSIO name
///
/// Up to 13 characters from `.12345a-z` with at least one non-dot
/// character (the empty name is also accepted). A 13 character name can
/// only end in `.` or `a-j`, since the last slot holds four bits.
///
/// Names compare and hash with every `.` removed, so `"a"` and `"a."`
/// are the same name.
#[derive(Debug, Clone, Default)]
pub struct Name(String);

impl Name {
    /// Validate and wrap a name
    pub fn new(value: impl Into<String>) -> Result<Self, CodecError> {
        let value = value.into();
        validate(&value)?;
        Ok(Name(value))
    }

    /// Name text as given at construction
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pack into the chain's 64-bit representation
    pub fn to_u64(&self) -> u64 {
        let bytes = self.0.as_bytes();
        let mut packed = 0u64;
        for (i, &c) in bytes.iter().take(12).enumerate() {
            packed |= (symbol_value(c) & 0x1f) << (64 - 5 * (i + 1));
        }
        if let Some(&last) = bytes.get(12) {
            packed |= symbol_value(last) & 0x0f;
        }
        packed
    }

    /// Unpack a 64-bit name, stripping leading and trailing dots
    pub fn from_u64(packed: u64) -> Result<Self, CodecError> {
        let mut chars = [b'.'; NAME_MAX_LEN];
        let mut rest = packed;
        for i in 0..NAME_MAX_LEN {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            chars[NAME_MAX_LEN - 1 - i] = CHARMAP[(rest & mask) as usize];
            rest >>= shift;
        }
        // CHARMAP is ASCII, so every byte is a char
        let text: String = chars.iter().map(|&c| c as char).collect();
        Name::new(text.trim_matches('.'))
    }

    fn canonical(&self) -> String {
        self.0.replace('.', "")
    }
}

fn symbol_value(c: u8) -> u64 {
    match c {
        b'a'..=b'z' => u64::from(c - b'a') + 6,
        b'1'..=b'5' => u64::from(c - b'1') + 1,
        _ => 0,
    }
}

fn validate(value: &str) -> Result<(), CodecError> {
    let invalid = |reason: String| CodecError::InvalidName {
        value: value.to_string(),
        reason,
    };

    if value.len() > NAME_MAX_LEN {
        return Err(invalid(format!(
            "at most {} characters allowed, got {}",
            NAME_MAX_LEN,
            value.len()
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !matches!(c, '.' | 'a'..='z' | '1'..='5'))
    {
        return Err(invalid(format!(
            "character {:?} is outside [.a-z1-5]",
            bad
        )));
    }
    if !value.is_empty() && value.bytes().all(|c| c == b'.') {
        return Err(invalid("at least one non-dot character required".into()));
    }
    if value.len() == NAME_MAX_LEN {
        let last = value.as_bytes()[NAME_MAX_LEN - 1];
        if !matches!(last, b'.' | b'a'..=b'j') {
            return Err(invalid(format!(
                "13th character must be in [.a-j], got {:?}",
                last as char
            )));
        }
    }
    Ok(())
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Name {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Name::new(value)
    }
}

impl AbiEncode for Name {
    fn encode(&self, out: &mut Vec<u8>) {
        self.to_u64().encode(out);
    }

    fn encoded_len(&self) -> usize {
        8
    }
}

impl AbiDecode for Name {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        Name::from_u64(u64::decode(input)?)
    }
}
