//! Static type registry and type-directed decoding

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::io::{read_len, take};
use crate::{
    AbiDecode, AbiString, AbiValue, Array, Asset, CodecError, Name, Symbol, UnixTimestamp,
    Varuint32,
};

/// ABI type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// `bool`
    Bool,
    /// `int8`
    Int8,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `varuint32`
    Varuint32,
    /// `string`
    String,
    /// `name`
    Name,
    /// `symbol`
    Symbol,
    /// `asset`
    Asset,
    /// `bytes`
    Bytes,
    /// `unixtimestamp`
    UnixTimestamp,
    /// `T[]`
    Array(Box<AbiType>),
}

static REGISTRY: [(&str, AbiType); 13] = [
    ("bool", AbiType::Bool),
    ("int8", AbiType::Int8),
    ("uint8", AbiType::Uint8),
    ("uint16", AbiType::Uint16),
    ("uint32", AbiType::Uint32),
    ("uint64", AbiType::Uint64),
    ("varuint32", AbiType::Varuint32),
    ("string", AbiType::String),
    ("name", AbiType::Name),
    ("symbol", AbiType::Symbol),
    ("asset", AbiType::Asset),
    ("bytes", AbiType::Bytes),
    ("unixtimestamp", AbiType::UnixTimestamp),
];

const ARRAY_SUFFIX: &str = "[]";

impl AbiType {
    /// Look up a registered type name; `T[]` yields an array of `T`
    ///
    /// Matching ignores ASCII case, so `Uint16` and `uint16` are the same type.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        if let Some(elem) = name.strip_suffix(ARRAY_SUFFIX) {
            return Ok(AbiType::Array(Box::new(AbiType::from_name(elem)?)));
        }
        REGISTRY
            .iter()
            .find(|(registered, _)| registered.eq_ignore_ascii_case(name))
            .map(|(_, ty)| ty.clone())
            .ok_or_else(|| CodecError::UnknownType {
                name: name.to_string(),
                known: REGISTRY
                    .iter()
                    .map(|(registered, _)| *registered)
                    .chain(std::iter::once("<type>[]"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Registered names, in registry order
    pub fn registered_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(name, _)| *name)
    }

    fn scalar_name(&self) -> &'static str {
        match self {
            AbiType::Bool => "bool",
            AbiType::Int8 => "int8",
            AbiType::Uint8 => "uint8",
            AbiType::Uint16 => "uint16",
            AbiType::Uint32 => "uint32",
            AbiType::Uint64 => "uint64",
            AbiType::Varuint32 => "varuint32",
            AbiType::String => "string",
            AbiType::Name => "name",
            AbiType::Symbol => "symbol",
            AbiType::Asset => "asset",
            AbiType::Bytes => "bytes",
            AbiType::UnixTimestamp => "unixtimestamp",
            AbiType::Array(_) => "array",
        }
    }

    /// Decode one value of this type from the front of `input`
    ///
    /// `bytes` has no framing of its own, so it takes everything left.
    pub fn decode(&self, input: &mut &[u8]) -> Result<AbiValue, CodecError> {
        match self {
            AbiType::Bytes => {
                let remaining = input.len();
                let rest = take(input, remaining)?;
                Ok(AbiValue::Bytes(rest.to_vec()))
            }
            AbiType::Array(elem) => {
                let count = read_len(input)?;
                // a count larger than the input is corrupt; avoid the allocation
                let mut values = Vec::with_capacity(count.min(input.len()));
                for _ in 0..count {
                    values.push(elem.decode_element(input)?);
                }
                Ok(AbiValue::Array(Array::new((**elem).clone(), values)?))
            }
            _ => self.decode_scalar(input),
        }
    }

    /// Decode a value that must span all of `bytes`
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<AbiValue, CodecError> {
        let mut input = bytes;
        let value = self.decode(&mut input)?;
        if !input.is_empty() {
            return Err(CodecError::TrailingBytes(input.len()));
        }
        Ok(value)
    }

    // inside an array each `bytes` element is a single byte
    fn decode_element(&self, input: &mut &[u8]) -> Result<AbiValue, CodecError> {
        match self {
            AbiType::Bytes => Ok(AbiValue::Bytes(take(input, 1)?.to_vec())),
            _ => self.decode(input),
        }
    }

    fn decode_scalar(&self, input: &mut &[u8]) -> Result<AbiValue, CodecError> {
        Ok(match self {
            AbiType::Bool => AbiValue::Bool(bool::decode(input)?),
            AbiType::Int8 => AbiValue::Int8(i8::decode(input)?),
            AbiType::Uint8 => AbiValue::Uint8(u8::decode(input)?),
            AbiType::Uint16 => AbiValue::Uint16(u16::decode(input)?),
            AbiType::Uint32 => AbiValue::Uint32(u32::decode(input)?),
            AbiType::Uint64 => AbiValue::Uint64(u64::decode(input)?),
            AbiType::Varuint32 => AbiValue::Varuint32(Varuint32::decode(input)?),
            AbiType::String => AbiValue::String(AbiString::decode(input)?),
            AbiType::Name => AbiValue::Name(Name::decode(input)?),
            AbiType::Symbol => AbiValue::Symbol(Symbol::decode(input)?),
            AbiType::Asset => AbiValue::Asset(Asset::decode(input)?),
            AbiType::UnixTimestamp => AbiValue::UnixTimestamp(UnixTimestamp::decode(input)?),
            AbiType::Bytes | AbiType::Array(_) => return self.decode(input),
        })
    }

    /// Build a validated value of this type from untyped JSON
    ///
    /// Integers are range checked against the bit width; names, symbols,
    /// assets and strings go through their usual constructors.
    pub fn value_from_json(&self, json: &Value) -> Result<AbiValue, CodecError> {
        let mismatch = |expected: &'static str| CodecError::JsonMismatch {
            type_name: self.to_string(),
            expected,
            found: json.to_string(),
        };
        let text = || json.as_str().ok_or_else(|| mismatch("a string"));

        Ok(match self {
            AbiType::Bool => AbiValue::Bool(json.as_bool().ok_or_else(|| mismatch("a boolean"))?),
            AbiType::Int8 => {
                let n = json.as_i64().ok_or_else(|| mismatch("an integer"))?;
                AbiValue::Int8(i8::try_from(n).map_err(|_| self.out_of_range(json, "[-128, 128)"))?)
            }
            AbiType::Uint8 => AbiValue::Uint8(self.unsigned(json, "[0, 256)")?),
            AbiType::Uint16 => AbiValue::Uint16(self.unsigned(json, "[0, 65536)")?),
            AbiType::Uint32 => AbiValue::Uint32(self.unsigned(json, "[0, 4294967296)")?),
            AbiType::Uint64 => {
                AbiValue::Uint64(self.unsigned(json, "[0, 18446744073709551616)")?)
            }
            AbiType::Varuint32 => {
                let n = json.as_u64().ok_or_else(|| {
                    if json.is_number() {
                        self.out_of_range(json, "[0, 20989371979]")
                    } else {
                        mismatch("an integer")
                    }
                })?;
                AbiValue::Varuint32(Varuint32::new(n)?)
            }
            AbiType::String => AbiValue::String(AbiString::new(text()?)?),
            AbiType::Name => AbiValue::Name(Name::new(text()?)?),
            AbiType::Symbol => AbiValue::Symbol(text()?.parse()?),
            AbiType::Asset => AbiValue::Asset(text()?.parse()?),
            AbiType::Bytes => {
                let raw = text()?;
                let raw = raw.strip_prefix("0x").unwrap_or(raw);
                AbiValue::Bytes(hex::decode(raw).map_err(|_| mismatch("a hex string"))?)
            }
            AbiType::UnixTimestamp => match json {
                Value::Number(n) => {
                    let secs = n.as_u64().ok_or_else(|| mismatch("seconds since epoch"))?;
                    let secs = u32::try_from(secs).map_err(|_| {
                        self.out_of_range(json, "[0, 4294967296) seconds")
                    })?;
                    AbiValue::UnixTimestamp(UnixTimestamp::from_secs(secs))
                }
                Value::String(s) => {
                    let datetime = DateTime::parse_from_rfc3339(s)
                        .map_err(|_| mismatch("an RFC 3339 datetime"))?
                        .with_timezone(&Utc);
                    AbiValue::UnixTimestamp(UnixTimestamp::from_datetime(datetime)?)
                }
                _ => return Err(mismatch("an RFC 3339 datetime or seconds")),
            },
            AbiType::Array(elem) => {
                let items = json.as_array().ok_or_else(|| mismatch("an array"))?;
                let values = items
                    .iter()
                    .map(|item| elem.value_from_json(item))
                    .collect::<Result<Vec<_>, _>>()?;
                AbiValue::Array(Array::new((**elem).clone(), values)?)
            }
        })
    }

    fn unsigned<T: TryFrom<u64>>(&self, json: &Value, expected: &'static str) -> Result<T, CodecError> {
        let n = match json.as_u64() {
            Some(n) => n,
            None if json.is_number() => return Err(self.out_of_range(json, expected)),
            None => {
                return Err(CodecError::JsonMismatch {
                    type_name: self.to_string(),
                    expected: "an integer",
                    found: json.to_string(),
                })
            }
        };
        T::try_from(n).map_err(|_| self.out_of_range(json, expected))
    }

    fn out_of_range(&self, json: &Value, expected: &'static str) -> CodecError {
        CodecError::OutOfRange {
            type_name: self.scalar_name(),
            value: json.to_string(),
            expected,
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Array(elem) => write!(f, "{}{}", elem, ARRAY_SUFFIX),
            other => f.write_str(other.scalar_name()),
        }
    }
}

impl FromStr for AbiType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AbiType::from_name(s)
    }
}
