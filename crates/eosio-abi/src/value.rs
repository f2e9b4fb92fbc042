//! Closed sum type over every supported ABI value

use serde_json::{json, Value};

use crate::io::write_varuint;
use crate::{
    AbiEncode, AbiString, AbiType, Asset, CodecError, Name, Symbol, UnixTimestamp, Varuint32,
};

/// A typed ABI value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiValue {
    /// `bool`
    Bool(bool),
    /// `int8`
    Int8(i8),
    /// `uint8`
    Uint8(u8),
    /// `uint16`
    Uint16(u16),
    /// `uint32`
    Uint32(u32),
    /// `uint64`
    Uint64(u64),
    /// `varuint32`
    Varuint32(Varuint32),
    /// `string`
    String(AbiString),
    /// `name`
    Name(Name),
    /// `symbol`
    Symbol(Symbol),
    /// `asset`
    Asset(Asset),
    /// `bytes`, written raw without a length prefix
    Bytes(Vec<u8>),
    /// `T[]`
    Array(Array),
    /// `unixtimestamp`
    UnixTimestamp(UnixTimestamp),
}

impl AbiValue {
    /// ABI type of this value
    pub fn abi_type(&self) -> AbiType {
        match self {
            AbiValue::Bool(_) => AbiType::Bool,
            AbiValue::Int8(_) => AbiType::Int8,
            AbiValue::Uint8(_) => AbiType::Uint8,
            AbiValue::Uint16(_) => AbiType::Uint16,
            AbiValue::Uint32(_) => AbiType::Uint32,
            AbiValue::Uint64(_) => AbiType::Uint64,
            AbiValue::Varuint32(_) => AbiType::Varuint32,
            AbiValue::String(_) => AbiType::String,
            AbiValue::Name(_) => AbiType::Name,
            AbiValue::Symbol(_) => AbiType::Symbol,
            AbiValue::Asset(_) => AbiType::Asset,
            AbiValue::Bytes(_) => AbiType::Bytes,
            AbiValue::Array(array) => AbiType::Array(Box::new(array.elem.clone())),
            AbiValue::UnixTimestamp(_) => AbiType::UnixTimestamp,
        }
    }

    /// JSON form accepted back by [`AbiType::value_from_json`]
    pub fn to_json(&self) -> Value {
        match self {
            AbiValue::Bool(v) => json!(v),
            AbiValue::Int8(v) => json!(v),
            AbiValue::Uint8(v) => json!(v),
            AbiValue::Uint16(v) => json!(v),
            AbiValue::Uint32(v) => json!(v),
            AbiValue::Uint64(v) => json!(v),
            AbiValue::Varuint32(v) => json!(v.value()),
            AbiValue::String(v) => json!(v.as_str()),
            AbiValue::Name(v) => json!(v.as_str()),
            AbiValue::Symbol(v) => json!(v.to_string()),
            AbiValue::Asset(v) => json!(v.to_string()),
            AbiValue::Bytes(v) => json!(hex::encode(v)),
            AbiValue::Array(array) => {
                Value::Array(array.values.iter().map(AbiValue::to_json).collect())
            }
            AbiValue::UnixTimestamp(v) => json!(v.to_string()),
        }
    }
}

impl AbiEncode for AbiValue {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            AbiValue::Bool(v) => v.encode(out),
            AbiValue::Int8(v) => v.encode(out),
            AbiValue::Uint8(v) => v.encode(out),
            AbiValue::Uint16(v) => v.encode(out),
            AbiValue::Uint32(v) => v.encode(out),
            AbiValue::Uint64(v) => v.encode(out),
            AbiValue::Varuint32(v) => v.encode(out),
            AbiValue::String(v) => v.encode(out),
            AbiValue::Name(v) => v.encode(out),
            AbiValue::Symbol(v) => v.encode(out),
            AbiValue::Asset(v) => v.encode(out),
            AbiValue::Bytes(v) => out.extend_from_slice(v),
            AbiValue::Array(v) => v.encode(out),
            AbiValue::UnixTimestamp(v) => v.encode(out),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AbiValue {
                fn from(value: $ty) -> Self {
                    AbiValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_value!(
    bool => Bool,
    i8 => Int8,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    Varuint32 => Varuint32,
    AbiString => String,
    Name => Name,
    Symbol => Symbol,
    Asset => Asset,
    Vec<u8> => Bytes,
    Array => Array,
    UnixTimestamp => UnixTimestamp,
);

/// Homogeneous array: varuint32 count followed by the elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Array {
    elem: AbiType,
    values: Vec<AbiValue>,
}

impl Array {
    /// Build an array whose elements all have type `elem`
    pub fn new(elem: AbiType, values: Vec<AbiValue>) -> Result<Self, CodecError> {
        for (index, value) in values.iter().enumerate() {
            let found = value.abi_type();
            if found != elem {
                return Err(CodecError::ElementTypeMismatch {
                    index,
                    expected: elem.to_string(),
                    found: found.to_string(),
                });
            }
            // elements of `bytes[]` are framed as single bytes on the wire
            if let AbiValue::Bytes(bytes) = value {
                if bytes.len() != 1 {
                    return Err(CodecError::ByteElementLength {
                        index,
                        len: bytes.len(),
                    });
                }
            }
        }
        Ok(Array { elem, values })
    }

    /// Empty array of `elem`
    pub fn empty(elem: AbiType) -> Self {
        Array {
            elem,
            values: Vec::new(),
        }
    }

    /// Element type
    pub fn elem(&self) -> &AbiType {
        &self.elem
    }

    /// Elements in order
    pub fn values(&self) -> &[AbiValue] {
        &self.values
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AbiEncode for Array {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varuint(out, self.values.len() as u64);
        for value in &self.values {
            value.encode(out);
        }
    }
}

/// Write `bytes` as a blob: varuint32 count then the raw bytes
///
/// Same bytes as an `Array` of one-byte `Bytes` elements.
pub fn write_blob(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varuint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}
