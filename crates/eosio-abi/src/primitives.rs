//! Fixed-width integers, bool, varuint32 and unix timestamps

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::io::{read_varuint, take_array, write_varuint, VARUINT32_MAX};
use crate::{AbiDecode, AbiEncode, CodecError};

macro_rules! impl_fixed_width {
    ($($ty:ty => $n:expr),* $(,)?) => {
        $(
            impl AbiEncode for $ty {
                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn encoded_len(&self) -> usize {
                    $n
                }
            }

            impl AbiDecode for $ty {
                fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
                    Ok(<$ty>::from_le_bytes(take_array::<$n>(input)?))
                }
            }
        )*
    };
}

impl_fixed_width!(i8 => 1, u8 => 1, u16 => 2, u32 => 4, u64 => 8);

impl AbiEncode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

impl AbiDecode for bool {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        match take_array::<1>(input)? {
            [0] => Ok(false),
            [1] => Ok(true),
            [other] => Err(CodecError::InvalidBool(other)),
        }
    }
}

/// Variable-length unsigned integer, bounded to `0..=20_989_371_979`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Varuint32(u64);

impl Varuint32 {
    /// Largest accepted value
    pub const MAX: u64 = VARUINT32_MAX;

    /// Create a checked varuint32
    pub fn new(value: u64) -> Result<Self, CodecError> {
        if value > Self::MAX {
            return Err(CodecError::OutOfRange {
                type_name: "varuint32",
                value: value.to_string(),
                expected: "[0, 20989371979]",
            });
        }
        Ok(Varuint32(value))
    }

    /// The integer value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u32> for Varuint32 {
    fn from(value: u32) -> Self {
        Varuint32(u64::from(value))
    }
}

impl fmt::Display for Varuint32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AbiEncode for Varuint32 {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varuint(out, self.0);
    }
}

impl AbiDecode for Varuint32 {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        read_varuint(input).map(Varuint32)
    }
}

/// UTC instant with one-second precision, encoded as `u32` seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnixTimestamp(u32);

impl UnixTimestamp {
    /// From seconds since the unix epoch
    pub const fn from_secs(secs: u32) -> Self {
        UnixTimestamp(secs)
    }

    /// From a UTC datetime; sub-second precision is dropped
    pub fn from_datetime(datetime: DateTime<Utc>) -> Result<Self, CodecError> {
        let secs = datetime.timestamp();
        u32::try_from(secs)
            .map(UnixTimestamp)
            .map_err(|_| CodecError::OutOfRange {
                type_name: "unixtimestamp",
                value: datetime.to_rfc3339(),
                expected: "[1970-01-01T00:00:00Z, 2106-02-07T06:28:15Z]",
            })
    }

    /// Seconds since the unix epoch
    pub fn secs(&self) -> u32 {
        self.0
    }

    /// As a UTC datetime
    pub fn to_datetime(&self) -> DateTime<Utc> {
        // every u32 second count is a valid chrono timestamp
        Utc.timestamp_opt(i64::from(self.0), 0)
            .single()
            .unwrap_or_default()
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_datetime().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl AbiEncode for UnixTimestamp {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }

    fn encoded_len(&self) -> usize {
        4
    }
}

impl AbiDecode for UnixTimestamp {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        u32::decode(input).map(UnixTimestamp)
    }
}
