//! Byte cursor helpers shared by the decoders

use crate::CodecError;

/// Upper bound accepted for `varuint32` values
pub const VARUINT32_MAX: u64 = 20_989_371_979;

/// Bytes a `varuint32` may occupy before decoding gives up
pub const VARUINT32_MAX_BYTES: usize = 5;

pub(crate) fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if input.len() < n {
        return Err(CodecError::UnexpectedEof {
            needed: n,
            remaining: input.len(),
        });
    }
    let (head, rest) = input.split_at(n);
    *input = rest;
    Ok(head)
}

pub(crate) fn take_array<const N: usize>(input: &mut &[u8]) -> Result<[u8; N], CodecError> {
    let bytes = take(input, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// LEB128: 7 payload bits per byte, low group first
pub(crate) fn write_varuint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

pub(crate) fn read_varuint(input: &mut &[u8]) -> Result<u64, CodecError> {
    let mut value = 0u64;
    for i in 0..VARUINT32_MAX_BYTES {
        let [byte] = take_array::<1>(input)?;
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            if value > VARUINT32_MAX {
                return Err(CodecError::OutOfRange {
                    type_name: "varuint32",
                    value: value.to_string(),
                    expected: "[0, 20989371979]",
                });
            }
            return Ok(value);
        }
    }
    Err(CodecError::VarintOverflow(VARUINT32_MAX_BYTES))
}

/// Length prefix for strings and arrays
pub(crate) fn read_len(input: &mut &[u8]) -> Result<usize, CodecError> {
    let len = read_varuint(input)?;
    usize::try_from(len).map_err(|_| CodecError::OutOfRange {
        type_name: "length",
        value: len.to_string(),
        expected: "a platform-sized length",
    })
}
