//! Zig-zag and base-128 variable length integers.
//!
//! Follows the encoding documented for protocol buffers: signed values are
//! zig-zag mapped so that small magnitudes (positive or negative) become small
//! unsigned values, then written seven bits at a time with a continuation bit.

/// Longest base-128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

pub fn zigzag_encode_32(n: i32) -> u32 {
    ((n >> 31) ^ (n << 1)) as u32
}

pub fn zigzag_encode_64(n: i64) -> u64 {
    ((n >> 63) ^ (n << 1)) as u64
}

pub fn zigzag_decode_32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

pub fn zigzag_decode_64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Write `value` seven bits at a time, low group first.
pub fn encode_varint(value: u64, buf: &mut Vec<u8>) {
    let mut rest = value;
    while rest >= 0x80 {
        buf.push(0x80 | (rest & 0x7F) as u8);
        rest >>= 7;
    }
    buf.push(rest as u8);
}

/// Read one varint from the front of `buf`, returning the value and the
/// number of bytes it occupied.
///
/// `None` when the input ends mid-value or the encoding does not fit a u64.
pub fn decode_varint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        // The last group only has room for bit 63.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return None;
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Zig-zag a signed value and write it as a varint.
pub fn encode_signed_varint(value: i64, buf: &mut Vec<u8>) {
    encode_varint(zigzag_encode_64(value), buf);
}

/// Read a varint and undo the zig-zag mapping.
pub fn decode_signed_varint(buf: &[u8]) -> Option<(i64, usize)> {
    decode_varint(buf).map(|(v, n)| (zigzag_decode_64(v), n))
}
