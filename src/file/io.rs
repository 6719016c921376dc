//! Primitive binary reads and the ECMA-335 compressed integer encoding.
//!
//! The compressed encoding (II.23.2) is used for counts, coded tokens and
//! blob length prefixes throughout the metadata format:
//! - Values 0..=0x7F: 1 byte `0xxxxxxx`
//! - Values 0x80..=0x3FFF: 2 bytes `10xxxxxx xxxxxxxx`
//! - Values 0x4000..=0x1FFF_FFFF: 4 bytes `110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx`

use crate::{Error::OutOfBounds, Result};

/// Trait for numeric types that can be read from little-endian byte buffers.
///
/// Implemented for the fixed-width integers and floats the metadata format
/// stores directly (argument values, counts, prologs).
pub trait CilIO: Sized {
    /// The fixed-size byte array backing this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read `Self` from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Write `Self` to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_cil_io {
    ($($t:ty => $len:literal),* $(,)?) => {
        $(
            impl CilIO for $t {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$t>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$t>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_cil_io! {
    u8 => 1, i8 => 1,
    u16 => 2, i16 => 2,
    u32 => 4, i32 => 4,
    u64 => 8, i64 => 8,
    f32 => 4, f64 => 8,
}

/// Read a `T` from `data` at `*offset` in little-endian and advance the offset.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Append a compressed unsigned integer to `buffer`.
///
/// Values above `0x1FFF_FFFF` are not representable in this encoding and are
/// truncated by masking, matching the writer behavior for layout purposes
/// (callers validate ranges beforehand).
pub fn write_compressed_uint(value: u32, buffer: &mut Vec<u8>) {
    if value <= 0x7F {
        buffer.push(value as u8);
    } else if value <= 0x3FFF {
        buffer.push(0x80 | ((value >> 8) as u8));
        buffer.push((value & 0xFF) as u8);
    } else {
        buffer.push(0xC0 | (((value >> 24) & 0x1F) as u8));
        buffer.push(((value >> 16) & 0xFF) as u8);
        buffer.push(((value >> 8) & 0xFF) as u8);
        buffer.push((value & 0xFF) as u8);
    }
}

/// Exact byte length [`write_compressed_uint`] will emit for `value`.
#[must_use]
pub fn compressed_uint_size(value: u32) -> u32 {
    if value <= 0x7F {
        1
    } else if value <= 0x3FFF {
        2
    } else {
        4
    }
}
