use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod big_int;
pub mod primitive;
pub mod vector;

pub use big_int::{
    deserialize_big_int, deserialize_date, serialize_big_int, serialize_big_int_default,
    serialize_date,
};
pub use primitive::{
    bool_to_buffer, deserialize_bool, deserialize_int32, deserialize_uint32,
    deserialize_uint32_padded, deserialize_uint8, num_to_int32_be, num_to_int32_be_padded,
    num_to_uint32_be, num_to_uint32_be_padded, num_to_uint32_le, num_to_uint32_le_padded,
    num_to_uint8, wrapping_u32, wrapping_u8,
};
pub use vector::{
    deserialize_array_from_vector, deserialize_buffer_from_vector, deserialize_field,
    deserialize_string_from_vector, serialize_buffer_array_to_vector, serialize_buffer_to_vector,
    serialize_buffer_to_vector_with, vector_length_prefix,
};

/// A decoded value together with the number of bytes it occupied.
///
/// `adv` is what a caller adds to its read offset to reach the next value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub elem: T,
    pub adv: usize,
}

impl<T> Decoded<T> {
    pub fn new(elem: T, adv: usize) -> Self {
        Self { elem, adv }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            elem: f(self.elem),
            adv: self.adv,
        }
    }

    pub fn into_parts(self) -> (T, usize) {
        (self.elem, self.adv)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum DecodeError {
    #[error("needed {needed} bytes at offset {offset}, but the buffer only holds {available}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("vector payload is not valid UTF-8")]
    Utf8,
    #[error("timestamp {0}ms is out of range")]
    InvalidTimestamp(i64),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum EncodeError {
    #[error("vector of {0} bytes does not fit the length prefix")]
    VectorTooLong(usize),
    #[error("array of {0} elements does not fit the count prefix")]
    ArrayTooLong(usize),
}

/// How the 4 byte length header of a vector is written.
///
/// Both modes produce the same bytes for every length up to `i32::MAX`;
/// they only disagree on what lies above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorLengthMode {
    /// Signed 32 bit header, as every existing counterpart writes it.
    /// Lengths above `i32::MAX` are rejected.
    #[default]
    Compat,
    /// Unsigned 32 bit header, matching how the decoder reads it.
    Unsigned,
}

/// Borrows `len` bytes at `offset`, or reports how short the buffer is.
pub(crate) fn take(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(DecodeError::OutOfBounds {
            offset,
            needed: len,
            available: buf.len(),
        })
}

/// Like [`take`], for a compile-time width.
pub(crate) fn take_array<const N: usize>(
    buf: &[u8],
    offset: usize,
) -> Result<[u8; N], DecodeError> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(buf, offset, N)?);
    Ok(out)
}
