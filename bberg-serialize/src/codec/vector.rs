use bytes::{BufMut, Bytes, BytesMut};

use super::{
    primitive::deserialize_uint32, take, take_array, DecodeError, Decoded, EncodeError,
    VectorLengthMode,
};
use crate::{Field, FIELD_SIZE, UINT32_WIDTH};

/// The 4 byte length header written in front of a vector of `len` bytes.
pub fn vector_length_prefix(len: usize, mode: VectorLengthMode) -> Result<[u8; 4], EncodeError> {
    let prefix = match mode {
        VectorLengthMode::Compat => i32::try_from(len).map(i32::to_be_bytes),
        VectorLengthMode::Unsigned => u32::try_from(len).map(u32::to_be_bytes),
    };
    prefix.map_err(|_| EncodeError::VectorTooLong(len))
}

/// Length prefixed byte vector with a signed 32 bit big-endian header.
pub fn serialize_buffer_to_vector(buf: &[u8]) -> Result<Bytes, EncodeError> {
    serialize_buffer_to_vector_with(buf, VectorLengthMode::Compat)
}

pub fn serialize_buffer_to_vector_with(
    buf: &[u8],
    mode: VectorLengthMode,
) -> Result<Bytes, EncodeError> {
    let prefix = vector_length_prefix(buf.len(), mode)?;
    let mut out = BytesMut::with_capacity(prefix.len() + buf.len());
    out.put_slice(&prefix);
    out.put_slice(buf);
    Ok(out.freeze())
}

/// Reads an unsigned 32 bit length followed by that many payload bytes.
pub fn deserialize_buffer_from_vector(
    buf: &[u8],
    offset: usize,
) -> Result<Decoded<Bytes>, DecodeError> {
    let Decoded { elem: len, adv } = deserialize_uint32(buf, offset)?;
    let len = len as usize;
    let payload = take(buf, offset + adv, len)?;
    Ok(Decoded::new(Bytes::copy_from_slice(payload), adv + len))
}

/// A vector whose payload is UTF-8 text.
pub fn deserialize_string_from_vector(
    buf: &[u8],
    offset: usize,
) -> Result<Decoded<String>, DecodeError> {
    let Decoded { elem, adv } = deserialize_buffer_from_vector(buf, offset)?;
    let text = std::str::from_utf8(&elem).map_err(|_| DecodeError::Utf8)?;
    Ok(Decoded::new(text.to_owned(), adv))
}

/// Writes a count followed by each element, which the caller has already encoded.
pub fn serialize_buffer_array_to_vector<B: AsRef<[u8]>>(arr: &[B]) -> Result<Bytes, EncodeError> {
    let count = u32::try_from(arr.len()).map_err(|_| EncodeError::ArrayTooLong(arr.len()))?;
    let len = arr.iter().map(|elem| elem.as_ref().len()).sum::<usize>();
    let mut out = BytesMut::with_capacity(UINT32_WIDTH + len);
    out.put_u32(count);
    for elem in arr {
        out.put_slice(elem.as_ref());
    }
    Ok(out.freeze())
}

/// Reads a count and then that many elements with `deserialize`, each starting
/// where the previous one ended.
pub fn deserialize_array_from_vector<T, F>(
    mut deserialize: F,
    buf: &[u8],
    offset: usize,
) -> Result<Decoded<Vec<T>>, DecodeError>
where
    F: FnMut(&[u8], usize) -> Result<Decoded<T>, DecodeError>,
{
    let Decoded { elem: size, adv } = deserialize_uint32(buf, offset)?;
    let mut pos = offset + adv;
    // the count is only a hint until the elements are actually there
    let mut arr = Vec::with_capacity((size as usize).min(buf.len() - pos));
    for _ in 0..size {
        let Decoded { elem, adv } = deserialize(buf, pos)?;
        pos += adv;
        arr.push(elem);
    }
    Ok(Decoded::new(arr, pos - offset))
}

pub fn deserialize_field(buf: &[u8], offset: usize) -> Result<Decoded<Field>, DecodeError> {
    let bytes = take_array::<FIELD_SIZE>(buf, offset)?;
    Ok(Decoded::new(Field(bytes), FIELD_SIZE))
}
