use std::{fmt, sync::Arc};

use bytes::{Bytes, BytesMut};
use num_bigint::BigUint;

use crate::{
    bytebuf::concatenate_buffers,
    codec::{
        bool_to_buffer, num_to_uint32_be, serialize_big_int_default,
        serialize_buffer_array_to_vector, serialize_buffer_to_vector, wrapping_u32, EncodeError,
    },
    Field, RawBuffer,
};

/// A value that knows its own wire form.
pub trait ToBuffer: Send + Sync {
    /// Appends the encoded form of `self` to `buf`.
    fn write(&self, buf: &mut BytesMut);

    fn to_buffer(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.write(&mut buf);
        buf.freeze()
    }
}

/// Everything [`serialize_bufferable`] knows how to encode.
#[derive(Clone)]
pub enum Bufferable {
    /// Count prefixed array, each element encoded recursively.
    List(Vec<Bufferable>),
    /// Already in wire form, written as is.
    Raw(RawBuffer),
    /// Length prefixed vector.
    Bytes(Bytes),
    Bool(bool),
    UInt32(u32),
    /// Written with the same 4 byte layout as `UInt32`, i.e. its two's complement bits.
    Int32(i32),
    /// 32 byte big-endian.
    BigInt(BigUint),
    /// UTF-8 bytes as a vector.
    Str(String),
    Custom(Arc<dyn ToBuffer>),
}

impl Bufferable {
    pub fn custom(value: impl ToBuffer + 'static) -> Self {
        Self::Custom(Arc::new(value))
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Bufferable>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// A native integer narrowed to 32 bits; out of range values wrap.
    pub fn truncating(n: i64) -> Self {
        Self::UInt32(wrapping_u32(n))
    }

    pub fn to_buffer(&self) -> Result<Bytes, EncodeError> {
        serialize_bufferable(self)
    }
}

/// Encodes `obj` according to its kind.
///
/// Lists are arrays of their recursively encoded elements, raw buffers pass
/// through untouched, byte vectors and strings get a length prefix, numbers are
/// 4 byte big-endian and big integers 32 byte big-endian.
pub fn serialize_bufferable(obj: &Bufferable) -> Result<Bytes, EncodeError> {
    match obj {
        Bufferable::List(items) => {
            let encoded = items
                .iter()
                .map(serialize_bufferable)
                .collect::<Result<Vec<_>, _>>()?;
            serialize_buffer_array_to_vector(&encoded)
        }
        Bufferable::Raw(raw) => Ok(raw.0.clone()),
        Bufferable::Bytes(bytes) => serialize_buffer_to_vector(bytes),
        Bufferable::Bool(b) => Ok(bool_to_buffer(*b)),
        Bufferable::UInt32(n) => Ok(num_to_uint32_be(*n)),
        Bufferable::Int32(n) => Ok(num_to_uint32_be(*n as u32)),
        Bufferable::BigInt(n) => Ok(serialize_big_int_default(n)),
        Bufferable::Str(s) => serialize_buffer_to_vector(s.as_bytes()),
        Bufferable::Custom(value) => Ok(value.to_buffer()),
    }
}

/// Encodes every argument and lays them out back to back, with no count in front.
///
/// This is the layout a module export expects for its argument list.
pub fn serialize_contiguous(objs: &[Bufferable]) -> Result<Bytes, EncodeError> {
    let encoded = objs
        .iter()
        .map(serialize_bufferable)
        .collect::<Result<Vec<_>, _>>()?;
    log::trace!(
        "serialized {} arguments into {} bytes",
        objs.len(),
        encoded.iter().map(Bytes::len).sum::<usize>()
    );
    Ok(concatenate_buffers(&encoded))
}

impl fmt::Debug for Bufferable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::UInt32(n) => f.debug_tuple("UInt32").field(n).finish(),
            Self::Int32(n) => f.debug_tuple("Int32").field(n).finish(),
            Self::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Vec<Bufferable>> for Bufferable {
    fn from(value: Vec<Bufferable>) -> Self {
        Self::List(value)
    }
}

impl From<RawBuffer> for Bufferable {
    fn from(value: RawBuffer) -> Self {
        Self::Raw(value)
    }
}

impl From<Bytes> for Bufferable {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for Bufferable {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Bufferable {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<bool> for Bufferable {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for Bufferable {
    fn from(value: u32) -> Self {
        Self::UInt32(value)
    }
}

impl From<i32> for Bufferable {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<BigUint> for Bufferable {
    fn from(value: BigUint) -> Self {
        Self::BigInt(value)
    }
}

impl From<String> for Bufferable {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Bufferable {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<Field> for Bufferable {
    fn from(value: Field) -> Self {
        Self::custom(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytebuf::to_hex_string;
    use crate::codec::{deserialize_array_from_vector, deserialize_bool, Decoded};

    fn hex(obj: impl Into<Bufferable>) -> String {
        to_hex_string(&serialize_bufferable(&obj.into()).unwrap())
    }

    #[test]
    fn list_of_bools() {
        assert_eq!(hex(Bufferable::list([true, false])), "000000020100");
    }

    #[test]
    fn string_is_a_utf8_vector() {
        assert_eq!(hex("ab"), "000000026162");
        assert_eq!(hex("é"), "00000002c3a9");
    }

    #[test]
    fn raw_buffers_pass_through() {
        let raw = RawBuffer::from(vec![0xdeu8, 0xad]);
        assert_eq!(hex(raw), "dead");
        assert_eq!(hex(vec![0xdeu8, 0xad]), "00000002dead");
    }

    #[test]
    fn numbers_are_4_byte_big_endian() {
        assert_eq!(hex(258u32), "00000102");
        assert_eq!(hex(-1i32), "ffffffff");
        assert_eq!(hex(Bufferable::truncating(1 << 32 | 1)), "00000001");
        assert_eq!(hex(Bufferable::truncating(-2)), "fffffffe");
    }

    #[test]
    fn big_ints_are_32_bytes() {
        let encoded = serialize_bufferable(&BigUint::from(1u8).into()).unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[31], 1);
        assert!(encoded[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn custom_values_write_themselves() {
        let field = Field([7; 32]);
        assert_eq!(serialize_bufferable(&field.into()).unwrap(), &[7u8; 32][..]);
    }

    #[test]
    fn nested_lists_recurse() {
        let nested = Bufferable::list([
            Bufferable::list([1u32]),
            Bufferable::list(Vec::<Bufferable>::new()),
            Bufferable::from("x"),
        ]);
        assert_eq!(
            hex(nested),
            concat!("00000003", "00000001", "00000001", "00000000", "00000001", "78")
        );
    }

    #[test]
    fn encoded_list_decodes_with_element_decoder() {
        let flags = [true, true, false];
        let encoded = serialize_bufferable(&Bufferable::list(flags)).unwrap();
        assert_eq!(
            deserialize_array_from_vector(deserialize_bool, &encoded, 0).unwrap(),
            Decoded::new(flags.to_vec(), 4 + 3)
        );
    }

    #[test]
    fn contiguous_arguments_have_no_count() {
        let args = [Bufferable::from(1u32), Bufferable::from(true)];
        assert_eq!(to_hex_string(&serialize_contiguous(&args).unwrap()), "0000000101");
    }

    #[test]
    fn encoding_is_deterministic() {
        let value = Bufferable::list([Bufferable::from("abc"), BigUint::from(5u8).into()]);
        assert_eq!(value.to_buffer().unwrap(), value.clone().to_buffer().unwrap());
    }
}
