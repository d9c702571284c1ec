use bytes::Bytes;
use derive_more::{AsRef, Deref, From, Into};
use serde::{Deserialize, Serialize};

pub mod bufferable;
pub mod bytebuf;
pub mod codec;
pub mod ser;

pub use bufferable::{serialize_bufferable, Bufferable, ToBuffer};
pub use codec::{DecodeError, Decoded, EncodeError, VectorLengthMode};

/// Width in bytes of a plain 32 bit integer on the wire.
pub const UINT32_WIDTH: usize = 4;

/// Default width of a big integer, enough for any 256 bit value.
pub const BIG_INT_WIDTH: usize = 32;

/// Dates are millisecond timestamps written as an 8 byte big integer.
pub const DATE_WIDTH: usize = 8;

/// Fixed size of an opaque field element.
pub const FIELD_SIZE: usize = 32;

/// A buffer that is already in its final wire form.
///
/// The dispatcher writes it out untouched, without a length prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deref, From, Into, AsRef)]
pub struct RawBuffer(pub Bytes);

impl From<Vec<u8>> for RawBuffer {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

/// A fixed-width 32 byte element, e.g. a scalar of a prime field.
///
/// Fields are never length prefixed; the surrounding context knows where they are.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deref, From, Into, AsRef, Serialize, Deserialize,
)]
pub struct Field(pub [u8; FIELD_SIZE]);

impl Field {
    pub const ZERO: Self = Self([0; FIELD_SIZE]);

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl ToBuffer for Field {
    fn write(&self, buf: &mut bytes::BytesMut) {
        buf.extend_from_slice(&self.0);
    }
}
