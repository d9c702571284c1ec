//! serde support for the wire format.
//!
//! Any `Serialize` type whose shape maps onto the format (integers, bools,
//! strings, byte vectors, sequences, tuples, structs, options and enums) can be
//! written with [`to_bytes`] and read back with [`from_bytes`]. The bytes are
//! the same ones the hand written encoders in [`crate::codec`] produce, so
//! `"ab"` and `vec![true, false]` come out exactly like their
//! [`crate::Bufferable`] counterparts.

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

mod deserializer;
mod serializer;

pub use deserializer::{Deserializer, DeserializerError};
pub use serializer::{Serializer, SerializerError};

use crate::codec::{Decoded, VectorLengthMode};

pub fn to_bytes<T>(value: &T) -> Result<Bytes, SerializerError>
where
    T: ?Sized + Serialize,
{
    to_bytes_with(value, VectorLengthMode::default())
}

pub fn to_bytes_with<T>(value: &T, length_mode: VectorLengthMode) -> Result<Bytes, SerializerError>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_length_mode(BytesMut::new(), length_mode);
    value.serialize(&mut serializer)?;
    Ok(serializer.into())
}

/// Decodes a `T` that must span the whole buffer.
pub fn from_bytes<'de, T>(buf: &'de [u8]) -> Result<T, DeserializerError>
where
    T: Deserialize<'de>,
{
    let Decoded { elem, adv } = from_bytes_at(buf, 0)?;
    if adv != buf.len() {
        return Err(DeserializerError::TrailingBytes(buf.len() - adv));
    }
    Ok(elem)
}

/// Decodes a `T` starting at `offset` and reports how many bytes it took.
pub fn from_bytes_at<'de, T>(buf: &'de [u8], offset: usize) -> Result<Decoded<T>, DeserializerError>
where
    T: Deserialize<'de>,
{
    let mut deserializer = Deserializer::at(buf, offset);
    let value = T::deserialize(&mut deserializer)?;
    Ok(Decoded::new(value, deserializer.position() - offset))
}

/// `#[serde(with = "bberg_serialize::ser::big_int")]` for `BigUint` fields,
/// written as a 32 byte big-endian integer.
pub mod big_int {
    use num_bigint::BigUint;
    use serde::{ser::SerializeTuple, Deserialize, Deserializer, Serializer};

    use crate::{codec::serialize_big_int_default, BIG_INT_WIDTH};

    pub fn serialize<S>(n: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bytes = serialize_big_int_default(n);
        let mut tuple = serializer.serialize_tuple(BIG_INT_WIDTH)?;
        for byte in bytes.iter() {
            tuple.serialize_element(byte)?;
        }
        tuple.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = <[u8; BIG_INT_WIDTH]>::deserialize(deserializer)?;
        Ok(BigUint::from_bytes_be(&bytes))
    }
}

/// `#[serde(with = "bberg_serialize::ser::date")]` for `DateTime<Utc>` fields,
/// written as an 8 byte millisecond timestamp.
pub mod date {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(date.timestamp_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)? as i64;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| de::Error::custom(format!("timestamp {millis}ms is out of range")))
    }
}
