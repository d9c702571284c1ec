use std::fmt::Display;

use serde::de::{
    self, value::U32Deserializer, DeserializeSeed, EnumAccess, IntoDeserializer, SeqAccess,
    VariantAccess, Visitor,
};
use thiserror::Error;

use crate::{bytebuf::ByteReader, codec::DecodeError};

pub struct Deserializer<'de> {
    reader: ByteReader<'de>,
}

impl<'de> Deserializer<'de> {
    pub fn new(buf: &'de [u8]) -> Self {
        Self::at(buf, 0)
    }

    pub fn at(buf: &'de [u8], offset: usize) -> Self {
        Self {
            reader: ByteReader::at(buf, offset),
        }
    }

    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    fn get_str(&mut self) -> Result<&'de str, DeserializerError> {
        let bytes = self.reader.get_vector_slice()?;
        std::str::from_utf8(bytes).map_err(|_| DeserializerError::Decode(DecodeError::Utf8))
    }
}

#[derive(Debug, Error)]
pub enum DeserializerError {
    #[error("deserializer error {0}")]
    Message(String),
    #[error("{0} cannot be read from the wire format")]
    Unsupported(&'static str),
    #[error("{0} bytes left over after decoding")]
    TrailingBytes(usize),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl de::Error for DeserializerError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

/// Reads a primitive straight from the cursor.
macro_rules! fn_deserialize_primitive {
    ($deserialize_fn:ident, $visit_fn:ident, $get_fn:ident) => {
        fn $deserialize_fn<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: Visitor<'de>,
        {
            visitor.$visit_fn(self.reader.$get_fn()?)
        }
    };
}

/// The format is not self describing, so anything that needs a type hint the
/// wire cannot provide is rejected.
macro_rules! fn_unsupported {
    ($deserialize_fn:ident => $what:expr) => {
        fn $deserialize_fn<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
        where
            V: Visitor<'de>,
        {
            Err(DeserializerError::Unsupported($what))
        }
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = DeserializerError;

    fn_unsupported!(deserialize_any => "a value without a type hint");
    fn_unsupported!(deserialize_f32 => "f32");
    fn_unsupported!(deserialize_f64 => "f64");
    fn_unsupported!(deserialize_char => "char");
    fn_unsupported!(deserialize_map => "map");
    fn_unsupported!(deserialize_identifier => "identifier");
    fn_unsupported!(deserialize_ignored_any => "an ignored value");

    fn_deserialize_primitive!(deserialize_bool, visit_bool, get_bool);
    fn_deserialize_primitive!(deserialize_u8, visit_u8, get_u8);
    fn_deserialize_primitive!(deserialize_i8, visit_i8, get_i8);
    fn_deserialize_primitive!(deserialize_u16, visit_u16, get_u16);
    fn_deserialize_primitive!(deserialize_i16, visit_i16, get_i16);
    fn_deserialize_primitive!(deserialize_u32, visit_u32, get_u32);
    fn_deserialize_primitive!(deserialize_i32, visit_i32, get_i32);
    fn_deserialize_primitive!(deserialize_u64, visit_u64, get_u64);
    fn_deserialize_primitive!(deserialize_i64, visit_i64, get_i64);
    fn_deserialize_primitive!(deserialize_bytes, visit_borrowed_bytes, get_vector_slice);
    fn_deserialize_primitive!(deserialize_byte_buf, visit_borrowed_bytes, get_vector_slice);

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.get_str()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.get_str()?)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.reader.get_bool()? {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let len = self.reader.get_u32()? as usize;
        visitor.visit_seq(SeqAccessor { de: self, len })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SeqAccessor { de: self, len })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SeqAccessor { de: self, len })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SeqAccessor {
            de: self,
            len: fields.len(),
        })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(self)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Hands out exactly `len` elements, however they were framed.
struct SeqAccessor<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    len: usize,
}

impl<'de> SeqAccess<'de> for SeqAccessor<'_, 'de> {
    type Error = DeserializerError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        if self.len == 0 {
            return Ok(None);
        }
        self.len -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        // never trust a count beyond what the buffer could hold
        Some(self.len.min(self.de.remaining()))
    }
}

impl<'de> EnumAccess<'de> for &mut Deserializer<'de> {
    type Error = DeserializerError;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let index: U32Deserializer<DeserializerError> = self.reader.get_u32()?.into_deserializer();
        let variant = seed.deserialize(index)?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for &mut Deserializer<'de> {
    type Error = DeserializerError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, fields.len(), visitor)
    }
}
