use bytes::Bytes;
use num_bigint::BigUint;

use crate::{
    codec::{self, take, take_array, DecodeError, Decoded},
    Field,
};

/// A read cursor over a shared buffer.
///
/// Every read goes through one of the offset based decoders and moves the
/// cursor forward by exactly the advance the decoder reported.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, pos: offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Runs `decode` at the cursor and advances past what it consumed.
    pub fn read<T>(
        &mut self,
        decode: impl FnOnce(&'a [u8], usize) -> Result<Decoded<T>, DecodeError>,
    ) -> Result<T, DecodeError> {
        let Decoded { elem, adv } = decode(self.buf, self.pos)?;
        self.pos += adv;
        Ok(elem)
    }

    pub fn get_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let slice = take(self.buf, self.pos, len)?;
        self.pos += len;
        Ok(slice)
    }

    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = take_array::<N>(self.buf, self.pos)?;
        self.pos += N;
        Ok(bytes)
    }

    pub fn get_bool(&mut self) -> Result<bool, DecodeError> {
        self.read(codec::deserialize_bool)
    }

    pub fn get_u8(&mut self) -> Result<u8, DecodeError> {
        self.read(codec::deserialize_uint8)
    }

    pub fn get_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_be_bytes(self.get_array()?))
    }

    pub fn get_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.get_array()?))
    }

    pub fn get_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.get_array()?))
    }

    pub fn get_u32(&mut self) -> Result<u32, DecodeError> {
        self.read(codec::deserialize_uint32)
    }

    pub fn get_i32(&mut self) -> Result<i32, DecodeError> {
        self.read(codec::deserialize_int32)
    }

    pub fn get_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.get_array()?))
    }

    pub fn get_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_be_bytes(self.get_array()?))
    }

    pub fn get_big_int(&mut self, width: usize) -> Result<BigUint, DecodeError> {
        self.read(|buf, offset| codec::deserialize_big_int(buf, offset, width))
    }

    pub fn get_field(&mut self) -> Result<Field, DecodeError> {
        self.read(codec::deserialize_field)
    }

    pub fn get_vector(&mut self) -> Result<Bytes, DecodeError> {
        self.read(codec::deserialize_buffer_from_vector)
    }

    /// Like [`Self::get_vector`] but borrows the payload instead of copying it.
    pub fn get_vector_slice(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.pos;
        let len = self.get_u32()? as usize;
        self.get_slice(len).inspect_err(|_| self.pos = start)
    }

    pub fn get_string(&mut self) -> Result<String, DecodeError> {
        self.read(codec::deserialize_string_from_vector)
    }
}
