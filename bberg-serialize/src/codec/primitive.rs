use bytes::{BufMut, Bytes, BytesMut};

use super::{take, take_array, DecodeError, Decoded};
use crate::UINT32_WIDTH;

pub fn bool_to_buffer(b: bool) -> Bytes {
    Bytes::from_static(if b { &[1] } else { &[0] })
}

pub fn num_to_uint8(n: u8) -> Bytes {
    Bytes::copy_from_slice(&[n])
}

/// Big-endian `u32`.
pub fn num_to_uint32_be(n: u32) -> Bytes {
    num_to_uint32_be_padded(n, UINT32_WIDTH)
}

/// Big-endian `u32` in the last 4 bytes of a zeroed buffer of `width` bytes.
///
/// # Panics
/// If `width` is smaller than 4.
pub fn num_to_uint32_be_padded(n: u32, width: usize) -> Bytes {
    let mut buf = zeroed_prefix(width);
    buf.put_u32(n);
    buf.freeze()
}

/// Little-endian `u32`.
pub fn num_to_uint32_le(n: u32) -> Bytes {
    num_to_uint32_le_padded(n, UINT32_WIDTH)
}

/// Little-endian `u32` in the last 4 bytes of a zeroed buffer of `width` bytes.
///
/// # Panics
/// If `width` is smaller than 4.
pub fn num_to_uint32_le_padded(n: u32, width: usize) -> Bytes {
    let mut buf = zeroed_prefix(width);
    buf.put_u32_le(n);
    buf.freeze()
}

/// Big-endian two's complement `i32`.
pub fn num_to_int32_be(n: i32) -> Bytes {
    num_to_int32_be_padded(n, UINT32_WIDTH)
}

/// Big-endian `i32` in the last 4 bytes of a zeroed buffer of `width` bytes.
///
/// # Panics
/// If `width` is smaller than 4.
pub fn num_to_int32_be_padded(n: i32, width: usize) -> Bytes {
    let mut buf = zeroed_prefix(width);
    buf.put_i32(n);
    buf.freeze()
}

/// Narrows a native integer to 32 bits the way the wire format always has:
/// negative values and values above `u32::MAX` wrap silently.
pub const fn wrapping_u32(n: i64) -> u32 {
    n as u32
}

/// Narrows a native integer to its low 8 bits.
pub const fn wrapping_u8(n: i64) -> u8 {
    n as u8
}

pub fn deserialize_bool(buf: &[u8], offset: usize) -> Result<Decoded<bool>, DecodeError> {
    let [byte] = take_array::<1>(buf, offset)?;
    Ok(Decoded::new(byte != 0, 1))
}

pub fn deserialize_uint8(buf: &[u8], offset: usize) -> Result<Decoded<u8>, DecodeError> {
    let [byte] = take_array::<1>(buf, offset)?;
    Ok(Decoded::new(byte, 1))
}

pub fn deserialize_uint32(buf: &[u8], offset: usize) -> Result<Decoded<u32>, DecodeError> {
    let bytes = take_array::<UINT32_WIDTH>(buf, offset)?;
    Ok(Decoded::new(u32::from_be_bytes(bytes), UINT32_WIDTH))
}

pub fn deserialize_int32(buf: &[u8], offset: usize) -> Result<Decoded<i32>, DecodeError> {
    let bytes = take_array::<UINT32_WIDTH>(buf, offset)?;
    Ok(Decoded::new(i32::from_be_bytes(bytes), UINT32_WIDTH))
}

/// Reads a `u32` that was written with a padded width, skipping the zero prefix.
pub fn deserialize_uint32_padded(
    buf: &[u8],
    offset: usize,
    width: usize,
) -> Result<Decoded<u32>, DecodeError> {
    let width = width.max(UINT32_WIDTH);
    take(buf, offset, width)?;
    let Decoded { elem, .. } = deserialize_uint32(buf, offset + width - UINT32_WIDTH)?;
    Ok(Decoded::new(elem, width))
}

fn zeroed_prefix(width: usize) -> BytesMut {
    assert!(
        width >= UINT32_WIDTH,
        "buffer of {width} bytes cannot hold a 32 bit integer"
    );
    let mut buf = BytesMut::with_capacity(width);
    buf.put_bytes(0, width - UINT32_WIDTH);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    #[test]
    fn bool_round_trips() {
        for b in [true, false] {
            let buf = bool_to_buffer(b);
            assert_eq!(buf.len(), 1);
            assert_eq!(deserialize_bool(&buf, 0).unwrap(), Decoded::new(b, 1));
        }
        // any non-zero byte reads as true
        assert!(deserialize_bool(&[0x7f], 0).unwrap().elem);
    }

    #[test]
    fn uint32_round_trips() {
        assert!((0..=u32::from(u16::MAX))
            .into_par_iter()
            .map(|i| i.wrapping_mul(65_537) ^ 0x5a5a)
            .chain([0, u32::MAX])
            .all(|n| {
                deserialize_uint32(&num_to_uint32_be(n), 0).unwrap() == Decoded::new(n, 4)
            }));
    }

    #[test]
    fn int32_round_trips() {
        assert!((0..=u32::from(u16::MAX))
            .into_par_iter()
            .map(|i| i.wrapping_mul(65_537) as i32)
            .chain([i32::MIN, -1, 0, i32::MAX])
            .all(|n| {
                deserialize_int32(&num_to_int32_be(n), 0).unwrap() == Decoded::new(n, 4)
            }));
    }

    #[test]
    fn integers_are_big_endian() {
        assert_eq!(&num_to_uint32_be(0x0102_0304)[..], &[1, 2, 3, 4]);
        assert_eq!(&num_to_uint32_le(0x0102_0304)[..], &[4, 3, 2, 1]);
        assert_eq!(&num_to_int32_be(-2)[..], &[0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(&num_to_uint8(0xab)[..], &[0xab]);
    }

    #[test]
    fn padded_width_zero_fills_the_front() {
        assert_eq!(&num_to_uint32_be_padded(1, 8)[..], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&num_to_uint32_le_padded(1, 6)[..], &[0, 0, 1, 0, 0, 0]);
        assert_eq!(&num_to_int32_be_padded(-1, 5)[..], &[0, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(
            deserialize_uint32_padded(&num_to_uint32_be_padded(77, 32), 0, 32).unwrap(),
            Decoded::new(77, 32)
        );
    }

    #[test]
    #[should_panic(expected = "cannot hold a 32 bit integer")]
    fn padded_width_must_fit_the_integer() {
        num_to_uint32_be_padded(1, 3);
    }

    #[test]
    fn narrowing_wraps() {
        assert_eq!(wrapping_u32(-1), u32::MAX);
        assert_eq!(wrapping_u32(1 << 32 | 5), 5);
        assert_eq!(wrapping_u8(0x1ff), 0xff);
        assert_eq!(&num_to_uint32_be(wrapping_u32(-1))[..], &[0xff; 4]);
    }

    #[test]
    fn decoding_honours_the_offset() {
        let buf = [9, 9, 0, 0, 1, 0, 1];
        assert_eq!(deserialize_uint32(&buf, 2).unwrap(), Decoded::new(256, 4));
        assert_eq!(deserialize_bool(&buf, 6).unwrap(), Decoded::new(true, 1));
        assert_eq!(deserialize_uint8(&buf, 1).unwrap(), Decoded::new(9, 1));
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert_eq!(
            deserialize_uint32(&[0, 1, 2], 0),
            Err(DecodeError::OutOfBounds {
                offset: 0,
                needed: 4,
                available: 3
            })
        );
        assert!(deserialize_int32(&[0; 4], 1).is_err());
        assert!(deserialize_bool(&[], 0).is_err());
    }
}
