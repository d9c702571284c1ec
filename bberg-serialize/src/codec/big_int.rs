use bytes::{Bytes, BytesMut};
use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigUint;

use super::{take, take_array, DecodeError, Decoded};
use crate::{BIG_INT_WIDTH, DATE_WIDTH};

/// Writes `n` big-endian into exactly `width` bytes.
///
/// Byte `width - 1 - i` holds `(n >> 8i) & 0xff`, so anything above
/// `8 * width` bits is dropped and small values are zero padded in front.
pub fn serialize_big_int(n: &BigUint, width: usize) -> Bytes {
    let mut buf = BytesMut::zeroed(width);
    let digits = n.to_bytes_be();
    let low = &digits[digits.len().saturating_sub(width)..];
    buf[width - low.len()..].copy_from_slice(low);
    buf.freeze()
}

pub fn serialize_big_int_default(n: &BigUint) -> Bytes {
    serialize_big_int(n, BIG_INT_WIDTH)
}

pub fn deserialize_big_int(
    buf: &[u8],
    offset: usize,
    width: usize,
) -> Result<Decoded<BigUint>, DecodeError> {
    let bytes = take(buf, offset, width)?;
    Ok(Decoded::new(BigUint::from_bytes_be(bytes), width))
}

/// Writes the millisecond timestamp of `date` as an 8 byte big integer.
///
/// Dates before the epoch come out as the 64 bit two's complement of their
/// (negative) timestamp.
pub fn serialize_date<Tz: TimeZone>(date: &DateTime<Tz>) -> Bytes {
    let millis = date.timestamp_millis() as u64;
    serialize_big_int(&BigUint::from(millis), DATE_WIDTH)
}

pub fn deserialize_date(buf: &[u8], offset: usize) -> Result<Decoded<DateTime<Utc>>, DecodeError> {
    let millis = i64::from_be_bytes(take_array::<DATE_WIDTH>(buf, offset)?);
    let date =
        DateTime::from_timestamp_millis(millis).ok_or(DecodeError::InvalidTimestamp(millis))?;
    Ok(Decoded::new(date, DATE_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};

    fn pow2(bits: usize) -> BigUint {
        BigUint::one() << bits
    }

    #[test]
    fn big_int_round_trips() {
        let max = pow2(256) - 1u8;
        let samples = [
            BigUint::zero(),
            BigUint::one(),
            BigUint::from(0xdead_beefu32),
            pow2(128) + 7u8,
            pow2(255),
            max.clone(),
        ];
        for n in samples {
            let buf = serialize_big_int(&n, 32);
            assert_eq!(buf.len(), 32);
            assert_eq!(deserialize_big_int(&buf, 0, 32).unwrap(), Decoded::new(n, 32));
        }
        assert_eq!(&serialize_big_int_default(&max)[..], &[0xff; 32]);
    }

    #[test]
    fn big_int_layout_is_big_endian() {
        let buf = serialize_big_int(&BigUint::from(0x0102u16), 4);
        assert_eq!(&buf[..], &[0, 0, 1, 2]);
    }

    #[test]
    fn big_int_drops_bits_above_the_width() {
        let n = pow2(40) + 0x0304u16;
        assert_eq!(&serialize_big_int(&n, 2)[..], &[3, 4]);
        assert!(serialize_big_int(&n, 0).is_empty());
    }

    #[test]
    fn big_int_reads_at_offset() {
        let buf = [0xaa, 0, 0, 1, 0];
        assert_eq!(
            deserialize_big_int(&buf, 1, 4).unwrap(),
            Decoded::new(BigUint::from(256u32), 4)
        );
        assert!(deserialize_big_int(&buf, 2, 4).is_err());
    }

    #[test]
    fn date_matches_width_8_big_int() {
        let date = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let expected = serialize_big_int(&BigUint::from(1_700_000_000_000u64), 8);
        assert_eq!(serialize_date(&date), expected);
        assert_eq!(&expected[..], &[0, 0, 0x01, 0x8b, 0xcf, 0xe5, 0x68, 0x00]);
        assert_eq!(deserialize_date(&expected, 0).unwrap(), Decoded::new(date, 8));
    }

    #[test]
    fn pre_epoch_dates_use_twos_complement() {
        let date = DateTime::from_timestamp_millis(-1).unwrap();
        let buf = serialize_date(&date);
        assert_eq!(&buf[..], &[0xff; 8]);
        assert_eq!(deserialize_date(&buf, 0).unwrap().elem, date);
    }

    #[test]
    fn out_of_range_timestamps_are_rejected() {
        let buf = i64::MAX.to_be_bytes();
        assert_eq!(
            deserialize_date(&buf, 0),
            Err(DecodeError::InvalidTimestamp(i64::MAX))
        );
    }
}
