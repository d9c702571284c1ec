use std::fmt::Write;

use bytes::{BufMut, Bytes, BytesMut};

mod reader;
pub use reader::ByteReader;

/// Joins `buffers` end to end.
pub fn concatenate_buffers<B: AsRef<[u8]>>(buffers: &[B]) -> Bytes {
    let total_len = buffers.iter().map(|b| b.as_ref().len()).sum();
    let mut result = BytesMut::with_capacity(total_len);
    for buffer in buffers {
        result.put_slice(buffer.as_ref());
    }
    result.freeze()
}

/// Lowercase hex, two characters per byte, no separator.
pub fn to_hex_string(buf: &[u8]) -> String {
    buf.iter()
        .fold(String::with_capacity(buf.len() * 2), |mut acc, byte| {
            // writing into a String cannot fail
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
