//! Little-endian wire primitives shared by the value kinds and the map codec.
//!
//! Every variable-length field on the wire is a `u32` length followed by that
//! many bytes. A value payload uses the same framing: `u32` size, then the
//! body, so a reader can always skip a payload it does not understand.

use std::io::{Read, Write};

use crate::error::{ValueError, ValueResult};

/// Width of every length prefix and of the map entry count.
pub const LEN_PREFIX_SIZE: usize = 4;

/// Write a `u32` in little-endian order.
pub fn write_u32<W: Write + ?Sized>(w: &mut W, value: u32) -> ValueResult<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Read a little-endian `u32`.
pub fn read_u32<R: Read + ?Sized>(r: &mut R) -> ValueResult<u32> {
    let mut buf = [0u8; LEN_PREFIX_SIZE];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Convert a buffer length to the `u32` used on the wire.
pub fn wire_len(len: usize) -> ValueResult<u32> {
    u32::try_from(len)
        .map_err(|_| ValueError::Serialization(format!("length {len} does not fit in u32")))
}

/// Write a length-prefixed byte string.
pub fn write_bytes<W: Write + ?Sized>(w: &mut W, bytes: &[u8]) -> ValueResult<()> {
    write_u32(w, wire_len(bytes.len())?)?;
    w.write_all(bytes)?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string.
pub fn write_string<W: Write + ?Sized>(w: &mut W, s: &str) -> ValueResult<()> {
    write_bytes(w, s.as_bytes())
}

/// Read exactly `len` bytes.
///
/// The buffer grows with the data actually read, so a corrupt length cannot
/// force a huge up-front allocation.
pub fn read_exact_vec<R: Read + ?Sized>(r: &mut R, len: u32) -> ValueResult<Vec<u8>> {
    let mut buf = Vec::new();
    (&mut *r).take(u64::from(len)).read_to_end(&mut buf)?;
    if buf.len() != len as usize {
        return Err(ValueError::malformed(format!(
            "truncated field: expected {len} bytes, got {}",
            buf.len()
        )));
    }
    Ok(buf)
}

/// Read a length-prefixed UTF-8 string.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> ValueResult<String> {
    let len = read_u32(r)?;
    let bytes = read_exact_vec(r, len)?;
    decode_utf8(bytes)
}

/// Decode UTF-8, reporting invalid data as a malformed stream.
pub fn decode_utf8(bytes: Vec<u8>) -> ValueResult<String> {
    String::from_utf8(bytes).map_err(|e| ValueError::malformed(format!("invalid UTF-8: {e}")))
}
