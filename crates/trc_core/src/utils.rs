use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

pub fn write_u64<W: Write>(w: &mut W, v: u64) -> io::Result<()> { w.write_u64::<LE>(v) }
pub fn write_u32<W: Write>(w: &mut W, v: u32) -> io::Result<()> { w.write_u32::<LE>(v) }
pub fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> { r.read_u64::<LE>() }
pub fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> { r.read_u32::<LE>() }

/// Fill `buf` as far as the stream allows. Returns the number of bytes read,
/// which is less than `buf.len()` only at end of stream.
pub fn read_upto<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        match r.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(k) => n += k,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(n)
}

#[inline]
fn is_padding(b: u8) -> bool { b == b' ' || b == 0 }

/// Decode a fixed-width text field: strip trailing spaces/NULs, keep the rest.
/// Bytes map 1:1 to chars (Latin-1), so nothing is ever lost or replaced.
pub fn trim_fixed(field: &[u8]) -> String {
    let end = field.iter().rposition(|&b| !is_padding(b)).map_or(0, |i| i + 1);
    field[..end].iter().map(|&b| b as char).collect()
}

/// Inverse of `trim_fixed`: one Latin-1 byte per char (`?` outside it),
/// left-aligned, space padded, cut at `size`.
pub fn pad_fixed(s: &str, size: usize) -> Vec<u8> {
    let mut out: Vec<u8> = s
        .chars()
        .take(size)
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .collect();
    out.resize(size, b' ');
    out
}
