#![forbid(unsafe_code)]

//! A position tracking byte buffer.
//!
//! Reading borrows the source bytes, the first write turns the buffer into an
//! owned, growable one. All multi-byte integer reads and writes come in both
//! big-endian (what PNG uses) and little-endian flavors.

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::ops::Range;

use crate::{PngError, PngResult};

/// A byte buffer with a read/write position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor<'b> {
  data: Cow<'b, [u8]>,
  pos: usize,
}

impl<'b> From<&'b [u8]> for ByteCursor<'b> {
  #[inline]
  #[must_use]
  fn from(bytes: &'b [u8]) -> Self {
    Self { data: Cow::Borrowed(bytes), pos: 0 }
  }
}
impl From<Vec<u8>> for ByteCursor<'static> {
  #[inline]
  #[must_use]
  fn from(bytes: Vec<u8>) -> Self {
    Self { data: Cow::Owned(bytes), pos: 0 }
  }
}

impl<'b> ByteCursor<'b> {
  /// A new, empty, owned buffer.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { data: Cow::Owned(Vec::new()), pos: 0 }
  }

  /// The current position.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.pos
  }

  /// Moves the position. Moving past the end is an error.
  #[inline]
  pub fn seek(&mut self, pos: usize) -> PngResult<()> {
    if pos > self.data.len() {
      return Err(PngError::UnexpectedEnd { offset: pos });
    }
    self.pos = pos;
    Ok(())
  }

  /// Advances the position without looking at the bytes.
  #[inline]
  pub fn skip(&mut self, count: usize) -> PngResult<()> {
    let pos = self.pos.checked_add(count).ok_or(PngError::CheckedMath)?;
    self.seek(pos)
  }

  /// Total length of the buffer.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Bytes left between the position and the end.
  #[inline]
  #[must_use]
  pub fn remaining(&self) -> usize {
    self.data.len().saturating_sub(self.pos)
  }

  /// The whole buffer.
  #[inline]
  #[must_use]
  pub fn as_slice(&self) -> &[u8] {
    &self.data
  }

  /// A sub-range of the buffer, independent of the position.
  #[inline]
  pub fn slice(&self, range: Range<usize>) -> PngResult<&[u8]> {
    let end = range.end;
    self.data.get(range).ok_or(PngError::UnexpectedEnd { offset: end })
  }

  /// Takes the buffer out as an owned vec.
  #[inline]
  #[must_use]
  pub fn into_vec(self) -> Vec<u8> {
    self.data.into_owned()
  }

  /// Reads `count` bytes, advancing the position.
  #[inline]
  pub fn read_bytes(&mut self, count: usize) -> PngResult<&[u8]> {
    let start = self.pos;
    let end = start.checked_add(count).ok_or(PngError::CheckedMath)?;
    if end > self.data.len() {
      return Err(PngError::UnexpectedEnd { offset: start });
    }
    self.pos = end;
    Ok(&self.data[start..end])
  }

  /// Reads all bytes up to the end of the buffer.
  #[inline]
  pub fn read_to_end(&mut self) -> &[u8] {
    let start = self.pos.min(self.data.len());
    self.pos = self.data.len();
    &self.data[start..]
  }

  #[inline]
  pub fn read_array<const N: usize>(&mut self) -> PngResult<[u8; N]> {
    let mut a = [0_u8; N];
    a.copy_from_slice(self.read_bytes(N)?);
    Ok(a)
  }

  #[inline]
  pub fn read_u8(&mut self) -> PngResult<u8> {
    Ok(self.read_array::<1>()?[0])
  }

  #[inline]
  pub fn read_u16_be(&mut self) -> PngResult<u16> {
    self.read_array().map(u16::from_be_bytes)
  }

  #[inline]
  pub fn read_u16_le(&mut self) -> PngResult<u16> {
    self.read_array().map(u16::from_le_bytes)
  }

  #[inline]
  pub fn read_u32_be(&mut self) -> PngResult<u32> {
    self.read_array().map(u32::from_be_bytes)
  }

  #[inline]
  pub fn read_u32_le(&mut self) -> PngResult<u32> {
    self.read_array().map(u32::from_le_bytes)
  }

  #[inline]
  pub fn read_i32_be(&mut self) -> PngResult<i32> {
    self.read_array().map(i32::from_be_bytes)
  }

  /// Reads bytes up to (not including) the next null byte, then steps past
  /// the null.
  ///
  /// At most `limit` bytes are examined. Fails if no null is found in range.
  pub fn read_until_nul(&mut self, limit: usize) -> PngResult<&[u8]> {
    let start = self.pos;
    let window = &self.data[start.min(self.data.len())..];
    let window = &window[..window.len().min(limit.saturating_add(1))];
    match window.iter().position(|&b| b == 0) {
      Some(len) => {
        self.pos = start + len + 1;
        Ok(&self.data[start..start + len])
      }
      None => Err(PngError::UnexpectedEnd { offset: start + window.len() }),
    }
  }

  /// Reads `count` bytes as Latin-1 text.
  #[inline]
  pub fn read_latin1(&mut self, count: usize) -> PngResult<String> {
    self.read_bytes(count).map(latin1_to_string)
  }

  /// Reads `count` bytes as UTF-8 text.
  #[inline]
  pub fn read_utf8(&mut self, count: usize) -> PngResult<String> {
    let bytes = self.read_bytes(count)?;
    Ok(String::from(core::str::from_utf8(bytes)?))
  }

  /// Writes bytes at the position, overwriting existing bytes and growing the
  /// buffer as needed.
  pub fn write_bytes(&mut self, bytes: &[u8]) {
    let pos = self.pos;
    let buf = self.data.to_mut();
    let overlap = buf.len().saturating_sub(pos).min(bytes.len());
    buf[pos..pos + overlap].copy_from_slice(&bytes[..overlap]);
    buf.extend_from_slice(&bytes[overlap..]);
    self.pos = pos + bytes.len();
  }

  #[inline]
  pub fn write_u8(&mut self, u: u8) {
    self.write_bytes(&[u])
  }

  #[inline]
  pub fn write_u16_be(&mut self, u: u16) {
    self.write_bytes(&u.to_be_bytes())
  }

  #[inline]
  pub fn write_u16_le(&mut self, u: u16) {
    self.write_bytes(&u.to_le_bytes())
  }

  #[inline]
  pub fn write_u32_be(&mut self, u: u32) {
    self.write_bytes(&u.to_be_bytes())
  }

  #[inline]
  pub fn write_u32_le(&mut self, u: u32) {
    self.write_bytes(&u.to_le_bytes())
  }

  #[inline]
  pub fn write_i32_be(&mut self, i: i32) {
    self.write_bytes(&i.to_be_bytes())
  }

  /// Writes text as Latin-1, failing on characters outside of U+0000 to
  /// U+00FF.
  pub fn write_latin1(&mut self, text: &str) -> PngResult<()> {
    let bytes = string_to_latin1(text)?;
    self.write_bytes(&bytes);
    Ok(())
  }

  /// Writes text as UTF-8.
  #[inline]
  pub fn write_utf8(&mut self, text: &str) {
    self.write_bytes(text.as_bytes())
  }

  /// Overwrites a big-endian `u32` at some earlier position, leaving the
  /// position alone.
  pub fn patch_u32_be(&mut self, at: usize, u: u32) -> PngResult<()> {
    let end = at.checked_add(4).ok_or(PngError::CheckedMath)?;
    let buf = self.data.to_mut();
    match buf.get_mut(at..end) {
      Some(dst) => {
        dst.copy_from_slice(&u.to_be_bytes());
        Ok(())
      }
      None => Err(PngError::UnexpectedEnd { offset: at }),
    }
  }
}

/// Every Latin-1 byte is the code point of the same value.
#[inline]
#[must_use]
pub fn latin1_to_string(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| b as char).collect()
}

/// Converts text to Latin-1 bytes.
pub fn string_to_latin1(text: &str) -> PngResult<Vec<u8>> {
  text
    .chars()
    .map(|c| u8::try_from(u32::from(c)).map_err(|_| PngError::InvalidArgument("text is not Latin-1")))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec;

  #[test]
  fn test_read_ints_both_endians() {
    let bytes = [0x12, 0x34, 0x56, 0x78, 0x9A];
    let mut c = ByteCursor::from(&bytes[..]);
    assert_eq!(c.read_u16_be().unwrap(), 0x1234);
    assert_eq!(c.read_u16_le().unwrap(), 0x7856);
    assert_eq!(c.position(), 4);
    assert_eq!(c.read_u32_be(), Err(PngError::UnexpectedEnd { offset: 4 }));
    // a failed read doesn't move the position
    assert_eq!(c.read_u8().unwrap(), 0x9A);
    assert_eq!(c.remaining(), 0);
  }

  #[test]
  fn test_read_until_nul() {
    let bytes = b"Title\0Hello";
    let mut c = ByteCursor::from(&bytes[..]);
    assert_eq!(c.read_until_nul(79).unwrap(), b"Title");
    assert_eq!(c.read_to_end(), b"Hello");

    let mut c = ByteCursor::from(&bytes[..]);
    assert!(c.read_until_nul(3).is_err());
    assert_eq!(c.position(), 0);
  }

  #[test]
  fn test_write_grows_and_overwrites() {
    let mut c = ByteCursor::new();
    c.write_u32_be(0);
    c.write_bytes(b"IEND");
    c.patch_u32_be(0, 0xDEAD_BEEF).unwrap();
    assert_eq!(c.position(), 8);
    c.seek(2).unwrap();
    c.write_u16_le(0x0102);
    assert_eq!(c.into_vec(), vec![0xDE, 0xAD, 0x02, 0x01, b'I', b'E', b'N', b'D']);
  }

  #[test]
  fn test_latin1() {
    let mut c = ByteCursor::new();
    c.write_latin1("caf\u{E9}").unwrap();
    assert_eq!(c.as_slice(), &[b'c', b'a', b'f', 0xE9]);
    assert!(c.write_latin1("\u{263A}").is_err());
    c.seek(0).unwrap();
    assert_eq!(c.read_latin1(4).unwrap(), "caf\u{E9}");
  }
}
