//! The CRC-32 used by PNG (and zlib, and gzip, and a lot of other things).
//!
//! Reflected polynomial `0xEDB88320`, initial value `0xFFFFFFFF`, final XOR
//! `0xFFFFFFFF`. A chunk's CRC covers its type bytes and payload, not the
//! length.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

/// A running CRC-32 accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc32(u32);
impl Default for Crc32 {
  #[inline]
  #[must_use]
  fn default() -> Self {
    Self::new()
  }
}
impl Crc32 {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self(u32::MAX)
  }

  /// Feeds more bytes into the accumulator.
  #[inline]
  pub fn update(&mut self, bytes: &[u8]) {
    let mut crc = self.0;
    for byte in bytes.iter().copied() {
      let i = (crc ^ u32::from(byte)) as u8 as usize;
      crc = CRC_TABLE[i] ^ (crc >> 8);
    }
    self.0 = crc;
  }

  /// The CRC of everything fed in so far.
  #[inline]
  #[must_use]
  pub const fn finish(self) -> u32 {
    self.0 ^ u32::MAX
  }
}

/// CRC of a chunk's type and payload.
#[inline]
#[must_use]
pub fn chunk_crc(ty: [u8; 4], payload: &[u8]) -> u32 {
  let mut crc = Crc32::new();
  crc.update(&ty);
  crc.update(payload);
  crc.finish()
}

#[test]
fn test_crc_known_values() {
  // the standard CRC-32 check value
  let mut crc = Crc32::new();
  crc.update(b"123456789");
  assert_eq!(crc.finish(), 0xCBF4_3926);
  // the CRC of an IEND chunk is the same in every PNG
  assert_eq!(chunk_crc(*b"IEND", &[]), 0xAE42_6082);
}

#[test]
fn test_crc_is_incremental() {
  let mut split = Crc32::new();
  split.update(b"IHDR");
  split.update(&[0, 0, 0, 1]);
  split.update(&[0, 0, 0, 1, 8, 0, 0, 0, 0]);
  assert_eq!(split.finish(), chunk_crc(*b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]));
}
