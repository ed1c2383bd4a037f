use super::*;

/// A chunk type identifier.
///
/// Four ASCII letters. Bit 5 (`0x20`, the "lowercase" bit) of each letter is a
/// property flag:
/// * byte 0: uppercase is critical, lowercase is ancillary.
/// * byte 1: uppercase is public, lowercase is private.
/// * byte 2: reserved, must be uppercase.
/// * byte 3: uppercase is unsafe to copy, lowercase is safe to copy.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkTy(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkTy {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const cHRM: Self = Self(*b"cHRM");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const iCCP: Self = Self(*b"iCCP");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const zTXt: Self = Self(*b"zTXt");
  pub const iTXt: Self = Self(*b"iTXt");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const hIST: Self = Self(*b"hIST");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sBIT: Self = Self(*b"sBIT");
  pub const sPLT: Self = Self(*b"sPLT");
  pub const tIME: Self = Self(*b"tIME");
}
impl ChunkTy {
  const PROPERTY_BIT: u8 = 0x20;

  /// The identifier as a big-endian number, eg: `IHDR` is `0x49484452`.
  #[inline]
  #[must_use]
  pub const fn to_u32(self) -> u32 {
    u32::from_be_bytes(self.0)
  }

  /// If all four bytes are ASCII letters.
  #[inline]
  #[must_use]
  pub const fn is_valid(self) -> bool {
    self.0[0].is_ascii_alphabetic()
      && self.0[1].is_ascii_alphabetic()
      && self.0[2].is_ascii_alphabetic()
      && self.0[3].is_ascii_alphabetic()
  }

  /// Critical chunks must be understood to display the image.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & Self::PROPERTY_BIT) == 0
  }

  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    !self.is_critical()
  }

  /// Public chunks are defined by the PNG spec (or registered with it).
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    (self.0[1] & Self::PROPERTY_BIT) == 0
  }

  #[inline]
  #[must_use]
  pub const fn is_private(self) -> bool {
    !self.is_public()
  }

  /// The reserved bit should always be clear in current PNG files.
  #[inline]
  #[must_use]
  pub const fn is_reserved_bit_clear(self) -> bool {
    (self.0[2] & Self::PROPERTY_BIT) == 0
  }

  /// Editors that don't understand a safe-to-copy chunk may still copy it
  /// into a modified image.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & Self::PROPERTY_BIT) != 0
  }
}
impl From<[u8; 4]> for ChunkTy {
  #[inline]
  #[must_use]
  fn from(bytes: [u8; 4]) -> Self {
    Self(bytes)
  }
}
impl Debug for ChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('\"')?;
    Display::fmt(self, f)?;
    f.write_char('\"')
  }
}
impl Display for ChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

#[test]
fn test_chunk_ty_flags() {
  assert_eq!(ChunkTy::IHDR.to_u32(), 0x4948_4452);
  assert_eq!(ChunkTy::IEND.to_u32(), 0x4945_4E44);
  assert!(ChunkTy::IHDR.is_critical());
  assert!(ChunkTy::IHDR.is_public());
  assert!(!ChunkTy::IHDR.is_safe_to_copy());
  assert!(ChunkTy::tEXt.is_ancillary());
  assert!(ChunkTy::tEXt.is_safe_to_copy());
  assert!(!ChunkTy::tRNS.is_safe_to_copy());
  let private = ChunkTy(*b"prVt");
  assert!(private.is_ancillary());
  assert!(private.is_private());
  assert!(private.is_safe_to_copy());
  assert!(private.is_valid());
  assert!(!ChunkTy(*b"a1cd").is_valid());
}
