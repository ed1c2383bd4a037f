//! Which chunk types the codec knows, where they go, and how often they may
//! appear.

use super::*;

/// Sequence bands. Chunks are written in ascending band order, and chunks in
/// the same band keep the order they were planned in.
pub mod band {
  pub const HEADER: u8 = 0;
  /// `cHRM`, `gAMA`, `iCCP`, `sBIT`, `sRGB`
  pub const COLOR_SPACE: u8 = 10;
  pub const PALETTE: u8 = 20;
  /// `tRNS`, `bKGD`, `hIST`
  pub const PALETTE_DEPENDENT: u8 = 30;
  /// `pHYs`, `sPLT`
  pub const MISC: u8 = 40;
  /// `tIME`, `tEXt`, `zTXt`, `iTXt`
  pub const TEXT: u8 = 50;
  /// Chunks the codec doesn't understand, and custom chunks by default.
  pub const UNKNOWN: u8 = 60;
  pub const IMAGE_DATA: u8 = 80;
  pub const END: u8 = 100;
}

/// Which codec handles a chunk type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub enum ChunkKind {
  IHDR,
  PLTE,
  IDAT,
  IEND,
  tRNS,
  gAMA,
  cHRM,
  sRGB,
  iCCP,
  tEXt,
  zTXt,
  iTXt,
  bKGD,
  hIST,
  pHYs,
  sBIT,
  sPLT,
  tIME,
  /// Kept as raw bytes ([`UnknownChunk`]).
  Custom,
}

/// Registry entry for one chunk type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkDescriptor {
  pub ty: ChunkTy,
  pub kind: ChunkKind,
  /// See [`band`].
  pub sequence: u8,
  /// If a second instance is a duplicate.
  pub once_only: bool,
}

/// The set of chunk types a [`Decoder`] or [`Encoder`] knows.
///
/// The standard registry covers every chunk type of the PNG spec except the
/// animation and EXIF extensions. Other types can be added with
/// [`register_custom`](Self::register_custom) so that they are kept (even if
/// critical) and written back in the chosen band.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkRegistry {
  descriptors: Vec<ChunkDescriptor>,
}
impl Default for ChunkRegistry {
  #[inline]
  fn default() -> Self {
    Self::standard()
  }
}
impl ChunkRegistry {
  /// The standard chunk types.
  ///
  /// Listed in the order they're planned when encoding, which matters within
  /// a band and for `tRNS`, `bKGD`, and `hIST` needing to see `PLTE`.
  #[must_use]
  pub fn standard() -> Self {
    use band::*;
    let d = |ty, kind, sequence, once_only| ChunkDescriptor { ty, kind, sequence, once_only };
    Self {
      descriptors: vec![
        d(ChunkTy::IHDR, ChunkKind::IHDR, HEADER, true),
        d(ChunkTy::cHRM, ChunkKind::cHRM, COLOR_SPACE, true),
        d(ChunkTy::gAMA, ChunkKind::gAMA, COLOR_SPACE, true),
        d(ChunkTy::iCCP, ChunkKind::iCCP, COLOR_SPACE, true),
        d(ChunkTy::sBIT, ChunkKind::sBIT, COLOR_SPACE, true),
        d(ChunkTy::sRGB, ChunkKind::sRGB, COLOR_SPACE, true),
        d(ChunkTy::PLTE, ChunkKind::PLTE, PALETTE, true),
        d(ChunkTy::tRNS, ChunkKind::tRNS, PALETTE_DEPENDENT, true),
        d(ChunkTy::bKGD, ChunkKind::bKGD, PALETTE_DEPENDENT, true),
        d(ChunkTy::hIST, ChunkKind::hIST, PALETTE_DEPENDENT, true),
        d(ChunkTy::pHYs, ChunkKind::pHYs, MISC, true),
        d(ChunkTy::sPLT, ChunkKind::sPLT, MISC, false),
        d(ChunkTy::tIME, ChunkKind::tIME, TEXT, true),
        d(ChunkTy::tEXt, ChunkKind::tEXt, TEXT, false),
        d(ChunkTy::zTXt, ChunkKind::zTXt, TEXT, false),
        d(ChunkTy::iTXt, ChunkKind::iTXt, TEXT, false),
        d(ChunkTy::IDAT, ChunkKind::IDAT, IMAGE_DATA, false),
        d(ChunkTy::IEND, ChunkKind::IEND, END, true),
      ],
    }
  }

  /// Adds a chunk type that's kept as raw bytes.
  ///
  /// ## Failure
  /// * The type isn't four ASCII letters, or is already registered.
  /// * The sequence would put it before `IHDR` or at/after `IDAT`.
  pub fn register_custom(&mut self, ty: ChunkTy, sequence: u8, once_only: bool) -> PngResult<()> {
    if !ty.is_valid() {
      return Err(PngError::InvalidArgument("chunk types are four ASCII letters"));
    }
    if self.get(ty).is_some() {
      return Err(PngError::InvalidArgument("chunk type is already registered"));
    }
    if sequence <= band::HEADER || sequence >= band::IMAGE_DATA {
      return Err(PngError::InvalidArgument("custom chunks go between IHDR and IDAT"));
    }
    log::debug!("registered custom chunk {ty} at sequence {sequence}");
    self.descriptors.push(ChunkDescriptor { ty, kind: ChunkKind::Custom, sequence, once_only });
    Ok(())
  }

  #[inline]
  #[must_use]
  pub fn get(&self, ty: ChunkTy) -> Option<&ChunkDescriptor> {
    self.descriptors.iter().find(|d| d.ty == ty)
  }

  /// Band of a type, unregistered types are in [`band::UNKNOWN`].
  #[inline]
  #[must_use]
  pub fn sequence(&self, ty: ChunkTy) -> u8 {
    self.get(ty).map_or(band::UNKNOWN, |d| d.sequence)
  }

  #[inline]
  #[must_use]
  pub fn is_once_only(&self, ty: ChunkTy) -> bool {
    self.get(ty).is_some_and(|d| d.once_only)
  }

  /// All descriptors, in registration order.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &ChunkDescriptor> {
    self.descriptors.iter()
  }

  /// Stable sort by band.
  pub fn sort_chunks(&self, chunks: &mut [PngChunk]) {
    chunks.sort_by_key(|c| self.sequence(c.ty()));
  }
}

#[test]
fn test_registry_bands() {
  let mut reg = ChunkRegistry::standard();
  assert_eq!(reg.sequence(ChunkTy::IHDR), band::HEADER);
  assert_eq!(reg.sequence(ChunkTy::tRNS), band::PALETTE_DEPENDENT);
  assert_eq!(reg.sequence(ChunkTy(*b"prVt")), band::UNKNOWN);
  assert!(reg.is_once_only(ChunkTy::gAMA));
  assert!(!reg.is_once_only(ChunkTy::tEXt));
  assert!(!reg.is_once_only(ChunkTy::IDAT));

  let custom = ChunkTy(*b"abCd");
  reg.register_custom(custom, 45, true).unwrap();
  assert_eq!(reg.sequence(custom), 45);
  assert_eq!(reg.get(custom).map(|d| d.kind), Some(ChunkKind::Custom));
  assert!(reg.register_custom(custom, 45, true).is_err());
  assert!(reg.register_custom(ChunkTy(*b"zzZz"), 90, false).is_err());
  assert!(reg.register_custom(ChunkTy(*b"zz1z"), 45, false).is_err());
}
