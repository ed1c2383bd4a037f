use core::{
  fmt::{self, Display},
  num::TryFromIntError,
  str::Utf8Error,
};

use crate::png::ChunkTy;

/// Shorthand for results with a [`PngError`].
pub type PngResult<T> = Result<T, PngError>;

/// Why an image header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderError {
  /// The header payload wasn't exactly 13 bytes.
  Length(usize),
  /// Width or height was 0.
  ZeroDimension,
  /// Bit depth wasn't 1, 2, 4, 8, or 16.
  BitDepth(u8),
  /// Color type wasn't 0, 2, 3, 4, or 6.
  ColorType(u8),
  /// The bit depth isn't allowed with this color type.
  DepthColorCombination { bit_depth: u8, color_type: u8 },
  /// Compression method wasn't 0.
  CompressionMethod(u8),
  /// Filter method wasn't 0.
  FilterMethod(u8),
  /// Interlace method wasn't 0 or 1.
  InterlaceMethod(u8),
}

/// An error from the `pngkit` crate.
///
/// Every fatal condition aborts the whole decode or encode call. Conditions
/// that are tolerated (outside of strict mode) never show up as an error,
/// they're recorded in the volatile half of the decoded metadata instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PngError {
  /// The first 8 bytes aren't the PNG signature.
  Signature,

  /// A chunk claims more bytes than the stream holds.
  UnexpectedEnd { offset: usize },

  /// The stored CRC of a chunk doesn't match its computed CRC.
  CrcMismatch { ty: ChunkTy, offset: usize, declared: u32, actual: u32 },

  /// The image header is invalid.
  Header(HeaderError),

  /// A required chunk never showed up.
  MissingChunk { ty: ChunkTy },

  /// A chunk appeared somewhere it isn't allowed to be.
  ChunkOrder { ty: ChunkTy, offset: usize, reason: &'static str },

  /// A chunk that may only appear once appeared again.
  DuplicateChunk { ty: ChunkTy, offset: usize },

  /// A critical chunk that this decoder doesn't know how to handle.
  UnknownCriticalChunk { ty: ChunkTy, offset: usize },

  /// The payload of a chunk doesn't follow the rules for its type.
  InvalidChunk { ty: ChunkTy, offset: usize, reason: &'static str },

  /// A scanline started with a filter type other than 0 through 4.
  IllegalFilterType { filter_type: u8, pass: usize, line: usize },

  /// Compressing data failed.
  Compression,

  /// The zlib stream is truncated or corrupt.
  Decompression,

  /// A zlib stream decompresses to more than the allowed number of bytes.
  InflateLimit { limit: usize },

  /// The decompressed image data is shorter than the header requires.
  NotEnoughImageData { expected: usize, actual: usize },

  /// The decompressed image data is longer than the header requires.
  TooMuchImageData { expected: usize },

  /// There are bytes after the `IEND` chunk.
  TrailingData { offset: usize, len: usize },

  /// An indexed pixel refers past the end of the palette.
  PaletteIndex { index: u8, palette_len: usize },

  /// A pixel's color isn't in the palette used for indexed encoding.
  PaletteLookup { x: u32, y: u32, rgba: [u8; 4] },

  /// The image has more distinct colors than the indexed bit depth allows.
  PaletteTooLarge { colors: usize, max: usize },

  /// A caller supplied value is outside of its valid domain.
  InvalidArgument(&'static str),

  /// The allocator couldn't give us enough space.
  Alloc,

  /// A checked math operation failed.
  CheckedMath,
}
impl From<HeaderError> for PngError {
  #[inline]
  fn from(e: HeaderError) -> Self {
    Self::Header(e)
  }
}
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<Utf8Error> for PngError {
  #[inline]
  fn from(_: Utf8Error) -> Self {
    Self::InvalidArgument("text is not valid UTF-8")
  }
}
impl From<TryFromIntError> for PngError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::CheckedMath
  }
}

impl Display for HeaderError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Length(len) => write!(f, "header length is {len}, must be 13"),
      Self::ZeroDimension => write!(f, "width and height must be non-zero"),
      Self::BitDepth(d) => write!(f, "illegal bit depth {d}"),
      Self::ColorType(c) => write!(f, "illegal color type {c}"),
      Self::DepthColorCombination { bit_depth, color_type } => {
        write!(f, "bit depth {bit_depth} is not allowed with color type {color_type}")
      }
      Self::CompressionMethod(m) => write!(f, "unknown compression method {m}"),
      Self::FilterMethod(m) => write!(f, "unknown filter method {m}"),
      Self::InterlaceMethod(m) => write!(f, "unknown interlace method {m}"),
    }
  }
}

impl Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Signature => write!(f, "not a PNG signature"),
      Self::UnexpectedEnd { offset } => write!(f, "unexpected end of data at byte {offset}"),
      Self::CrcMismatch { ty, offset, declared, actual } => write!(
        f,
        "{ty} chunk at byte {offset}: CRC mismatch (declared {declared:08X}, actual {actual:08X})"
      ),
      Self::Header(e) => write!(f, "invalid IHDR: {e}"),
      Self::MissingChunk { ty } => write!(f, "missing required {ty} chunk"),
      Self::ChunkOrder { ty, offset, reason } => {
        write!(f, "{ty} chunk at byte {offset}: {reason}")
      }
      Self::DuplicateChunk { ty, offset } => {
        write!(f, "{ty} chunk at byte {offset} may only appear once")
      }
      Self::UnknownCriticalChunk { ty, offset } => {
        write!(f, "unknown critical chunk {ty} at byte {offset}")
      }
      Self::InvalidChunk { ty, offset, reason } => {
        write!(f, "{ty} chunk at byte {offset}: {reason}")
      }
      Self::IllegalFilterType { filter_type, pass, line } => {
        write!(f, "illegal filter type {filter_type} (pass {pass}, line {line})")
      }
      Self::Compression => write!(f, "zlib compression failed"),
      Self::Decompression => write!(f, "zlib data is truncated or corrupt"),
      Self::InflateLimit { limit } => write!(f, "zlib data inflates past {limit} bytes"),
      Self::NotEnoughImageData { expected, actual } => {
        write!(f, "image data has {actual} bytes, expected {expected}")
      }
      Self::TooMuchImageData { expected } => {
        write!(f, "image data has more than the expected {expected} bytes")
      }
      Self::TrailingData { offset, len } => write!(f, "{len} bytes after IEND at byte {offset}"),
      Self::PaletteIndex { index, palette_len } => {
        write!(f, "palette index {index} is out of range for a palette of {palette_len}")
      }
      Self::PaletteLookup { x, y, rgba } => {
        write!(f, "color {rgba:?} at ({x},{y}) is not in the palette")
      }
      Self::PaletteTooLarge { colors, max } => {
        write!(f, "image has {colors} colors, at most {max} fit the palette")
      }
      Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
      Self::Alloc => write!(f, "allocation failed"),
      Self::CheckedMath => write!(f, "arithmetic overflow"),
    }
  }
}

impl core::error::Error for PngError {}
