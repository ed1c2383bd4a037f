//! The metadata that travels alongside the pixels.
//!
//! [`PngData`] has two halves:
//! * [`PersistentData`] survives a decode/encode round trip. Hand it to the
//!   encoder (through [`EncodeOptions::data`]) and the same information is
//!   written back out.
//! * [`VolatileData`] is decode-only: header echo, per-kind text lists,
//!   chunks that can't be safely copied, and everything the decoder tolerated
//!   instead of failing.
//!
//! Colors are stored in the canonical 8-bit space, the same space as the
//! decoded pixels, so they make sense no matter what pixel format the PNG
//! used (and they can be written to any other pixel format).

use super::*;

/// All decoded metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PngData {
  pub persistent: PersistentData,
  pub volatile: VolatileData,
}

/// Metadata that is re-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistentData {
  /// `bKGD`: color to present the image against.
  pub background_color: Option<RGB8>,
  /// `cHRM`: primary chromaticities and white point.
  pub chromaticities: Option<Chromaticities>,
  /// `gAMA`: image gamma times 100,000.
  pub gamma: Option<u32>,
  /// `hIST`: approximate usage frequency of each palette entry.
  pub histogram: Option<Vec<u16>>,
  /// `pHYs`: intended pixel size or aspect ratio.
  pub physical_dimensions: Option<PhysicalDimensions>,
  /// `tEXt`, `zTXt`, and `iTXt`, in stream order.
  pub texts: Vec<TextEntry>,
  /// `tIME`: last modification time.
  pub modification_time: Option<Timestamp>,
  /// `iCCP`: embedded ICC profile (decompressed).
  pub icc_profile: Option<IccProfile>,
  /// `tRNS`: simple transparency.
  pub transparency: Option<Transparency>,
  /// `sBIT`: significant bits of the original data.
  pub significant_bits: Option<SignificantBits>,
  /// `sPLT`: suggested palettes.
  pub suggested_palettes: Vec<SuggestedPalette>,
  /// Chunks the codec doesn't understand but may copy (plus any registered
  /// custom chunks), kept verbatim.
  pub unknown_chunks: Vec<UnknownChunk>,
}

/// Decode-only metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolatileData {
  /// `IHDR`, as decoded.
  pub header: Option<IHDR>,
  /// `PLTE` entries, empty if there was no palette.
  pub palette: Vec<RGB8>,
  /// `tEXt` entries.
  pub texts: Vec<TextEntry>,
  /// `zTXt` entries.
  pub compressed_texts: Vec<TextEntry>,
  /// `iTXt` entries.
  pub international_texts: Vec<TextEntry>,
  /// `sRGB`: rendering intent.
  pub rendering_intent: Option<SrgbIntent>,
  /// Ancillary chunks the codec doesn't understand and which are not safe
  /// to copy. These are never re-encoded.
  pub unsafe_chunks: Vec<UnknownChunk>,
  /// Problems the decoder worked around instead of failing.
  pub tolerated: Vec<Tolerated>,
}

/// `cHRM` values, each 100,000 times the real value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Chromaticities {
  pub white_x: u32,
  pub white_y: u32,
  pub red_x: u32,
  pub red_y: u32,
  pub green_x: u32,
  pub green_y: u32,
  pub blue_x: u32,
  pub blue_y: u32,
}

/// Unit for [`PhysicalDimensions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PhysicalUnit {
  /// Only the aspect ratio is known.
  #[default]
  Unknown,
  /// Pixels per meter.
  Meter,
}

/// `pHYs` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PhysicalDimensions {
  pub pixels_per_unit_x: u32,
  pub pixels_per_unit_y: u32,
  pub unit: PhysicalUnit,
}

/// Which kind of text chunk a [`TextEntry`] came from (or goes into).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextKind {
  /// `tEXt`: uncompressed Latin-1.
  Plain,
  /// `zTXt`: compressed Latin-1.
  Compressed,
  /// `iTXt`: UTF-8, optionally compressed, with language info.
  International { compressed: bool, language: String, translated_keyword: String },
}

/// One key/value text pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEntry {
  pub keyword: String,
  pub text: String,
  pub kind: TextKind,
}
impl TextEntry {
  /// A `tEXt` entry.
  #[inline]
  #[must_use]
  pub fn plain(keyword: &str, text: &str) -> Self {
    Self { keyword: String::from(keyword), text: String::from(text), kind: TextKind::Plain }
  }
}

/// `tIME` values (UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Timestamp {
  pub year: u16,
  pub month: u8,
  pub day: u8,
  pub hour: u8,
  pub minute: u8,
  pub second: u8,
}

/// `iCCP` values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IccProfile {
  /// Latin-1 name, 1 to 79 bytes.
  pub name: String,
  /// The decompressed profile.
  pub profile: Vec<u8>,
}

/// `tRNS` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transparency {
  /// Pixels of exactly this color are fully transparent (grayscale and
  /// truecolor images).
  Color(RGB8),
  /// Alpha for each palette entry, missing entries are opaque (indexed
  /// images).
  Alphas(Vec<u8>),
}

/// `sBIT` values, one per channel of the image's color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum SignificantBits {
  Gray { y: u8 },
  Rgb { r: u8, g: u8, b: u8 },
  GrayAlpha { y: u8, a: u8 },
  Rgba { r: u8, g: u8, b: u8, a: u8 },
}

/// One entry of a suggested palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct SuggestedPaletteEntry {
  pub r: u16,
  pub g: u16,
  pub b: u16,
  pub a: u16,
  pub frequency: u16,
}

/// `sPLT` values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SuggestedPalette {
  pub name: String,
  /// 8 or 16, the precision of the entry values.
  pub sample_depth: u8,
  pub entries: Vec<SuggestedPaletteEntry>,
}

/// A chunk kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownChunk {
  pub ty: ChunkTy,
  pub data: Vec<u8>,
}

/// Something the decoder put up with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tolerated {
  pub ty: ChunkTy,
  /// Byte offset of the chunk within the stream.
  pub offset: usize,
  pub issue: ToleratedIssue,
}

/// Kinds of [`Tolerated`] problems.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToleratedIssue {
  /// The chunk was kept even though its CRC is wrong.
  CrcMismatch { declared: u32, actual: u32 },
  /// A second copy of a chunk that may appear only once. It was skipped.
  Duplicate,
  /// The chunk was out of order. It was still used.
  OutOfOrder(&'static str),
  /// The chunk's contents were invalid. It was skipped.
  Invalid(&'static str),
  /// An ancillary chunk of unknown type.
  Unknown,
  /// Bytes after the `IEND` chunk. They were ignored.
  TrailingData { len: usize },
  /// The image data inflates to more than the header needs. The rest of
  /// the stream wasn't decompressed.
  ExtraImageData,
}
