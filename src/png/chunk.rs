//! The chunk codec protocol.
//!
//! Every chunk type the codec understands implements [`ChunkCodec`], and
//! [`PngChunk`] holds one parsed instance of any of them.
//!
//! Decoding runs these steps per chunk:
//! 1) `parse` as soon as the chunk is read from the stream.
//! 2) `decode` on the pass images, once all the image data has been read.
//! 3) `post_decode` on the full image, after deinterlacing.
//! 4) `decode_data` to put the chunk's values into [`PngData`].
//!
//! Encoding goes the other way:
//! 1) `encode_data` plans zero or more instances from the options.
//! 2) `pre_encode` on the full image, before interlacing.
//! 3) `encode` on the pass images.
//! 4) `compose` writes the payload.
//!
//! Every step but the first of each direction sees the chunks in stream
//! order, and a chunk can only look at the chunks that came before it.

use super::*;

/// What a chunk can see while it's being decoded.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
  pub ty: ChunkTy,
  /// Offset of the chunk within the stream.
  pub offset: usize,
  pub options: &'a DecodeOptions,
  pub registry: &'a ChunkRegistry,
  /// Chunks earlier in the stream.
  pub seen: ChunkView<'a>,
}
impl<'a> DecodeContext<'a> {
  #[inline]
  #[must_use]
  pub const fn strict(&self) -> bool {
    self.options.strict
  }

  /// An [`PngError::InvalidChunk`] for this chunk.
  #[inline]
  #[must_use]
  pub const fn invalid(&self, reason: &'static str) -> PngError {
    PngError::InvalidChunk { ty: self.ty, offset: self.offset, reason }
  }

  /// An [`PngError::ChunkOrder`] for this chunk.
  #[inline]
  #[must_use]
  pub const fn out_of_order(&self, reason: &'static str) -> PngError {
    PngError::ChunkOrder { ty: self.ty, offset: self.offset, reason }
  }

  /// The `IHDR`, which is always the first chunk.
  #[inline]
  pub fn header(&self) -> PngResult<&'a IHDR> {
    self.seen.header().ok_or(PngError::MissingChunk { ty: ChunkTy::IHDR })
  }

  /// The `PLTE` entries, or an ordering error if there's no palette yet.
  #[inline]
  pub fn require_palette(&self, reason: &'static str) -> PngResult<&'a [RGB8]> {
    self.seen.palette().map(|p| p.entries.as_slice()).ok_or(self.out_of_order(reason))
  }
}

/// What a chunk can see while it's being encoded.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
  pub width: u32,
  pub height: u32,
  /// Canonical RGBA8 pixels.
  pub pixels: &'a [u8],
  pub options: &'a EncodeOptions,
  pub registry: &'a ChunkRegistry,
  /// Palette of an indexed image (empty otherwise).
  pub palette: &'a [RGBA8],
  /// Chunks planned before this one.
  pub planned: ChunkView<'a>,
}
impl<'a> EncodeContext<'a> {
  #[inline]
  pub fn header(&self) -> PngResult<&'a IHDR> {
    self.planned.header().ok_or(PngError::MissingChunk { ty: ChunkTy::IHDR })
  }

  #[inline]
  #[must_use]
  pub fn data(&self) -> &'a PersistentData {
    &self.options.data
  }
}

/// A read only view of a list of chunks.
#[derive(Debug, Clone, Copy)]
pub struct ChunkView<'a> {
  chunks: &'a [PngChunk],
}
impl<'a> ChunkView<'a> {
  #[inline]
  #[must_use]
  pub const fn new(chunks: &'a [PngChunk]) -> Self {
    Self { chunks }
  }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &'a PngChunk> + 'a {
    self.chunks.iter()
  }

  #[inline]
  #[must_use]
  pub fn header(&self) -> Option<&'a IHDR> {
    self.chunks.iter().find_map(|c| match c {
      PngChunk::IHDR(ihdr) => Some(ihdr),
      _ => None,
    })
  }

  #[inline]
  #[must_use]
  pub fn palette(&self) -> Option<&'a PLTE> {
    self.chunks.iter().find_map(|c| match c {
      PngChunk::PLTE(plte) => Some(plte),
      _ => None,
    })
  }

  #[inline]
  #[must_use]
  pub fn transparency(&self) -> Option<&'a tRNS> {
    self.chunks.iter().find_map(|c| match c {
      PngChunk::tRNS(trns) => Some(trns),
      _ => None,
    })
  }

  /// How many chunks of this type there are.
  #[inline]
  #[must_use]
  pub fn count(&self, ty: ChunkTy) -> usize {
    self.chunks.iter().filter(|c| c.ty() == ty).count()
  }

  #[inline]
  #[must_use]
  pub fn contains(&self, ty: ChunkTy) -> bool {
    self.chunks.iter().any(|c| c.ty() == ty)
  }

  #[inline]
  #[must_use]
  pub fn last(&self) -> Option<&'a PngChunk> {
    self.chunks.last()
  }
}

/// One chunk type's part in decoding and encoding.
///
/// Only `parse`, `decode_data`, `encode_data`, and `compose` are required,
/// most chunks don't touch the pixels at all.
pub trait ChunkCodec: Sized {
  /// Reads the payload (exactly `length` bytes at the cursor).
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self>;

  /// Adjusts the pass images before they're deinterlaced.
  #[inline]
  fn decode(&self, _passes: &mut [SampleImage], _ctx: &DecodeContext<'_>) -> PngResult<()> {
    Ok(())
  }

  /// Adjusts the full image before it's converted to RGBA8.
  #[inline]
  fn post_decode(&self, _image: &mut SampleImage, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    Ok(())
  }

  /// Records the chunk's values.
  fn decode_data(&self, data: &mut PngData, ctx: &DecodeContext<'_>) -> PngResult<()>;

  /// Plans the chunks of this type to write.
  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>>;

  /// Adjusts the full image before it's interlaced.
  #[inline]
  fn pre_encode(&self, _image: &mut SampleImage, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    Ok(())
  }

  /// Adjusts the pass images before they're filtered.
  #[inline]
  fn encode(&self, _passes: &mut [SampleImage], _ctx: &EncodeContext<'_>) -> PngResult<()> {
    Ok(())
  }

  /// Writes the payload.
  fn compose(&self, cursor: &mut ByteCursor<'_>, ctx: &EncodeContext<'_>) -> PngResult<()>;
}

/// A parsed chunk of any type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub enum PngChunk {
  IHDR(IHDR),
  PLTE(PLTE),
  IDAT(IDAT),
  IEND(IEND),
  tRNS(tRNS),
  gAMA(gAMA),
  cHRM(cHRM),
  sRGB(sRGB),
  iCCP(iCCP),
  tEXt(tEXt),
  zTXt(zTXt),
  iTXt(iTXt),
  bKGD(bKGD),
  hIST(hIST),
  pHYs(pHYs),
  sBIT(sBIT),
  sPLT(sPLT),
  tIME(tIME),
  Unknown(UnknownChunk),
}

/// Runs the same expression on whatever chunk is inside a [`PngChunk`].
macro_rules! with_chunk {
  ($chunk:expr, $c:ident => $e:expr) => {
    match $chunk {
      PngChunk::IHDR($c) => $e,
      PngChunk::PLTE($c) => $e,
      PngChunk::IDAT($c) => $e,
      PngChunk::IEND($c) => $e,
      PngChunk::tRNS($c) => $e,
      PngChunk::gAMA($c) => $e,
      PngChunk::cHRM($c) => $e,
      PngChunk::sRGB($c) => $e,
      PngChunk::iCCP($c) => $e,
      PngChunk::tEXt($c) => $e,
      PngChunk::zTXt($c) => $e,
      PngChunk::iTXt($c) => $e,
      PngChunk::bKGD($c) => $e,
      PngChunk::hIST($c) => $e,
      PngChunk::pHYs($c) => $e,
      PngChunk::sBIT($c) => $e,
      PngChunk::sPLT($c) => $e,
      PngChunk::tIME($c) => $e,
      PngChunk::Unknown($c) => $e,
    }
  };
}

/// Runs the same expression with the codec type for a [`ChunkKind`],
/// wrapping the output back up as [`PngChunk`] values.
macro_rules! with_kind {
  ($kind:expr, $T:ident => $e:expr) => {
    match $kind {
      ChunkKind::IHDR => { type $T = IHDR; $e.map(|v| v.into_iter().map(PngChunk::IHDR).collect()) }
      ChunkKind::PLTE => { type $T = PLTE; $e.map(|v| v.into_iter().map(PngChunk::PLTE).collect()) }
      ChunkKind::IDAT => { type $T = IDAT; $e.map(|v| v.into_iter().map(PngChunk::IDAT).collect()) }
      ChunkKind::IEND => { type $T = IEND; $e.map(|v| v.into_iter().map(PngChunk::IEND).collect()) }
      ChunkKind::tRNS => { type $T = tRNS; $e.map(|v| v.into_iter().map(PngChunk::tRNS).collect()) }
      ChunkKind::gAMA => { type $T = gAMA; $e.map(|v| v.into_iter().map(PngChunk::gAMA).collect()) }
      ChunkKind::cHRM => { type $T = cHRM; $e.map(|v| v.into_iter().map(PngChunk::cHRM).collect()) }
      ChunkKind::sRGB => { type $T = sRGB; $e.map(|v| v.into_iter().map(PngChunk::sRGB).collect()) }
      ChunkKind::iCCP => { type $T = iCCP; $e.map(|v| v.into_iter().map(PngChunk::iCCP).collect()) }
      ChunkKind::tEXt => { type $T = tEXt; $e.map(|v| v.into_iter().map(PngChunk::tEXt).collect()) }
      ChunkKind::zTXt => { type $T = zTXt; $e.map(|v| v.into_iter().map(PngChunk::zTXt).collect()) }
      ChunkKind::iTXt => { type $T = iTXt; $e.map(|v| v.into_iter().map(PngChunk::iTXt).collect()) }
      ChunkKind::bKGD => { type $T = bKGD; $e.map(|v| v.into_iter().map(PngChunk::bKGD).collect()) }
      ChunkKind::hIST => { type $T = hIST; $e.map(|v| v.into_iter().map(PngChunk::hIST).collect()) }
      ChunkKind::pHYs => { type $T = pHYs; $e.map(|v| v.into_iter().map(PngChunk::pHYs).collect()) }
      ChunkKind::sBIT => { type $T = sBIT; $e.map(|v| v.into_iter().map(PngChunk::sBIT).collect()) }
      ChunkKind::sPLT => { type $T = sPLT; $e.map(|v| v.into_iter().map(PngChunk::sPLT).collect()) }
      ChunkKind::tIME => { type $T = tIME; $e.map(|v| v.into_iter().map(PngChunk::tIME).collect()) }
      ChunkKind::Custom => {
        type $T = UnknownChunk;
        $e.map(|v| v.into_iter().map(PngChunk::Unknown).collect())
      }
    }
  };
}

impl PngChunk {
  /// The chunk's type.
  #[inline]
  #[must_use]
  pub const fn ty(&self) -> ChunkTy {
    match self {
      PngChunk::IHDR(_) => ChunkTy::IHDR,
      PngChunk::PLTE(_) => ChunkTy::PLTE,
      PngChunk::IDAT(_) => ChunkTy::IDAT,
      PngChunk::IEND(_) => ChunkTy::IEND,
      PngChunk::tRNS(_) => ChunkTy::tRNS,
      PngChunk::gAMA(_) => ChunkTy::gAMA,
      PngChunk::cHRM(_) => ChunkTy::cHRM,
      PngChunk::sRGB(_) => ChunkTy::sRGB,
      PngChunk::iCCP(_) => ChunkTy::iCCP,
      PngChunk::tEXt(_) => ChunkTy::tEXt,
      PngChunk::zTXt(_) => ChunkTy::zTXt,
      PngChunk::iTXt(_) => ChunkTy::iTXt,
      PngChunk::bKGD(_) => ChunkTy::bKGD,
      PngChunk::hIST(_) => ChunkTy::hIST,
      PngChunk::pHYs(_) => ChunkTy::pHYs,
      PngChunk::sBIT(_) => ChunkTy::sBIT,
      PngChunk::sPLT(_) => ChunkTy::sPLT,
      PngChunk::tIME(_) => ChunkTy::tIME,
      PngChunk::Unknown(u) => u.ty,
    }
  }

  /// Parses a payload with the codec for `kind`.
  pub fn parse(
    kind: ChunkKind, payload: &[u8], ctx: &DecodeContext<'_>,
  ) -> PngResult<PngChunk> {
    let length = payload.len();
    let parsed: PngResult<Vec<PngChunk>> = with_kind!(kind, T => {
      let mut cursor = ByteCursor::from(payload);
      T::parse(&mut cursor, length, ctx).map(|c| vec![c])
    });
    parsed?.pop().ok_or(PngError::InvalidArgument("chunk parse produced nothing"))
  }

  /// Plans the chunks of `kind` to write.
  pub fn plan(kind: ChunkKind, ctx: &EncodeContext<'_>) -> PngResult<Vec<PngChunk>> {
    with_kind!(kind, T => T::encode_data(ctx))
  }

  #[inline]
  pub fn decode(&self, passes: &mut [SampleImage], ctx: &DecodeContext<'_>) -> PngResult<()> {
    with_chunk!(self, c => c.decode(passes, ctx))
  }

  #[inline]
  pub fn post_decode(&self, image: &mut SampleImage, ctx: &DecodeContext<'_>) -> PngResult<()> {
    with_chunk!(self, c => c.post_decode(image, ctx))
  }

  #[inline]
  pub fn decode_data(&self, data: &mut PngData, ctx: &DecodeContext<'_>) -> PngResult<()> {
    with_chunk!(self, c => c.decode_data(data, ctx))
  }

  #[inline]
  pub fn pre_encode(&self, image: &mut SampleImage, ctx: &EncodeContext<'_>) -> PngResult<()> {
    with_chunk!(self, c => c.pre_encode(image, ctx))
  }

  #[inline]
  pub fn encode(&self, passes: &mut [SampleImage], ctx: &EncodeContext<'_>) -> PngResult<()> {
    with_chunk!(self, c => c.encode(passes, ctx))
  }

  #[inline]
  pub fn compose(&self, cursor: &mut ByteCursor<'_>, ctx: &EncodeContext<'_>) -> PngResult<()> {
    with_chunk!(self, c => c.compose(cursor, ctx))
  }
}
