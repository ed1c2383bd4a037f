//! Turning PNG bytes into RGBA8 pixels plus metadata.

use super::*;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
  /// Turns recoverable problems into errors: CRC mismatches on ancillary
  /// chunks, duplicate chunks, chunk ordering mistakes, invalid ancillary
  /// chunk contents, surplus image data, and data after `IEND`.
  pub strict: bool,
  /// Apply `tRNS` to the pixels (default `true`).
  pub resolve_transparency: bool,
  /// Composite the pixels over the `bKGD` color, leaving them opaque.
  pub apply_background: bool,
  /// Apply `gAMA` gamma correction (needs the `std` feature).
  pub apply_gamma: bool,
  /// Display gamma used with `apply_gamma`.
  pub display_gamma: f64,
  /// Images with more pixels than this are rejected before any image data
  /// is decompressed.
  pub max_pixels: u64,
  /// Largest decompressed size of a `zTXt`, `iTXt`, or `iCCP` payload.
  /// Bigger ones count as invalid chunks.
  pub max_metadata_len: usize,
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self {
      strict: false,
      resolve_transparency: true,
      apply_background: false,
      apply_gamma: false,
      display_gamma: 2.2,
      max_pixels: 1 << 28,
      max_metadata_len: 1 << 24,
    }
  }
}

/// Progress of a [`Decoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum DecodeState {
  #[default]
  Init,
  SignatureChecked,
  ReadingChunks,
  /// A chunk was just parsed, more may follow.
  ChunkParsed,
  EndChunkSeen,
  PostValidated,
  Inflated,
  Unfiltered,
  Deinterlaced,
  Scaled,
  PaletteResolved,
  Done,
  /// The last decode returned an error.
  Failed,
}

/// A decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPng {
  pub width: u32,
  pub height: u32,
  /// RGBA8, row-major, `width * height * 4` bytes.
  pub pixels: Vec<u8>,
  pub data: PngData,
}
impl DecodedPng {
  /// The pixels as [`RGBA8`] values.
  #[inline]
  #[must_use]
  pub fn rgba8(&self) -> &[RGBA8] {
    bytemuck::cast_slice(&self.pixels)
  }
}

/// Decodes PNG bytes with default options (other than `strict`).
pub fn decode_png(bytes: &[u8], strict: bool) -> PngResult<DecodedPng> {
  Decoder::new(DecodeOptions { strict, ..DecodeOptions::default() }).decode(bytes)
}

/// Reads just the header of a PNG.
pub fn png_get_header(bytes: &[u8]) -> PngResult<IHDR> {
  if !is_png_signature(bytes) {
    return Err(PngError::Signature);
  }
  let raw = RawChunkIter::new(bytes).next().ok_or(PngError::UnexpectedEnd { offset: 8 })??;
  if raw.ty != ChunkTy::IHDR {
    return Err(PngError::ChunkOrder {
      ty: raw.ty,
      offset: raw.offset,
      reason: "IHDR must be the first chunk",
    });
  }
  Ok(IHDR::try_from(raw.data)?)
}

/// Records a tolerated problem.
fn tolerate(data: &mut PngData, ty: ChunkTy, offset: usize, issue: ToleratedIssue) {
  log::warn!("tolerating {issue:?} in {ty} at {offset}");
  data.volatile.tolerated.push(Tolerated { ty, offset, issue });
}

/// Ordering rules that are only enforced in strict mode.
fn misplaced(ty: ChunkTy, seen: &ChunkView<'_>) -> Option<&'static str> {
  let after_idat = seen.contains(ChunkTy::IDAT);
  match ty {
    ChunkTy::gAMA | ChunkTy::cHRM | ChunkTy::sRGB | ChunkTy::iCCP | ChunkTy::sBIT
      if after_idat || seen.contains(ChunkTy::PLTE) =>
    {
      Some("color space chunks must come before PLTE and IDAT")
    }
    ChunkTy::PLTE if after_idat => Some("PLTE must come before IDAT"),
    ChunkTy::tRNS | ChunkTy::bKGD | ChunkTy::hIST | ChunkTy::pHYs | ChunkTy::sPLT if after_idat => {
      Some("this chunk must come before IDAT")
    }
    ChunkTy::IDAT if after_idat && seen.last().map(PngChunk::ty) != Some(ChunkTy::IDAT) => {
      Some("IDAT chunks must be consecutive")
    }
    _ => None,
  }
}

/// Decodes PNG bytes.
///
/// ```
/// # use pngkit::png::*;
/// let pixels = [255_u8, 0, 0, 255, 0, 0, 255, 128];
/// let bytes = encode_png(2, 1, &pixels, &EncodeOptions::default()).unwrap();
/// let mut decoder = Decoder::new(DecodeOptions::default());
/// let png = decoder.decode(&bytes).unwrap();
/// assert_eq!(png.pixels, pixels);
/// assert_eq!(decoder.state(), DecodeState::Done);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
  options: DecodeOptions,
  registry: ChunkRegistry,
  state: DecodeState,
}
impl Decoder {
  #[inline]
  #[must_use]
  pub fn new(options: DecodeOptions) -> Self {
    Self::with_registry(options, ChunkRegistry::standard())
  }

  /// A decoder that also knows some custom chunk types.
  #[inline]
  #[must_use]
  pub fn with_registry(options: DecodeOptions, registry: ChunkRegistry) -> Self {
    Self { options, registry, state: DecodeState::Init }
  }

  /// The last state reached.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> DecodeState {
    self.state
  }

  #[inline]
  #[must_use]
  pub const fn options(&self) -> &DecodeOptions {
    &self.options
  }

  #[inline]
  fn set_state(&mut self, state: DecodeState) {
    log::trace!("decoder: {:?} -> {state:?}", self.state);
    self.state = state;
  }

  pub fn decode(&mut self, bytes: &[u8]) -> PngResult<DecodedPng> {
    self.set_state(DecodeState::Init);
    let out = self.run(bytes);
    if let Err(e) = &out {
      log::debug!("decode failed in {:?}: {e}", self.state);
      self.set_state(DecodeState::Failed);
    }
    out
  }

  fn run(&mut self, bytes: &[u8]) -> PngResult<DecodedPng> {
    if !is_png_signature(bytes) {
      return Err(PngError::Signature);
    }
    self.set_state(DecodeState::SignatureChecked);

    self.set_state(DecodeState::ReadingChunks);
    let mut data = PngData::default();
    let (chunks, offsets) = self.read_chunks(bytes, &mut data)?;
    self.set_state(DecodeState::EndChunkSeen);

    let header = *ChunkView::new(&chunks).header().ok_or(PngError::MissingChunk { ty: ChunkTy::IHDR })?;
    if !chunks.iter().any(|c| matches!(c, PngChunk::IDAT(_))) {
      return Err(PngError::MissingChunk { ty: ChunkTy::IDAT });
    }
    if header.color_type == PngColorType::Index && ChunkView::new(&chunks).palette().is_none() {
      return Err(PngError::MissingChunk { ty: ChunkTy::PLTE });
    }
    self.set_state(DecodeState::PostValidated);

    let mut zlib_data = Vec::new();
    for c in &chunks {
      if let PngChunk::IDAT(idat) = c {
        zlib_data.try_reserve(idat.data.len())?;
        zlib_data.extend_from_slice(&idat.data);
      }
    }
    let expected = header.filtered_data_len();
    let (mut filtered, surplus) = inflate_up_to(&zlib_data, expected)?;
    if filtered.len() < expected {
      return Err(PngError::NotEnoughImageData { expected, actual: filtered.len() });
    }
    if surplus {
      if self.options.strict {
        return Err(PngError::TooMuchImageData { expected });
      }
      let first_idat = chunks.iter().position(|c| matches!(c, PngChunk::IDAT(_)));
      let offset = first_idat.map_or(0, |i| offsets[i]);
      tolerate(&mut data, ChunkTy::IDAT, offset, ToleratedIssue::ExtraImageData);
    }
    log::debug!("inflated {} bytes into {expected}", zlib_data.len());
    self.set_state(DecodeState::Inflated);

    let mut pass_images = Vec::new();
    let mut remaining = &mut filtered[..expected];
    for pass in passes(header.width, header.height, header.is_interlaced) {
      if pass.is_empty() {
        pass_images.push(unpack_pass(&[], pass, &header)?);
        continue;
      }
      let line_len = header.bytes_per_scanline(pass.width);
      let pass_len = (line_len + 1) * pass.height as usize;
      let (this_pass, rest) = core::mem::take(&mut remaining).split_at_mut(pass_len);
      remaining = rest;
      unfilter_pass(this_pass, line_len, pass.height as usize, header.filter_stride(), pass.level)?;
      pass_images.push(unpack_pass(this_pass, pass, &header)?);
    }
    self.set_state(DecodeState::Unfiltered);

    for (i, c) in chunks.iter().enumerate() {
      c.decode(&mut pass_images, &self.context(&chunks, &offsets, i))?;
    }
    let mut image = deinterlace(pass_images, header.width, header.height)?;
    self.set_state(DecodeState::Deinterlaced);

    // tRNS keys match the stored samples, so tRNS goes before anything that
    // rewrites them (gAMA).
    let is_trns = |c: &PngChunk| matches!(c, PngChunk::tRNS(_));
    let trns_first = chunks.iter().enumerate().filter(|(_, c)| is_trns(*c));
    let others = chunks.iter().enumerate().filter(|(_, c)| !is_trns(*c));
    for (i, c) in trns_first.chain(others) {
      c.post_decode(&mut image, &self.context(&chunks, &offsets, i))?;
    }

    let view = ChunkView::new(&chunks);
    #[allow(unused_mut)]
    let mut palette = view.palette().map(|p| p.entries.clone()).unwrap_or_default();
    #[cfg(feature = "std")]
    if self.options.apply_gamma {
      let gama = chunks.iter().find_map(|c| match c {
        PngChunk::gAMA(g) => Some(*g),
        _ => None,
      });
      if let Some(gama) = gama {
        let display = self.options.display_gamma;
        for RGB8 { r, g, b } in palette.iter_mut() {
          for c in [r, g, b] {
            *c = gama.correct(u16::from(*c), 255, display) as u8;
          }
        }
      }
    }
    let alphas = match view.transparency() {
      Some(trns) if self.options.resolve_transparency => trns.alphas(),
      _ => &[],
    };
    let mut pixels = to_canonical(&image, &palette, alphas, self.options.strict)?;
    self.set_state(DecodeState::Scaled);

    if self.options.apply_background {
      let background = chunks.iter().find_map(|c| match c {
        PngChunk::bKGD(b) => b.to_rgb8(header.bit_depth, &palette),
        _ => None,
      });
      if let Some(bg) = background {
        composite_over(&mut pixels, bg);
      }
    }
    self.set_state(DecodeState::PaletteResolved);

    for (i, c) in chunks.iter().enumerate() {
      c.decode_data(&mut data, &self.context(&chunks, &offsets, i))?;
    }
    log::debug!(
      "decoded {}x{} {:?} at {} bits, {} chunks",
      header.width,
      header.height,
      header.color_type,
      header.bit_depth,
      chunks.len()
    );
    self.set_state(DecodeState::Done);
    Ok(DecodedPng { width: header.width, height: header.height, pixels, data })
  }

  /// The context for the chunk at `index`, seeing only earlier chunks.
  #[inline]
  fn context<'a>(
    &'a self, chunks: &'a [PngChunk], offsets: &[usize], index: usize,
  ) -> DecodeContext<'a> {
    DecodeContext {
      ty: chunks[index].ty(),
      offset: offsets[index],
      options: &self.options,
      registry: &self.registry,
      seen: ChunkView::new(&chunks[..index]),
    }
  }

  /// Tokenizes and parses every chunk up to `IEND`.
  fn read_chunks(
    &mut self, bytes: &[u8], data: &mut PngData,
  ) -> PngResult<(Vec<PngChunk>, Vec<usize>)> {
    let strict = self.options.strict;
    let mut chunks: Vec<PngChunk> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();
    let mut iter = RawChunkIter::new(bytes);
    let mut seen_end = false;
    while let Some(raw) = iter.next() {
      let raw = raw?;
      let (ty, offset) = (raw.ty, raw.offset);
      log::trace!("chunk {ty} at {offset}, {} bytes", raw.data.len());
      if chunks.is_empty() && ty != ChunkTy::IHDR {
        return Err(PngError::ChunkOrder { ty, offset, reason: "IHDR must be the first chunk" });
      }
      if !ty.is_valid() {
        return Err(PngError::InvalidChunk {
          ty,
          offset,
          reason: "chunk types must be four ASCII letters",
        });
      }
      if !raw.is_crc_correct() {
        let (declared, actual) = (raw.declared_crc, raw.actual_crc());
        if strict || ty.is_critical() || !ty.is_safe_to_copy() {
          return Err(PngError::CrcMismatch { ty, offset, declared, actual });
        }
        tolerate(data, ty, offset, ToleratedIssue::CrcMismatch { declared, actual });
      }
      let descriptor = self.registry.get(ty).copied();
      if descriptor.is_none() && ty.is_critical() {
        return Err(PngError::UnknownCriticalChunk { ty, offset });
      }
      let kind = descriptor.map_or(ChunkKind::Custom, |d| d.kind);
      let seen = ChunkView::new(&chunks);
      if descriptor.is_some_and(|d| d.once_only) && seen.contains(ty) {
        if strict {
          return Err(PngError::DuplicateChunk { ty, offset });
        }
        tolerate(data, ty, offset, ToleratedIssue::Duplicate);
        continue;
      }
      if ty == ChunkTy::PLTE {
        let header = seen.header().ok_or(PngError::MissingChunk { ty: ChunkTy::IHDR })?;
        if !header.color_type.is_color() {
          if strict {
            return Err(PngError::ChunkOrder {
              ty,
              offset,
              reason: "grayscale images can't have a palette",
            });
          }
          tolerate(data, ty, offset, ToleratedIssue::Invalid("grayscale images can't have a palette"));
          continue;
        }
      }
      if let Some(reason) = misplaced(ty, &seen) {
        if strict {
          return Err(PngError::ChunkOrder { ty, offset, reason });
        }
        tolerate(data, ty, offset, ToleratedIssue::OutOfOrder(reason));
      }

      let ctx = DecodeContext {
        ty,
        offset,
        options: &self.options,
        registry: &self.registry,
        seen,
      };
      let parsed = PngChunk::parse(kind, raw.data, &ctx);
      match parsed {
        Ok(chunk) => {
          if let PngChunk::IHDR(header) = &chunk {
            if header.pixel_count() > self.options.max_pixels {
              return Err(PngError::InvalidArgument("image has more pixels than max_pixels allows"));
            }
          }
          chunks.push(chunk);
          offsets.push(offset);
          self.set_state(DecodeState::ChunkParsed);
        }
        Err(PngError::InvalidChunk { reason, .. }) if !strict && ty.is_ancillary() => {
          tolerate(data, ty, offset, ToleratedIssue::Invalid(reason));
        }
        Err(e) => return Err(e),
      }
      if ty == ChunkTy::IEND {
        seen_end = true;
        break;
      }
    }
    if !seen_end {
      return Err(PngError::MissingChunk { ty: ChunkTy::IEND });
    }
    let end = iter.offset();
    if end < bytes.len() {
      let len = bytes.len() - end;
      if strict {
        return Err(PngError::TrailingData { offset: end, len });
      }
      tolerate(data, ChunkTy::IEND, end, ToleratedIssue::TrailingData { len });
    }
    Ok((chunks, offsets))
  }
}

/// Composites RGBA8 pixels over an opaque color.
fn composite_over(pixels: &mut [u8], bg: RGB8) {
  for px in pixels.chunks_exact_mut(4) {
    let a = u32::from(px[3]);
    for (c, b) in px[..3].iter_mut().zip([bg.r, bg.g, bg.b]) {
      *c = ((u32::from(*c) * a + u32::from(b) * (255 - a) + 127) / 255) as u8;
    }
    px[3] = u8::MAX;
  }
}

#[test]
fn test_composite_over() {
  let mut px = [255, 0, 0, 255, 255, 0, 0, 0, 200, 100, 0, 128];
  composite_over(&mut px, RGB8 { r: 0, g: 0, b: 255 });
  assert_eq!(px, [255, 0, 0, 255, 0, 0, 255, 255, 100, 50, 127, 255]);
}
