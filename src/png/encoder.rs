//! Turning RGBA8 pixels plus metadata into PNG bytes.

use super::*;

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
  /// Color type of the output (default RGBA).
  pub color_type: PngColorType,
  /// Bits per sample of the output (default 8).
  pub bit_depth: u8,
  /// Write the image data with Adam7 interlacing.
  pub interlaced: bool,
  /// Only used for 8 and 16 bit non-indexed images, everything else is
  /// written unfiltered.
  pub filter: FilterStrategy,
  /// 0 to 10, higher is smaller and slower.
  pub compression_level: u8,
  /// Largest payload of a single `IDAT`.
  pub max_idat_len: usize,
  /// Palette for indexed output. Without one, the palette is made from the
  /// distinct colors of the image in the order they first appear.
  pub palette: Option<Vec<RGBA8>>,
  /// Writes an `sRGB` chunk.
  pub rendering_intent: Option<SrgbIntent>,
  /// Metadata to write.
  pub data: PersistentData,
}
impl Default for EncodeOptions {
  #[inline]
  fn default() -> Self {
    Self {
      color_type: PngColorType::RGBA,
      bit_depth: 8,
      interlaced: false,
      filter: FilterStrategy::Adaptive,
      compression_level: 6,
      max_idat_len: 1 << 16,
      palette: None,
      rendering_intent: None,
      data: PersistentData::default(),
    }
  }
}

/// Progress of an [`Encoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum EncodeState {
  #[default]
  Init,
  MetadataAccepted,
  ChunksPlanned,
  Scaled,
  Interlaced,
  Filtered,
  Deflated,
  Framed,
  Done,
  /// The last encode returned an error.
  Failed,
}

/// Encodes RGBA8 pixels (`width * height * 4` bytes, row-major).
pub fn encode_png(
  width: u32, height: u32, pixels: &[u8], options: &EncodeOptions,
) -> PngResult<Vec<u8>> {
  Encoder::new(options.clone()).encode(width, height, pixels)
}

/// Encodes images.
///
/// ```
/// # use pngkit::png::*;
/// let options = EncodeOptions {
///   color_type: PngColorType::Y,
///   bit_depth: 1,
///   ..EncodeOptions::default()
/// };
/// let mut encoder = Encoder::new(options);
/// let bytes = encoder.encode(3, 1, &[0, 0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255]).unwrap();
/// assert!(is_png_signature(&bytes));
/// assert_eq!(encoder.state(), EncodeState::Done);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
  options: EncodeOptions,
  registry: ChunkRegistry,
  state: EncodeState,
}
impl Encoder {
  #[inline]
  #[must_use]
  pub fn new(options: EncodeOptions) -> Self {
    Self::with_registry(options, ChunkRegistry::standard())
  }

  /// An encoder that can write custom chunk types from
  /// [`PersistentData::unknown_chunks`], including critical ones.
  #[inline]
  #[must_use]
  pub fn with_registry(options: EncodeOptions, registry: ChunkRegistry) -> Self {
    Self { options, registry, state: EncodeState::Init }
  }

  /// The last state reached.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> EncodeState {
    self.state
  }

  #[inline]
  #[must_use]
  pub const fn options(&self) -> &EncodeOptions {
    &self.options
  }

  #[inline]
  fn set_state(&mut self, state: EncodeState) {
    log::trace!("encoder: {:?} -> {state:?}", self.state);
    self.state = state;
  }

  pub fn encode(&mut self, width: u32, height: u32, pixels: &[u8]) -> PngResult<Vec<u8>> {
    self.set_state(EncodeState::Init);
    let out = self.run(width, height, pixels);
    if let Err(e) = &out {
      log::debug!("encode failed in {:?}: {e}", self.state);
      self.set_state(EncodeState::Failed);
    }
    out
  }

  fn run(&mut self, width: u32, height: u32, pixels: &[u8]) -> PngResult<Vec<u8>> {
    let header = IHDR::new(
      width,
      height,
      self.options.color_type,
      self.options.bit_depth,
      self.options.interlaced,
    )?;
    let expected = (width as usize)
      .checked_mul(height as usize)
      .and_then(|n| n.checked_mul(4))
      .ok_or(PngError::CheckedMath)?;
    if pixels.len() != expected {
      return Err(PngError::InvalidArgument("pixel data must be width * height * 4 bytes"));
    }
    if self.options.max_idat_len == 0 || self.options.max_idat_len > MAX_CHUNK_LEN as usize {
      return Err(PngError::InvalidArgument("max_idat_len must be from 1 to 2^31-1"));
    }
    if self.options.compression_level > MAX_COMPRESSION_LEVEL {
      return Err(PngError::InvalidArgument("compression_level must be 10 or less"));
    }
    let palette = self.palette(&header, pixels)?;
    self.set_state(EncodeState::MetadataAccepted);

    let mut chunks = self.plan(width, height, pixels, &palette)?;
    self.set_state(EncodeState::ChunksPlanned);

    let keep_alpha = matches!(
      ChunkView::new(&chunks).transparency(),
      Some(tRNS::Gray(_) | tRNS::Rgb(_))
    );
    let mut image = from_canonical(pixels, width, height, &header, &palette, keep_alpha)?;
    for (i, c) in chunks.iter().enumerate() {
      c.pre_encode(&mut image, &self.context(width, height, pixels, &palette, &chunks[..i]))?;
    }
    if image.channels != header.color_type.channel_count() {
      return Err(PngError::InvalidArgument("the image still has a transparency channel"));
    }
    self.set_state(EncodeState::Scaled);

    let mut passes = interlace(image, header.is_interlaced)?;
    for (i, c) in chunks.iter().enumerate() {
      c.encode(&mut passes, &self.context(width, height, pixels, &palette, &chunks[..i]))?;
    }
    self.set_state(EncodeState::Interlaced);

    let strategy = if header.color_type == PngColorType::Index || header.bit_depth < 8 {
      FilterStrategy::None
    } else {
      self.options.filter
    };
    let mut filtered = Vec::new();
    filtered.try_reserve(header.filtered_data_len())?;
    for pass in passes.iter().filter(|p| p.width > 0 && p.height > 0) {
      let raw = pack_pass(pass)?;
      filter_pass(&raw, pass.bytes_per_line(), header.filter_stride(), strategy, &mut filtered)?;
    }
    self.set_state(EncodeState::Filtered);

    let zlib_data = deflate(&filtered, self.options.compression_level);
    log::debug!("deflated {} bytes into {}", filtered.len(), zlib_data.len());
    self.set_state(EncodeState::Deflated);

    chunks.extend(IDAT::split(&zlib_data, self.options.max_idat_len).into_iter().map(PngChunk::IDAT));
    self.registry.sort_chunks(&mut chunks);
    let mut out = ByteCursor::new();
    out.write_bytes(&PNG_SIGNATURE);
    for (i, chunk) in chunks.iter().enumerate() {
      let ctx = self.context(width, height, pixels, &palette, &chunks[..i]);
      write_raw_chunk(&mut out, chunk.ty(), |c| chunk.compose(c, &ctx))?;
    }
    self.set_state(EncodeState::Framed);

    log::debug!(
      "encoded {width}x{height} {:?} at {} bits, {} chunks, {} bytes",
      header.color_type,
      header.bit_depth,
      chunks.len(),
      out.len()
    );
    self.set_state(EncodeState::Done);
    Ok(out.into_vec())
  }

  #[inline]
  fn context<'a>(
    &'a self, width: u32, height: u32, pixels: &'a [u8], palette: &'a [RGBA8],
    planned: &'a [PngChunk],
  ) -> EncodeContext<'a> {
    EncodeContext {
      width,
      height,
      pixels,
      options: &self.options,
      registry: &self.registry,
      palette,
      planned: ChunkView::new(planned),
    }
  }

  /// The palette of indexed output, empty for other color types.
  fn palette(&self, header: &IHDR, pixels: &[u8]) -> PngResult<Vec<RGBA8>> {
    if header.color_type != PngColorType::Index {
      return Ok(Vec::new());
    }
    let max = 1_usize << header.bit_depth;
    match &self.options.palette {
      Some(palette) if palette.is_empty() => Err(PngError::InvalidArgument("the palette is empty")),
      Some(palette) if palette.len() > max => {
        Err(PngError::PaletteTooLarge { colors: palette.len(), max })
      }
      Some(palette) => Ok(palette.clone()),
      None => build_palette(pixels, max),
    }
  }

  /// Asks every registered chunk type for its instances, then sorts them into
  /// stream order. `IDAT` is left out, it's made from the image later.
  fn plan(
    &self, width: u32, height: u32, pixels: &[u8], palette: &[RGBA8],
  ) -> PngResult<Vec<PngChunk>> {
    let mut chunks: Vec<PngChunk> = Vec::new();
    let kinds = self
      .registry
      .iter()
      .map(|d| d.kind)
      .filter(|k| !matches!(k, ChunkKind::IDAT | ChunkKind::Custom))
      .chain([ChunkKind::Custom]);
    for kind in kinds {
      let planned = PngChunk::plan(kind, &self.context(width, height, pixels, palette, &chunks))?;
      chunks.extend(planned);
    }
    for d in self.registry.iter().filter(|d| d.once_only) {
      let count = ChunkView::new(&chunks).count(d.ty);
      if count > 1 {
        log::error!("{} is only allowed once, but {count} were given", d.ty);
        return Err(PngError::InvalidArgument("a once-only chunk type was given more than once"));
      }
    }
    self.registry.sort_chunks(&mut chunks);
    Ok(chunks)
  }
}
