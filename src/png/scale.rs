//! Moving between packed scanline bytes, per-channel samples, and canonical
//! RGBA8 pixels.
//!
//! Samples sit in a [`SampleImage`] at the PNG's own bit depth (a `u16` each,
//! regardless of depth). That's the form chunk codecs get to look at and
//! adjust, eg: `tRNS` adds an alpha channel to it.

use super::*;

/// Pixels as unpacked samples, at the PNG's bit depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleImage {
  pub width: u32,
  pub height: u32,
  /// Samples per pixel.
  pub channels: usize,
  pub bit_depth: u8,
  /// If the single channel is a palette index.
  pub indexed: bool,
  /// `width * height * channels` samples, row-major.
  pub samples: Vec<u16>,
}
impl SampleImage {
  /// An all-zero image.
  pub fn new(
    width: u32, height: u32, channels: usize, bit_depth: u8, indexed: bool,
  ) -> PngResult<Self> {
    let len = (width as usize)
      .checked_mul(height as usize)
      .and_then(|px| px.checked_mul(channels))
      .ok_or(PngError::CheckedMath)?;
    let mut samples = Vec::new();
    samples.try_reserve(len)?;
    samples.resize(len, 0);
    Ok(Self { width, height, channels, bit_depth, indexed, samples })
  }

  #[inline]
  #[must_use]
  fn sample_index(&self, x: u32, y: u32) -> usize {
    ((y as usize) * (self.width as usize) + (x as usize)) * self.channels
  }

  /// ## Panics
  /// * If the position is out of bounds.
  #[inline]
  #[must_use]
  pub fn pixel(&self, x: u32, y: u32) -> &[u16] {
    let i = self.sample_index(x, y);
    &self.samples[i..i + self.channels]
  }

  /// ## Panics
  /// * If the position is out of bounds.
  #[inline]
  #[must_use]
  pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u16] {
    let i = self.sample_index(x, y);
    let channels = self.channels;
    &mut self.samples[i..i + channels]
  }

  /// Largest value a sample can hold.
  #[inline]
  #[must_use]
  pub const fn max_value(&self) -> u16 {
    max_sample(self.bit_depth)
  }

  /// Bytes per packed scanline, filter byte not included.
  #[inline]
  #[must_use]
  pub const fn bytes_per_line(&self) -> usize {
    (self.channels * self.bit_depth as usize * self.width as usize + 7) / 8
  }

  /// Rebuilds the image with a different channel layout.
  ///
  /// `f` gets each old pixel and writes the new pixel.
  pub fn remap_channels<F>(&mut self, channels: usize, mut f: F) -> PngResult<()>
  where
    F: FnMut(&[u16], &mut [u16]),
  {
    let pixel_count = (self.width as usize) * (self.height as usize);
    let mut out = Vec::new();
    out.try_reserve(pixel_count.checked_mul(channels).ok_or(PngError::CheckedMath)?)?;
    out.resize(pixel_count * channels, 0);
    if self.channels > 0 {
      for (old, new) in self.samples.chunks_exact(self.channels).zip(out.chunks_exact_mut(channels))
      {
        f(old, new);
      }
    }
    self.samples = out;
    self.channels = channels;
    Ok(())
  }
}

/// Unpacks one scanline into samples, appending `width * channels` samples to
/// `out`. Padding bits at the end of the line are dropped.
pub fn unpack_line(line: &[u8], width: u32, channels: usize, bit_depth: u8, out: &mut Vec<u16>) {
  let count = (width as usize) * channels;
  match bit_depth {
    16 => out.extend(line.chunks_exact(2).take(count).map(|b| u16::from_be_bytes([b[0], b[1]]))),
    8 => out.extend(line.iter().take(count).map(|&b| u16::from(b))),
    _ => {
      let depth = bit_depth as usize;
      let mask = max_sample(bit_depth);
      out.extend((0..count).map(|i| {
        let bit = i * depth;
        let shift = 8 - depth - (bit % 8);
        (u16::from(line[bit / 8]) >> shift) & mask
      }));
    }
  }
}

/// Packs samples into one scanline, appending to `out`. A partial final byte
/// is zero padded.
pub fn pack_line(samples: &[u16], bit_depth: u8, out: &mut Vec<u8>) {
  match bit_depth {
    16 => samples.iter().for_each(|s| out.extend_from_slice(&s.to_be_bytes())),
    8 => out.extend(samples.iter().map(|&s| s as u8)),
    _ => {
      let depth = u32::from(bit_depth);
      let mut acc = 0_u8;
      let mut used = 0_u32;
      for &s in samples {
        acc |= ((s & max_sample(bit_depth)) as u8) << (8 - depth - used);
        used += depth;
        if used == 8 {
          out.push(acc);
          acc = 0;
          used = 0;
        }
      }
      if used > 0 {
        out.push(acc);
      }
    }
  }
}

/// Unpacks one unfiltered pass (filter bytes still in place) into samples.
pub fn unpack_pass(filterlines: &[u8], pass: Pass, header: &IHDR) -> PngResult<SampleImage> {
  let channels = header.color_type.channel_count();
  let mut image = SampleImage {
    width: pass.width,
    height: pass.height,
    channels,
    bit_depth: header.bit_depth,
    indexed: header.color_type == PngColorType::Index,
    samples: Vec::new(),
  };
  if pass.is_empty() {
    return Ok(image);
  }
  let line_len = header.bytes_per_scanline(pass.width);
  let expected = (line_len + 1) * pass.height as usize;
  if filterlines.len() < expected {
    return Err(PngError::NotEnoughImageData { expected, actual: filterlines.len() });
  }
  image.samples.try_reserve((pass.width as usize) * (pass.height as usize) * channels)?;
  for line in filterlines[..expected].chunks_exact(line_len + 1) {
    unpack_line(&line[1..], pass.width, channels, header.bit_depth, &mut image.samples);
  }
  Ok(image)
}

/// Packs a pass back into raw scanlines (no filter bytes).
pub fn pack_pass(image: &SampleImage) -> PngResult<Vec<u8>> {
  let mut out = Vec::new();
  out.try_reserve(image.bytes_per_line() * image.height as usize)?;
  let row_samples = (image.width as usize) * image.channels;
  if row_samples == 0 {
    return Ok(out);
  }
  for row in image.samples.chunks_exact(row_samples) {
    pack_line(row, image.bit_depth, &mut out);
  }
  Ok(out)
}

/// Converts samples to canonical RGBA8 bytes.
///
/// Indexed images look up `palette`, with `alphas` giving the alpha of the
/// first entries (the rest are opaque). An index past the end of the palette
/// is an error when `strict`, otherwise it becomes opaque black.
pub fn to_canonical(
  image: &SampleImage, palette: &[RGB8], alphas: &[u8], strict: bool,
) -> PngResult<Vec<u8>> {
  let pixel_count = (image.width as usize) * (image.height as usize);
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve(pixel_count.checked_mul(4).ok_or(PngError::CheckedMath)?)?;
  if pixel_count == 0 {
    return Ok(out);
  }
  let depth = image.bit_depth;
  let mut warned = false;
  for px in image.samples.chunks_exact(image.channels) {
    let rgba: [u8; 4] = match (image.indexed, px) {
      (true, [i]) => {
        let i = *i as usize;
        match palette.get(i) {
          Some(RGB8 { r, g, b }) => [*r, *g, *b, alphas.get(i).copied().unwrap_or(u8::MAX)],
          None if strict => {
            return Err(PngError::PaletteIndex { index: i as u8, palette_len: palette.len() })
          }
          None => {
            if !warned {
              log::warn!("palette index {i} is past the end of the {} entry palette", palette.len());
              warned = true;
            }
            [0, 0, 0, u8::MAX]
          }
        }
      }
      (false, [y]) => {
        let y = sample_to_8(*y, depth);
        [y, y, y, u8::MAX]
      }
      (false, [y, a]) => {
        let y = sample_to_8(*y, depth);
        [y, y, y, sample_to_8(*a, depth)]
      }
      (false, [r, g, b]) => {
        [sample_to_8(*r, depth), sample_to_8(*g, depth), sample_to_8(*b, depth), u8::MAX]
      }
      (false, [r, g, b, a]) => [
        sample_to_8(*r, depth),
        sample_to_8(*g, depth),
        sample_to_8(*b, depth),
        sample_to_8(*a, depth),
      ],
      _ => return Err(PngError::InvalidArgument("unsupported channel layout")),
    };
    out.extend_from_slice(&rgba);
  }
  Ok(out)
}

/// Converts canonical RGBA8 bytes to samples of the target format.
///
/// * Gray targets take the luma of each pixel.
/// * Indexed targets must find each pixel (alpha included) in `palette`.
/// * With `keep_alpha`, a Y or RGB target gets a trailing alpha channel. That
///   channel must be taken back off before the image is packed.
pub fn from_canonical(
  pixels: &[u8], width: u32, height: u32, header: &IHDR, palette: &[RGBA8], keep_alpha: bool,
) -> PngResult<SampleImage> {
  let rgba: &[RGBA8] = bytemuck::cast_slice(pixels);
  let depth = header.bit_depth;
  let indexed = header.color_type == PngColorType::Index;
  let extra = usize::from(keep_alpha && !header.color_type.has_alpha() && !indexed);
  let channels = header.color_type.channel_count() + extra;
  let mut image = SampleImage::new(width, height, 0, depth, indexed)?;
  image.channels = channels;
  image
    .samples
    .try_reserve(rgba.len().checked_mul(channels).ok_or(PngError::CheckedMath)?)?;
  let lookup: BTreeMap<[u8; 4], u8> =
    palette.iter().enumerate().rev().map(|(i, c)| (c.to_array(), i as u8)).collect();
  let to = |v: u8| sample_from_8(v, depth);
  for (i, px) in rgba.iter().copied().enumerate() {
    match header.color_type {
      PngColorType::Y => image.samples.push(to(px.luma())),
      PngColorType::YA => image.samples.extend([to(px.luma()), to(px.a)]),
      PngColorType::RGB => image.samples.extend([to(px.r), to(px.g), to(px.b)]),
      PngColorType::RGBA => image.samples.extend([to(px.r), to(px.g), to(px.b), to(px.a)]),
      PngColorType::Index => match lookup.get(&px.to_array()) {
        Some(index) => image.samples.push(u16::from(*index)),
        None => {
          let x = (i % width as usize) as u32;
          let y = (i / width as usize) as u32;
          return Err(PngError::PaletteLookup { x, y, rgba: px.to_array() });
        }
      },
    }
    if extra == 1 {
      image.samples.push(to(px.a));
    }
  }
  Ok(image)
}

/// Collects the distinct colors of an image, in the order they first appear.
pub fn build_palette(pixels: &[u8], max_entries: usize) -> PngResult<Vec<RGBA8>> {
  let rgba: &[RGBA8] = bytemuck::cast_slice(pixels);
  let mut seen: BTreeMap<RGBA8, ()> = BTreeMap::new();
  let mut palette = Vec::new();
  for px in rgba.iter().copied() {
    if seen.insert(px, ()).is_none() {
      palette.push(px);
    }
  }
  if palette.len() > max_entries {
    return Err(PngError::PaletteTooLarge { colors: palette.len(), max: max_entries });
  }
  Ok(palette)
}

#[test]
fn test_unpack_one_bit_drops_padding() {
  let mut out = Vec::new();
  unpack_line(&[0b1011_0000], 5, 1, 1, &mut out);
  assert_eq!(out, [1, 0, 1, 1, 0]);
  let scaled: Vec<u8> = out.iter().map(|&s| sample_to_8(s, 1)).collect();
  assert_eq!(scaled, [255, 0, 255, 255, 0]);
}

#[test]
fn test_pack_unpack_lines() {
  for depth in [1_u8, 2, 4, 8, 16] {
    let max = max_sample(depth);
    let samples: Vec<u16> = (0..13_u16).map(|i| i.wrapping_mul(7919) & max).collect();
    let mut packed = Vec::new();
    pack_line(&samples, depth, &mut packed);
    assert_eq!(packed.len(), (13 * depth as usize + 7) / 8);
    let mut unpacked = Vec::new();
    unpack_line(&packed, 13, 1, depth, &mut unpacked);
    assert_eq!(unpacked, samples, "depth {depth}");
  }
}

#[test]
fn test_to_canonical_palette() {
  let mut image = SampleImage::new(3, 1, 1, 2, true).unwrap();
  image.samples.copy_from_slice(&[0, 1, 3]);
  let palette = [RGB8 { r: 10, g: 20, b: 30 }, RGB8 { r: 40, g: 50, b: 60 }];
  assert_eq!(
    to_canonical(&image, &palette, &[128], true),
    Err(PngError::PaletteIndex { index: 3, palette_len: 2 })
  );
  assert_eq!(
    to_canonical(&image, &palette, &[128], false).unwrap(),
    [10, 20, 30, 128, 40, 50, 60, 255, 0, 0, 0, 255]
  );
}

#[test]
fn test_build_palette_order() {
  let pixels = [1, 1, 1, 255, 2, 2, 2, 255, 1, 1, 1, 255, 3, 3, 3, 0];
  let palette = build_palette(&pixels, 256).unwrap();
  assert_eq!(
    palette,
    [
      RGBA8 { r: 1, g: 1, b: 1, a: 255 },
      RGBA8 { r: 2, g: 2, b: 2, a: 255 },
      RGBA8 { r: 3, g: 3, b: 3, a: 0 }
    ]
  );
  assert_eq!(build_palette(&pixels, 2), Err(PngError::PaletteTooLarge { colors: 3, max: 2 }));
}
