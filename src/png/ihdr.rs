use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  #[default]
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// Bit depths allowed with this color type.
  #[inline]
  #[must_use]
  pub const fn allowed_bit_depths(self) -> &'static [u8] {
    match self {
      Self::Y => &[1, 2, 4, 8, 16],
      Self::Index => &[1, 2, 4, 8],
      Self::RGB | Self::YA | Self::RGBA => &[8, 16],
    }
  }

  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::YA | Self::RGBA)
  }

  #[inline]
  #[must_use]
  pub const fn is_color(self) -> bool {
    matches!(self, Self::RGB | Self::Index | Self::RGBA)
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = HeaderError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      other => return Err(HeaderError::ColorType(other)),
    })
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored with Adam7 interlacing.
  pub is_interlaced: bool,
}
impl IHDR {
  /// Payload length of every `IHDR`.
  pub const LEN: usize = 13;

  /// Builds a header, checking the depth/color combination.
  pub fn new(
    width: u32, height: u32, color_type: PngColorType, bit_depth: u8, is_interlaced: bool,
  ) -> Result<Self, HeaderError> {
    if width == 0 || height == 0 {
      return Err(HeaderError::ZeroDimension);
    }
    if ![1, 2, 4, 8, 16].contains(&bit_depth) {
      return Err(HeaderError::BitDepth(bit_depth));
    }
    if !color_type.allowed_bit_depths().contains(&bit_depth) {
      return Err(HeaderError::DepthColorCombination { bit_depth, color_type: color_type as u8 });
    }
    Ok(Self { width, height, bit_depth, color_type, is_interlaced })
  }

  /// Bits per full pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Bytes of packed pixel data per scanline at the given width, the filter
  /// byte not included.
  ///
  /// When pixels are less than 8 bits it's possible to end up with a partial
  /// byte on the end, so we round up.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self, width: u32) -> usize {
    (self.bits_per_pixel() * (width as usize) + 7) / 8
  }

  /// Distance to the `a` byte when filtering.
  #[inline]
  #[must_use]
  pub const fn filter_stride(&self) -> usize {
    filter_stride(self.bits_per_pixel())
  }

  /// Size of the decompressed image data: every non-empty pass, each line
  /// with its filter byte.
  #[must_use]
  pub fn filtered_data_len(&self) -> usize {
    passes(self.width, self.height, self.is_interlaced)
      .into_iter()
      .filter(|pass| !pass.is_empty())
      .map(|pass| {
        self
          .bytes_per_scanline(pass.width)
          .saturating_add(1)
          .saturating_mul(pass.height as usize)
      })
      .fold(0_usize, usize::saturating_add)
  }

  #[inline]
  #[must_use]
  pub const fn pixel_count(&self) -> u64 {
    (self.width as u64) * (self.height as u64)
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = HeaderError;
  /// Validation happens in field order, so the first bad field is the one
  /// reported.
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
        let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
        if width == 0 || height == 0 {
          return Err(HeaderError::ZeroDimension);
        }
        if ![1, 2, 4, 8, 16].contains(bit_depth) {
          return Err(HeaderError::BitDepth(*bit_depth));
        }
        let color_type = PngColorType::try_from(*color_type)?;
        let header = Self::new(width, height, color_type, *bit_depth, false)?;
        if *compression_method != 0 {
          return Err(HeaderError::CompressionMethod(*compression_method));
        }
        if *filter_method != 0 {
          return Err(HeaderError::FilterMethod(*filter_method));
        }
        let is_interlaced = match interlace_method {
          0 => false,
          1 => true,
          other => return Err(HeaderError::InterlaceMethod(*other)),
        };
        Ok(Self { is_interlaced, ..header })
      }
      _ => Err(HeaderError::Length(value.len())),
    }
  }
}
impl ChunkCodec for IHDR {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, _ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let bytes = cursor.read_bytes(length)?;
    Ok(IHDR::try_from(bytes)?)
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.volatile.header = Some(*self);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let options = ctx.options;
    let header =
      IHDR::new(ctx.width, ctx.height, options.color_type, options.bit_depth, options.interlaced)?;
    Ok(vec![header])
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_u32_be(self.width);
    cursor.write_u32_be(self.height);
    cursor.write_u8(self.bit_depth);
    cursor.write_u8(self.color_type as u8);
    // compression method and filter method are always 0
    cursor.write_u8(0);
    cursor.write_u8(0);
    cursor.write_u8(u8::from(self.is_interlaced));
    Ok(())
  }
}

#[test]
fn test_ihdr_validation_order() {
  let good: [u8; 13] = [0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0];
  assert_eq!(
    IHDR::try_from(&good[..]),
    Ok(IHDR {
      width: 1,
      height: 1,
      bit_depth: 8,
      color_type: PngColorType::RGBA,
      is_interlaced: false
    })
  );
  let with = |i: usize, v: u8| {
    let mut b = good;
    b[i] = v;
    IHDR::try_from(&b[..])
  };
  assert_eq!(with(3, 0), Err(HeaderError::ZeroDimension));
  assert_eq!(with(8, 3), Err(HeaderError::BitDepth(3)));
  assert_eq!(with(9, 9), Err(HeaderError::ColorType(9)));
  assert_eq!(with(8, 4), Err(HeaderError::DepthColorCombination { bit_depth: 4, color_type: 6 }));
  assert_eq!(with(10, 1), Err(HeaderError::CompressionMethod(1)));
  assert_eq!(with(11, 1), Err(HeaderError::FilterMethod(1)));
  assert_eq!(with(12, 2), Err(HeaderError::InterlaceMethod(2)));
  assert_eq!(with(12, 1).map(|h| h.is_interlaced), Ok(true));
  assert_eq!(IHDR::try_from(&good[..12]), Err(HeaderError::Length(12)));
}

#[test]
fn test_ihdr_sizes() {
  let h = IHDR::new(5, 3, PngColorType::Y, 1, false).unwrap();
  assert_eq!(h.bytes_per_scanline(5), 1);
  assert_eq!(h.filter_stride(), 1);
  assert_eq!(h.filtered_data_len(), 6);
  let h = IHDR::new(2, 2, PngColorType::RGBA, 16, true).unwrap();
  assert_eq!(h.filter_stride(), 8);
  // passes 1, 6, and 7 are the non-empty ones for a 2x2 image
  assert_eq!(h.filtered_data_len(), (1 + 8) + (1 + 8) + (1 + 16));
}
