use super::*;

/// Background color.
///
/// Gray and RGB colors are always given as `u16` values, within the bit depth
/// range of the rest of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub enum bKGD {
  Gray { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { i: u8 },
}
impl bKGD {
  /// The color at 8 bits per channel.
  ///
  /// Index colors need the palette, and are `None` if out of range.
  #[must_use]
  pub fn to_rgb8(self, bit_depth: u8, palette: &[RGB8]) -> Option<RGB8> {
    let to_8 = |s: u16| sample_to_8(s.min(max_sample(bit_depth)), bit_depth);
    match self {
      Self::Gray { y } => {
        let y = to_8(y);
        Some(RGB8 { r: y, g: y, b: y })
      }
      Self::RGB { r, g, b } => Some(RGB8 { r: to_8(r), g: to_8(g), b: to_8(b) }),
      Self::Index { i } => palette.get(usize::from(i)).copied(),
    }
  }
}
impl TryFrom<&[u8]> for bKGD {
  type Error = ();
  #[inline]
  fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
    Ok(match slice {
      [y0, y1] => bKGD::Gray { y: u16::from_be_bytes([*y0, *y1]) },
      [r0, r1, g0, g1, b0, b1] => bKGD::RGB {
        r: u16::from_be_bytes([*r0, *r1]),
        g: u16::from_be_bytes([*g0, *g1]),
        b: u16::from_be_bytes([*b0, *b1]),
      },
      [i] => bKGD::Index { i: *i },
      _ => return Err(()),
    })
  }
}
impl ChunkCodec for bKGD {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let header = ctx.header()?;
    let expected_len = match header.color_type {
      PngColorType::Y | PngColorType::YA => 2,
      PngColorType::RGB | PngColorType::RGBA => 6,
      PngColorType::Index => {
        let palette = ctx.require_palette("bKGD needs a PLTE chunk before it")?;
        if length == 1 {
          let i = cursor.read_u8()?;
          if usize::from(i) >= palette.len() {
            return Err(ctx.invalid("bKGD index is outside the palette"));
          }
          return Ok(Self::Index { i });
        }
        1
      }
    };
    if length != expected_len {
      return Err(ctx.invalid("bKGD length doesn't match the color type"));
    }
    bKGD::try_from(cursor.read_bytes(length)?).map_err(|()| ctx.invalid("bad bKGD length"))
  }

  fn decode_data(&self, data: &mut PngData, ctx: &DecodeContext<'_>) -> PngResult<()> {
    let header = ctx.header()?;
    let palette = ctx.seen.palette().map_or(&[][..], |p| p.entries.as_slice());
    data.persistent.background_color = self.to_rgb8(header.bit_depth, palette);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let Some(color) = ctx.data().background_color else {
      return Ok(Vec::new());
    };
    let header = ctx.header()?;
    let to = |v: u8| sample_from_8(v, header.bit_depth);
    let planned = match header.color_type {
      PngColorType::Y | PngColorType::YA => Some(Self::Gray { y: to(RGBA8::opaque(color).luma()) }),
      PngColorType::RGB | PngColorType::RGBA => {
        Some(Self::RGB { r: to(color.r), g: to(color.g), b: to(color.b) })
      }
      PngColorType::Index => {
        let found = ctx.palette.iter().position(|c| c.rgb() == color);
        if found.is_none() {
          log::warn!("not writing bKGD, {color:?} isn't in the palette");
        }
        found.and_then(|i| u8::try_from(i).ok()).map(|i| Self::Index { i })
      }
    };
    Ok(planned.into_iter().collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    match *self {
      Self::Gray { y } => cursor.write_u16_be(y),
      Self::RGB { r, g, b } => {
        cursor.write_u16_be(r);
        cursor.write_u16_be(g);
        cursor.write_u16_be(b);
      }
      Self::Index { i } => cursor.write_u8(i),
    }
    Ok(())
  }
}
