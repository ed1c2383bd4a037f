use super::*;

impl TryFrom<u8> for SrgbIntent {
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::Perceptual,
      1 => Self::RelativeColorimetric,
      2 => Self::Saturation,
      3 => Self::AbsoluteColorimetric,
      other => return Err(other),
    })
  }
}
impl From<SrgbIntent> for u8 {
  #[inline]
  fn from(intent: SrgbIntent) -> Self {
    match intent {
      SrgbIntent::Perceptual => 0,
      SrgbIntent::RelativeColorimetric => 1,
      SrgbIntent::Saturation => 2,
      SrgbIntent::AbsoluteColorimetric => 3,
    }
  }
}

/// The image uses the sRGB color space, with this rendering intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct sRGB(pub SrgbIntent);
impl ChunkCodec for sRGB {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length != 1 {
      return Err(ctx.invalid("sRGB must be 1 byte"));
    }
    let intent =
      SrgbIntent::try_from(cursor.read_u8()?).map_err(|_| ctx.invalid("unknown rendering intent"))?;
    Ok(Self(intent))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.volatile.rendering_intent = Some(self.0);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(ctx.options.rendering_intent.map(Self).into_iter().collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_u8(u8::from(self.0));
    Ok(())
  }
}
