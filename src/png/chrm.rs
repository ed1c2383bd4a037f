use super::*;

/// Primary chromaticities and white point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct cHRM(pub Chromaticities);
impl ChunkCodec for cHRM {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length != 32 {
      return Err(ctx.invalid("cHRM must be 32 bytes"));
    }
    Ok(Self(Chromaticities {
      white_x: cursor.read_u32_be()?,
      white_y: cursor.read_u32_be()?,
      red_x: cursor.read_u32_be()?,
      red_y: cursor.read_u32_be()?,
      green_x: cursor.read_u32_be()?,
      green_y: cursor.read_u32_be()?,
      blue_x: cursor.read_u32_be()?,
      blue_y: cursor.read_u32_be()?,
    }))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.chromaticities = Some(self.0);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(ctx.data().chromaticities.map(Self).into_iter().collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    let c = &self.0;
    for v in [c.white_x, c.white_y, c.red_x, c.red_y, c.green_x, c.green_y, c.blue_x, c.blue_y] {
      cursor.write_u32_be(v);
    }
    Ok(())
  }
}
