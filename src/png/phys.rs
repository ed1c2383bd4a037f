use super::*;

/// Physical pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct pHYs(pub PhysicalDimensions);
impl ChunkCodec for pHYs {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length != 9 {
      return Err(ctx.invalid("pHYs must be 9 bytes"));
    }
    let pixels_per_unit_x = cursor.read_u32_be()?;
    let pixels_per_unit_y = cursor.read_u32_be()?;
    let unit = match cursor.read_u8()? {
      0 => PhysicalUnit::Unknown,
      1 => PhysicalUnit::Meter,
      _ => return Err(ctx.invalid("unknown pHYs unit")),
    };
    Ok(Self(PhysicalDimensions { pixels_per_unit_x, pixels_per_unit_y, unit }))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.physical_dimensions = Some(self.0);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(ctx.data().physical_dimensions.map(Self).into_iter().collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_u32_be(self.0.pixels_per_unit_x);
    cursor.write_u32_be(self.0.pixels_per_unit_y);
    cursor.write_u8(match self.0.unit {
      PhysicalUnit::Unknown => 0,
      PhysicalUnit::Meter => 1,
    });
    Ok(())
  }
}
