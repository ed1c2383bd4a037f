use super::*;

/// Palette data
///
/// Palette entries are always RGB.
///
/// If you want to have a paletted image with transparency then the
/// transparency info goes in a separate `tRNS` chunk.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct PLTE {
  pub entries: Vec<RGB8>,
}
impl Debug for PLTE {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // prints no more than 4 palette entries
    f.debug_tuple("PLTE")
      .field(&&self.entries[..self.entries.len().min(4)])
      .field(&self.entries.len())
      .finish()
  }
}
impl PLTE {
  /// A palette can't have more than 256 entries.
  pub const MAX_ENTRIES: usize = 256;
}
impl ChunkCodec for PLTE {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length == 0 || length % 3 != 0 {
      return Err(ctx.invalid("palette length must be a non-zero multiple of 3"));
    }
    let count = length / 3;
    if count > Self::MAX_ENTRIES {
      return Err(ctx.invalid("palette has more than 256 entries"));
    }
    let header = ctx.header()?;
    if header.color_type == PngColorType::Index && count > (1_usize << header.bit_depth) {
      return Err(ctx.invalid("palette has more entries than the bit depth can index"));
    }
    let bytes = cursor.read_bytes(length)?;
    let entries = bytemuck::cast_slice::<u8, RGB8>(bytes).to_vec();
    Ok(Self { entries })
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.volatile.palette.clone_from(&self.entries);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    if ctx.header()?.color_type != PngColorType::Index {
      return Ok(Vec::new());
    }
    Ok(vec![Self { entries: ctx.palette.iter().map(|c| c.rgb()).collect() }])
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_bytes(bytemuck::cast_slice(&self.entries));
    Ok(())
  }
}
