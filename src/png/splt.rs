use super::*;

/// Suggested palette.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct sPLT(pub SuggestedPalette);
impl ChunkCodec for sPLT {
  fn parse(cursor: &mut ByteCursor<'_>, _length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let name = read_keyword(cursor, ctx)?;
    let sample_depth = cursor.read_u8().map_err(|_| ctx.invalid("sPLT is missing its depth"))?;
    let entry_len = match sample_depth {
      8 => 6,
      16 => 10,
      _ => return Err(ctx.invalid("sPLT depth must be 8 or 16")),
    };
    let raw = cursor.read_to_end();
    if raw.len() % entry_len != 0 {
      return Err(ctx.invalid("sPLT entries don't fill the chunk"));
    }
    let mut entries = Vec::new();
    entries.try_reserve(raw.len() / entry_len)?;
    let mut c = ByteCursor::from(raw);
    for _ in 0..raw.len() / entry_len {
      let mut sample = || -> PngResult<u16> {
        if sample_depth == 8 {
          c.read_u8().map(u16::from)
        } else {
          c.read_u16_be()
        }
      };
      let (r, g, b, a) = (sample()?, sample()?, sample()?, sample()?);
      let frequency = c.read_u16_be()?;
      entries.push(SuggestedPaletteEntry { r, g, b, a, frequency });
    }
    Ok(Self(SuggestedPalette { name, sample_depth, entries }))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.suggested_palettes.push(self.0.clone());
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let palettes = &ctx.data().suggested_palettes;
    if palettes.iter().any(|p| p.sample_depth != 8 && p.sample_depth != 16) {
      return Err(PngError::InvalidArgument("suggested palette depth must be 8 or 16"));
    }
    Ok(palettes.iter().cloned().map(Self).collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    let p = &self.0;
    write_keyword(cursor, &p.name)?;
    cursor.write_u8(p.sample_depth);
    for e in &p.entries {
      for s in [e.r, e.g, e.b, e.a] {
        if p.sample_depth == 8 {
          cursor.write_u8(s as u8);
        } else {
          cursor.write_u16_be(s);
        }
      }
      cursor.write_u16_be(e.frequency);
    }
    Ok(())
  }
}
