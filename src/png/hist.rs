use super::*;

/// Palette histogram: approximate usage of each palette entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct hIST {
  pub frequencies: Vec<u16>,
}
impl ChunkCodec for hIST {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let palette = ctx.require_palette("hIST needs a PLTE chunk before it")?;
    if length != palette.len() * 2 {
      return Err(ctx.invalid("hIST needs one entry per palette entry"));
    }
    let frequencies = (0..palette.len()).map(|_| cursor.read_u16_be()).collect::<PngResult<_>>()?;
    Ok(Self { frequencies })
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.histogram = Some(self.frequencies.clone());
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let Some(frequencies) = &ctx.data().histogram else {
      return Ok(Vec::new());
    };
    if ctx.palette.is_empty() || frequencies.len() != ctx.palette.len() {
      log::warn!(
        "not writing hIST, it has {} entries for a {} entry palette",
        frequencies.len(),
        ctx.palette.len()
      );
      return Ok(Vec::new());
    }
    Ok(vec![Self { frequencies: frequencies.clone() }])
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    self.frequencies.iter().for_each(|f| cursor.write_u16_be(*f));
    Ok(())
  }
}
