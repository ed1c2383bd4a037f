use super::*;

/// Image End
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IEND;
impl ChunkCodec for IEND {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length != 0 {
      if ctx.strict() {
        return Err(ctx.invalid("IEND must be empty"));
      }
      log::warn!("IEND at {} has a {length} byte payload, ignoring it", ctx.offset);
      cursor.skip(length)?;
    }
    Ok(IEND)
  }

  fn decode_data(&self, _data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    Ok(())
  }

  fn encode_data(_ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(vec![IEND])
  }

  fn compose(&self, _cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    Ok(())
  }
}
