use super::*;

/// Embedded ICC profile.
#[derive(Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct iCCP(pub IccProfile);
impl Debug for iCCP {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("iCCP")
      .field("name", &self.0.name)
      .field("profile_len", &self.0.profile.len())
      .finish()
  }
}
impl ChunkCodec for iCCP {
  fn parse(cursor: &mut ByteCursor<'_>, _length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let name = read_keyword(cursor, ctx)?;
    if cursor.read_u8().map_err(|_| ctx.invalid("iCCP is missing its compression method"))? != 0 {
      return Err(ctx.invalid("unknown compression method"));
    }
    let profile = inflate(cursor.read_to_end(), ctx.options.max_metadata_len).map_err(|e| match e {
      PngError::InflateLimit { .. } => ctx.invalid("profile is larger than max_metadata_len"),
      _ => ctx.invalid("compressed profile is corrupt"),
    })?;
    Ok(Self(IccProfile { name, profile }))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.icc_profile = Some(self.0.clone());
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    if ctx.data().icc_profile.is_some() && ctx.options.rendering_intent.is_some() {
      log::warn!("writing both iCCP and sRGB, readers should prefer iCCP");
    }
    Ok(ctx.data().icc_profile.clone().map(Self).into_iter().collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, ctx: &EncodeContext<'_>) -> PngResult<()> {
    write_keyword(cursor, &self.0.name)?;
    cursor.write_u8(0);
    cursor.write_bytes(&deflate(&self.0.profile, ctx.options.compression_level));
    Ok(())
  }
}
