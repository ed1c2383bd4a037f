use super::*;

/// Compressed Latin-1 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct zTXt {
  pub keyword: String,
  /// The decompressed text.
  pub text: String,
}
impl ChunkCodec for zTXt {
  fn parse(cursor: &mut ByteCursor<'_>, _length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let keyword = read_keyword(cursor, ctx)?;
    if cursor.read_u8().map_err(|_| ctx.invalid("zTXt is missing its compression method"))? != 0 {
      return Err(ctx.invalid("unknown compression method"));
    }
    let text = inflate(cursor.read_to_end(), ctx.options.max_metadata_len).map_err(|e| match e {
      PngError::InflateLimit { .. } => ctx.invalid("compressed text is larger than max_metadata_len"),
      _ => ctx.invalid("compressed text is corrupt"),
    })?;
    Ok(Self { keyword, text: latin1_to_string(&text) })
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    let entry =
      TextEntry { keyword: self.keyword.clone(), text: self.text.clone(), kind: TextKind::Compressed };
    data.volatile.compressed_texts.push(entry.clone());
    data.persistent.texts.push(entry);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(
      ctx
        .data()
        .texts
        .iter()
        .filter(|e| e.kind == TextKind::Compressed)
        .map(|e| Self { keyword: e.keyword.clone(), text: e.text.clone() })
        .collect(),
    )
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, ctx: &EncodeContext<'_>) -> PngResult<()> {
    write_keyword(cursor, &self.keyword)?;
    cursor.write_u8(0);
    cursor.write_bytes(&deflate(&string_to_latin1(&self.text)?, ctx.options.compression_level));
    Ok(())
  }
}
