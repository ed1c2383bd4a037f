use super::*;

/// Longest keyword (and profile / palette name) allowed.
pub const MAX_KEYWORD_LEN: usize = 79;

/// Reads a null terminated Latin-1 keyword.
///
/// Strict mode requires 1 to 79 bytes.
pub(crate) fn read_keyword(cursor: &mut ByteCursor<'_>, ctx: &DecodeContext<'_>) -> PngResult<String> {
  let raw = cursor
    .read_until_nul(cursor.remaining())
    .map_err(|_| ctx.invalid("keyword is missing its null separator"))?;
  if raw.is_empty() || raw.len() > MAX_KEYWORD_LEN {
    if ctx.strict() {
      return Err(ctx.invalid("keyword must be 1 to 79 bytes"));
    }
    log::warn!("{} at {} has a {} byte keyword", ctx.ty, ctx.offset, raw.len());
  }
  Ok(latin1_to_string(raw))
}

/// Writes a keyword and its null terminator.
pub(crate) fn write_keyword(cursor: &mut ByteCursor<'_>, keyword: &str) -> PngResult<()> {
  let bytes = string_to_latin1(keyword)?;
  if bytes.is_empty() || bytes.len() > MAX_KEYWORD_LEN || bytes.contains(&0) {
    return Err(PngError::InvalidArgument("keywords must be 1 to 79 Latin-1 bytes with no null"));
  }
  cursor.write_bytes(&bytes);
  cursor.write_u8(0);
  Ok(())
}

/// Uncompressed Latin-1 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct tEXt {
  pub keyword: String,
  pub text: String,
}
impl ChunkCodec for tEXt {
  fn parse(cursor: &mut ByteCursor<'_>, _length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let keyword = read_keyword(cursor, ctx)?;
    let text = latin1_to_string(cursor.read_to_end());
    Ok(Self { keyword, text })
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    let entry = TextEntry { keyword: self.keyword.clone(), text: self.text.clone(), kind: TextKind::Plain };
    data.volatile.texts.push(entry.clone());
    data.persistent.texts.push(entry);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(
      ctx
        .data()
        .texts
        .iter()
        .filter(|e| e.kind == TextKind::Plain)
        .map(|e| Self { keyword: e.keyword.clone(), text: e.text.clone() })
        .collect(),
    )
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    write_keyword(cursor, &self.keyword)?;
    cursor.write_latin1(&self.text)
  }
}
