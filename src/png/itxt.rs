use super::*;

/// International (UTF-8) text, optionally compressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct iTXt {
  pub keyword: String,
  pub compressed: bool,
  /// RFC 3066 language tag, can be empty.
  pub language: String,
  /// The keyword, translated into the language.
  pub translated_keyword: String,
  pub text: String,
}
impl iTXt {
  #[must_use]
  fn to_entry(&self) -> TextEntry {
    TextEntry {
      keyword: self.keyword.clone(),
      text: self.text.clone(),
      kind: TextKind::International {
        compressed: self.compressed,
        language: self.language.clone(),
        translated_keyword: self.translated_keyword.clone(),
      },
    }
  }
}
impl ChunkCodec for iTXt {
  fn parse(cursor: &mut ByteCursor<'_>, _length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let keyword = read_keyword(cursor, ctx)?;
    let [flag, method] = cursor.read_array().map_err(|_| ctx.invalid("iTXt is truncated"))?;
    let compressed = match flag {
      0 => false,
      1 => true,
      _ => return Err(ctx.invalid("iTXt compression flag must be 0 or 1")),
    };
    if compressed && method != 0 {
      return Err(ctx.invalid("unknown compression method"));
    }
    let language = latin1_to_string(
      cursor
        .read_until_nul(cursor.remaining())
        .map_err(|_| ctx.invalid("language tag is missing its null separator"))?,
    );
    let translated = cursor
      .read_until_nul(cursor.remaining())
      .map_err(|_| ctx.invalid("translated keyword is missing its null separator"))?;
    let translated_keyword = core::str::from_utf8(translated)
      .map_err(|_| ctx.invalid("translated keyword is not UTF-8"))?
      .into();
    let raw = cursor.read_to_end();
    let text_bytes: Cow<'_, [u8]> = if compressed {
      Cow::Owned(inflate(raw, ctx.options.max_metadata_len).map_err(|e| match e {
        PngError::InflateLimit { .. } => ctx.invalid("compressed text is larger than max_metadata_len"),
        _ => ctx.invalid("compressed text is corrupt"),
      })?)
    } else {
      Cow::Borrowed(raw)
    };
    let text = core::str::from_utf8(&text_bytes).map_err(|_| ctx.invalid("text is not UTF-8"))?.into();
    Ok(Self { keyword, compressed, language, translated_keyword, text })
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    let entry = self.to_entry();
    data.volatile.international_texts.push(entry.clone());
    data.persistent.texts.push(entry);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(
      ctx
        .data()
        .texts
        .iter()
        .filter_map(|e| match &e.kind {
          TextKind::International { compressed, language, translated_keyword } => Some(Self {
            keyword: e.keyword.clone(),
            compressed: *compressed,
            language: language.clone(),
            translated_keyword: translated_keyword.clone(),
            text: e.text.clone(),
          }),
          _ => None,
        })
        .collect(),
    )
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, ctx: &EncodeContext<'_>) -> PngResult<()> {
    write_keyword(cursor, &self.keyword)?;
    cursor.write_u8(u8::from(self.compressed));
    cursor.write_u8(0);
    if self.language.contains('\0') || self.translated_keyword.contains('\0') {
      return Err(PngError::InvalidArgument("iTXt language and translated keyword can't contain null"));
    }
    cursor.write_latin1(&self.language)?;
    cursor.write_u8(0);
    cursor.write_utf8(&self.translated_keyword);
    cursor.write_u8(0);
    if self.compressed {
      cursor.write_bytes(&deflate(self.text.as_bytes(), ctx.options.compression_level));
    } else {
      cursor.write_utf8(&self.text);
    }
    Ok(())
  }
}
