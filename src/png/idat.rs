use super::*;

/// Image Data
///
/// The payloads of all `IDAT` chunks, concatenated in stream order, form a
/// single zlib stream of filtered scanlines.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct IDAT {
  pub data: Vec<u8>,
}
impl Debug for IDAT {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("IDAT").field("len", &self.data.len()).finish()
  }
}
impl IDAT {
  /// Splits compressed image data into chunks of at most `max_len` bytes.
  ///
  /// Empty data still gets one (empty) chunk.
  #[must_use]
  pub fn split(zlib_data: &[u8], max_len: usize) -> Vec<Self> {
    if zlib_data.is_empty() {
      return vec![Self::default()];
    }
    zlib_data.chunks(max_len.max(1)).map(|c| Self { data: c.to_vec() }).collect()
  }
}
impl ChunkCodec for IDAT {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if ctx.header()?.color_type == PngColorType::Index {
      ctx.require_palette("indexed image data needs a PLTE chunk before it")?;
    }
    let mut data = Vec::new();
    data.try_reserve(length)?;
    data.extend_from_slice(cursor.read_bytes(length)?);
    Ok(Self { data })
  }

  fn decode_data(&self, _data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    Ok(())
  }

  /// Image data is planned by the encoder itself once the pixels are
  /// compressed.
  fn encode_data(_ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(Vec::new())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_bytes(&self.data);
    Ok(())
  }
}

#[test]
fn test_idat_split() {
  let data: Vec<u8> = (0..10).collect();
  let parts = IDAT::split(&data, 4);
  assert_eq!(parts.iter().map(|p| p.data.len()).collect::<Vec<_>>(), [4, 4, 2]);
  let joined: Vec<u8> = parts.iter().flat_map(|p| p.data.iter().copied()).collect();
  assert_eq!(joined, data);
  assert_eq!(IDAT::split(&[], 4), [IDAT::default()]);
}
