use super::*;

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawChunk<'b> {
  /// Chunk type.
  pub ty: ChunkTy,
  /// Chunk payload.
  pub data: &'b [u8],
  /// The CRC stored in the stream.
  pub declared_crc: u32,
  /// Byte offset of the chunk's length field within the whole stream.
  pub offset: usize,
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .field("offset", &self.offset)
      .finish()
  }
}
impl RawChunk<'_> {
  /// Computes the CRC over the type and payload.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.ty.0, self.data)
  }

  #[inline]
  #[must_use]
  pub fn is_crc_correct(&self) -> bool {
    self.actual_crc() == self.declared_crc
  }

  /// Byte offset of the chunk's payload within the whole stream.
  #[inline]
  #[must_use]
  pub const fn payload_offset(&self) -> usize {
    self.offset + 8
  }
}

/// Chunk payloads are limited to `2^31 - 1` bytes.
pub const MAX_CHUNK_LEN: u32 = (1 << 31) - 1;

/// Reads one framed chunk (length, type, payload, CRC) starting at `offset`
/// within the whole stream.
///
/// The CRC is *not* checked here, that's up to the caller.
pub fn read_raw_chunk(bytes: &[u8], offset: usize) -> PngResult<RawChunk<'_>> {
  let mut cursor = ByteCursor::from(bytes);
  cursor.seek(offset)?;
  let length = cursor.read_u32_be()?;
  if length > MAX_CHUNK_LEN {
    return Err(PngError::UnexpectedEnd { offset });
  }
  let ty = ChunkTy(cursor.read_array()?);
  let payload_start = cursor.position();
  let payload_end = payload_start.checked_add(length as usize).ok_or(PngError::CheckedMath)?;
  // the CRC trails the payload, so this also checks the payload is in range.
  if payload_end.checked_add(4).map_or(true, |end| end > bytes.len()) {
    return Err(PngError::UnexpectedEnd { offset });
  }
  cursor.seek(payload_end)?;
  let declared_crc = cursor.read_u32_be()?;
  Ok(RawChunk { ty, data: &bytes[payload_start..payload_end], declared_crc, offset })
}

/// Total bytes a chunk takes up in the stream, framing included.
#[inline]
#[must_use]
pub const fn framed_len(payload_len: usize) -> usize {
  payload_len + 12
}

/// Writes a framed chunk at the cursor, computing the length and CRC.
///
/// `compose` writes the payload.
pub fn write_raw_chunk<F>(cursor: &mut ByteCursor<'_>, ty: ChunkTy, compose: F) -> PngResult<()>
where
  F: FnOnce(&mut ByteCursor<'_>) -> PngResult<()>,
{
  let length_at = cursor.position();
  cursor.write_u32_be(0);
  cursor.write_bytes(&ty.0);
  compose(cursor)?;
  let payload_end = cursor.position();
  let payload_start = length_at + 8;
  let length = u32::try_from(payload_end - payload_start)?;
  if length > MAX_CHUNK_LEN {
    return Err(PngError::InvalidChunk {
      ty,
      offset: length_at,
      reason: "payload is larger than a chunk can hold",
    });
  }
  cursor.patch_u32_be(length_at, length)?;
  let crc = chunk_crc(ty.0, cursor.slice(payload_start..payload_end)?);
  cursor.write_u32_be(crc);
  Ok(())
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// The signature is skipped (not checked, see [`is_png_signature`]). A framing
/// error is returned once and then the iterator stops. Iteration also stops
/// after `IEND`.
#[derive(Debug, Clone)]
pub struct RawChunkIter<'b> {
  bytes: &'b [u8],
  offset: usize,
  done: bool,
}
impl<'b> RawChunkIter<'b> {
  /// Pass the full PNG bytes, it will skip the PNG signature automatically.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, offset: PNG_SIGNATURE.len(), done: bytes.len() < PNG_SIGNATURE.len() }
  }

  /// Offset of the next chunk, or of the end of the data once done.
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = PngResult<RawChunk<'b>>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.done || self.offset >= self.bytes.len() {
      return None;
    }
    match read_raw_chunk(self.bytes, self.offset) {
      Ok(raw) => {
        self.offset += framed_len(raw.data.len());
        if raw.ty == ChunkTy::IEND {
          self.done = true;
        }
        Some(Ok(raw))
      }
      Err(e) => {
        self.done = true;
        Some(Err(e))
      }
    }
  }
}

#[test]
fn test_raw_chunk_framing() {
  let mut out = ByteCursor::new();
  out.write_bytes(&PNG_SIGNATURE);
  write_raw_chunk(&mut out, ChunkTy::tEXt, |c| {
    c.write_bytes(b"a\0b");
    Ok(())
  })
  .unwrap();
  write_raw_chunk(&mut out, ChunkTy::IEND, |_| Ok(())).unwrap();
  let bytes = out.into_vec();
  assert_eq!(&bytes[bytes.len() - 12..], &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);

  let chunks: Vec<_> = RawChunkIter::new(&bytes).collect::<PngResult<_>>().unwrap();
  assert_eq!(chunks.len(), 2);
  assert_eq!(chunks[0].ty, ChunkTy::tEXt);
  assert_eq!(chunks[0].data, b"a\0b");
  assert_eq!(chunks[0].offset, 8);
  assert!(chunks[0].is_crc_correct());
  assert_eq!(chunks[1].offset, 8 + 12 + 3);
}

#[test]
fn test_raw_chunk_truncated() {
  let mut out = ByteCursor::new();
  out.write_bytes(&PNG_SIGNATURE);
  write_raw_chunk(&mut out, ChunkTy::IDAT, |c| {
    c.write_bytes(&[1, 2, 3, 4, 5]);
    Ok(())
  })
  .unwrap();
  let mut bytes = out.into_vec();
  bytes.truncate(bytes.len() - 3);
  let mut it = RawChunkIter::new(&bytes);
  assert_eq!(it.next(), Some(Err(PngError::UnexpectedEnd { offset: 8 })));
  assert_eq!(it.next(), None);
}
