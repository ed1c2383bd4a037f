use super::*;

impl ChunkCodec for UnknownChunk {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let mut data = Vec::new();
    data.try_reserve(length)?;
    data.extend_from_slice(cursor.read_bytes(length)?);
    Ok(Self { ty: ctx.ty, data })
  }

  /// Registered custom chunks and safe-to-copy chunks are kept for
  /// re-encoding, anything else only shows up in the volatile data.
  fn decode_data(&self, data: &mut PngData, ctx: &DecodeContext<'_>) -> PngResult<()> {
    let registered = ctx.registry.get(self.ty).is_some();
    if !registered {
      data.volatile.tolerated.push(Tolerated {
        ty: self.ty,
        offset: ctx.offset,
        issue: ToleratedIssue::Unknown,
      });
    }
    if registered || self.ty.is_safe_to_copy() {
      data.persistent.unknown_chunks.push(self.clone());
    } else {
      data.volatile.unsafe_chunks.push(self.clone());
    }
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let mut out = Vec::new();
    for chunk in &ctx.data().unknown_chunks {
      let custom = ctx.registry.get(chunk.ty).map(|d| d.kind == ChunkKind::Custom);
      match custom {
        Some(false) => {
          return Err(PngError::InvalidArgument("unknown chunk list has a standard chunk type"))
        }
        None if !chunk.ty.is_valid() || chunk.ty.is_critical() => {
          return Err(PngError::InvalidArgument(
            "unregistered chunks must be ancillary with a valid type",
          ))
        }
        _ => out.push(chunk.clone()),
      }
    }
    Ok(out)
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_bytes(&self.data);
    Ok(())
  }
}
