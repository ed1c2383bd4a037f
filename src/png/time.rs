use super::*;

/// Last modification time (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tIME(pub Timestamp);
impl Timestamp {
  /// If every field is in range (a leap second is allowed).
  #[inline]
  #[must_use]
  pub const fn is_valid(&self) -> bool {
    matches!(self.month, 1..=12)
      && matches!(self.day, 1..=31)
      && self.hour <= 23
      && self.minute <= 59
      && self.second <= 60
  }
}
impl ChunkCodec for tIME {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length != 7 {
      return Err(ctx.invalid("tIME must be 7 bytes"));
    }
    let time = Timestamp {
      year: cursor.read_u16_be()?,
      month: cursor.read_u8()?,
      day: cursor.read_u8()?,
      hour: cursor.read_u8()?,
      minute: cursor.read_u8()?,
      second: cursor.read_u8()?,
    };
    if ctx.strict() && !time.is_valid() {
      return Err(ctx.invalid("tIME field out of range"));
    }
    Ok(Self(time))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.modification_time = Some(self.0);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    match ctx.data().modification_time {
      Some(time) if !time.is_valid() => Err(PngError::InvalidArgument("modification time out of range")),
      time => Ok(time.map(Self).into_iter().collect()),
    }
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    let t = &self.0;
    cursor.write_u16_be(t.year);
    cursor.write_bytes(&[t.month, t.day, t.hour, t.minute, t.second]);
    Ok(())
  }
}
