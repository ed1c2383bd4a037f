use super::*;

/// Significant bits per channel of the original image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct sBIT(pub SignificantBits);
impl SignificantBits {
  #[inline]
  #[must_use]
  pub fn to_vec(self) -> Vec<u8> {
    match self {
      Self::Gray { y } => vec![y],
      Self::Rgb { r, g, b } => vec![r, g, b],
      Self::GrayAlpha { y, a } => vec![y, a],
      Self::Rgba { r, g, b, a } => vec![r, g, b, a],
    }
  }

  /// If the layout fits the color type and every value is within the sample
  /// depth. Indexed images describe the palette's RGB, at 8 bits.
  #[inline]
  #[must_use]
  fn matches(self, header: &IHDR) -> bool {
    let max = if header.color_type == PngColorType::Index { 8 } else { header.bit_depth };
    let layout_ok = matches!(
      (self, header.color_type),
      (Self::Gray { .. }, PngColorType::Y)
        | (Self::Rgb { .. }, PngColorType::RGB | PngColorType::Index)
        | (Self::GrayAlpha { .. }, PngColorType::YA)
        | (Self::Rgba { .. }, PngColorType::RGBA)
    );
    layout_ok && self.to_vec().iter().all(|&v| (1..=max).contains(&v))
  }
}
impl ChunkCodec for sBIT {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let header = ctx.header()?;
    let expected_len = match header.color_type {
      PngColorType::Y => 1,
      PngColorType::RGB | PngColorType::Index => 3,
      PngColorType::YA => 2,
      PngColorType::RGBA => 4,
    };
    if length != expected_len {
      return Err(ctx.invalid("sBIT length doesn't match the color type"));
    }
    let b = cursor.read_bytes(length)?;
    let bits = match *b {
      [y] => SignificantBits::Gray { y },
      [r, g, bb] => SignificantBits::Rgb { r, g, b: bb },
      [y, a] => SignificantBits::GrayAlpha { y, a },
      [r, g, bb, a] => SignificantBits::Rgba { r, g, b: bb, a },
      _ => return Err(ctx.invalid("sBIT length doesn't match the color type")),
    };
    if ctx.strict() && !bits.matches(header) {
      return Err(ctx.invalid("sBIT values must be between 1 and the sample depth"));
    }
    Ok(Self(bits))
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.significant_bits = Some(self.0);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let Some(bits) = ctx.data().significant_bits else {
      return Ok(Vec::new());
    };
    let header = ctx.header()?;
    if !bits.matches(header) {
      log::warn!("not writing sBIT, {bits:?} doesn't fit the {:?} color type", header.color_type);
      return Ok(Vec::new());
    }
    Ok(vec![Self(bits)])
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_bytes(&self.0.to_vec());
    Ok(())
  }
}
