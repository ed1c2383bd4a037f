use super::*;

/// Transparency
///
/// The format depends on the color type:
/// * grayscale: the one gray sample value that's fully transparent.
/// * truecolor: the one RGB sample value that's fully transparent.
/// * indexed: alpha for each palette entry. There can be fewer alpha entries
///   than palette entries, missing entries are fully opaque.
///
/// Color types with an alpha channel can't have this chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub enum tRNS {
  Gray(u16),
  Rgb([u16; 3]),
  Alphas(Vec<u8>),
}
impl tRNS {
  /// The per-index alphas, empty for other kinds.
  #[inline]
  #[must_use]
  pub fn alphas(&self) -> &[u8] {
    match self {
      Self::Alphas(alphas) => alphas,
      _ => &[],
    }
  }
}
impl ChunkCodec for tRNS {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    let header = ctx.header()?;
    Ok(match header.color_type {
      PngColorType::Y => {
        if length != 2 {
          return Err(ctx.invalid("grayscale tRNS must be 2 bytes"));
        }
        Self::Gray(cursor.read_u16_be()?)
      }
      PngColorType::RGB => {
        if length != 6 {
          return Err(ctx.invalid("truecolor tRNS must be 6 bytes"));
        }
        Self::Rgb([cursor.read_u16_be()?, cursor.read_u16_be()?, cursor.read_u16_be()?])
      }
      PngColorType::Index => {
        let palette = ctx.require_palette("tRNS needs a PLTE chunk before it")?;
        if length > palette.len() {
          return Err(ctx.invalid("tRNS has more entries than the palette"));
        }
        Self::Alphas(cursor.read_bytes(length)?.to_vec())
      }
      PngColorType::YA | PngColorType::RGBA => {
        return Err(ctx.invalid("tRNS is not allowed for color types with alpha"))
      }
    })
  }

  /// Adds an alpha channel to grayscale and truecolor images.
  fn post_decode(&self, image: &mut SampleImage, ctx: &DecodeContext<'_>) -> PngResult<()> {
    if !ctx.options.resolve_transparency || image.indexed {
      return Ok(());
    }
    let max = image.max_value();
    match self {
      Self::Gray(key) if image.channels == 1 => image.remap_channels(2, |old, new| {
        new[0] = old[0];
        new[1] = if old[0] == *key { 0 } else { max };
      }),
      Self::Rgb(key) if image.channels == 3 => image.remap_channels(4, |old, new| {
        new[..3].copy_from_slice(old);
        new[3] = if old == key { 0 } else { max };
      }),
      _ => Ok(()),
    }
  }

  fn decode_data(&self, data: &mut PngData, ctx: &DecodeContext<'_>) -> PngResult<()> {
    let depth = ctx.header()?.bit_depth;
    let to_8 = |s: u16| sample_to_8(s.min(max_sample(depth)), depth);
    data.persistent.transparency = Some(match self {
      Self::Gray(y) => {
        let y = to_8(*y);
        Transparency::Color(RGB8 { r: y, g: y, b: y })
      }
      Self::Rgb([r, g, b]) => Transparency::Color(RGB8 { r: to_8(*r), g: to_8(*g), b: to_8(*b) }),
      Self::Alphas(alphas) => Transparency::Alphas(alphas.clone()),
    });
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    let header = ctx.header()?;
    let depth = header.bit_depth;
    let key = match &ctx.data().transparency {
      Some(Transparency::Color(key)) => Some(*key),
      _ => None,
    };
    let planned = match (header.color_type, key) {
      (PngColorType::Index, _) => {
        let mut alphas: Vec<u8> = ctx.palette.iter().map(|c| c.a).collect();
        while alphas.last() == Some(&u8::MAX) {
          alphas.pop();
        }
        (!alphas.is_empty()).then_some(Self::Alphas(alphas))
      }
      (PngColorType::Y, Some(key)) => {
        Some(Self::Gray(sample_from_8(RGBA8::opaque(key).luma(), depth)))
      }
      (PngColorType::RGB, Some(RGB8 { r, g, b })) => Some(Self::Rgb([
        sample_from_8(r, depth),
        sample_from_8(g, depth),
        sample_from_8(b, depth),
      ])),
      (_, Some(_)) => {
        log::debug!("not writing tRNS, the {:?} color type has an alpha channel", header.color_type);
        None
      }
      (_, None) => None,
    };
    Ok(planned.into_iter().collect())
  }

  /// Collapses the extra alpha channel: fully transparent pixels become the
  /// key color, everything else keeps its color.
  fn pre_encode(&self, image: &mut SampleImage, ctx: &EncodeContext<'_>) -> PngResult<()> {
    let header = ctx.header()?;
    let base = header.color_type.channel_count();
    if image.indexed || image.channels != base + 1 {
      return Ok(());
    }
    match self {
      Self::Gray(key) => image.remap_channels(base, |old, new| {
        new[0] = if old[1] == 0 { *key } else { old[0] };
      }),
      Self::Rgb(key) => image.remap_channels(base, |old, new| {
        if old[3] == 0 {
          new.copy_from_slice(key);
        } else {
          new.copy_from_slice(&old[..3]);
        }
      }),
      Self::Alphas(_) => Ok(()),
    }
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    match self {
      Self::Gray(y) => cursor.write_u16_be(*y),
      Self::Rgb(rgb) => rgb.iter().for_each(|s| cursor.write_u16_be(*s)),
      Self::Alphas(alphas) => cursor.write_bytes(alphas),
    }
    Ok(())
  }
}
