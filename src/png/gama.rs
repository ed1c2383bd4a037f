use super::*;

/// Image gamma, times 100,000.
///
/// A value of 45455 is a gamma of 1/2.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct gAMA {
  pub gamma: u32,
}
impl gAMA {
  /// Corrects one sample for display:
  /// `max * (s / max) ^ (1 / (gamma * display_gamma))`.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  #[must_use]
  pub fn correct(&self, sample: u16, max: u16, display_gamma: f64) -> u16 {
    let gamma = f64::from(self.gamma) / 100_000.0;
    let exponent = 1.0 / (gamma * display_gamma);
    let max_f = f64::from(max);
    let corrected = max_f * (f64::from(sample) / max_f).powf(exponent);
    (corrected + 0.5).clamp(0.0, max_f) as u16
  }
}
impl ChunkCodec for gAMA {
  fn parse(cursor: &mut ByteCursor<'_>, length: usize, ctx: &DecodeContext<'_>) -> PngResult<Self> {
    if length != 4 {
      return Err(ctx.invalid("gAMA must be 4 bytes"));
    }
    let gamma = cursor.read_u32_be()?;
    if gamma == 0 {
      return Err(ctx.invalid("gAMA of zero"));
    }
    Ok(Self { gamma })
  }

  /// Applies gamma correction to the color channels, if the options ask for
  /// it. Indexed images are corrected through their palette instead.
  fn post_decode(&self, image: &mut SampleImage, ctx: &DecodeContext<'_>) -> PngResult<()> {
    if !ctx.options.apply_gamma || image.indexed {
      return Ok(());
    }
    #[cfg(feature = "std")]
    {
      let max = image.max_value();
      let color_channels = match image.channels {
        2 | 4 => image.channels - 1,
        n => n,
      };
      if color_channels == 0 {
        return Ok(());
      }
      let display_gamma = ctx.options.display_gamma;
      for px in image.samples.chunks_exact_mut(image.channels) {
        for s in &mut px[..color_channels] {
          *s = self.correct(*s, max, display_gamma);
        }
      }
    }
    #[cfg(not(feature = "std"))]
    log::warn!("gamma correction needs the `std` feature, skipping it");
    Ok(())
  }

  fn decode_data(&self, data: &mut PngData, _ctx: &DecodeContext<'_>) -> PngResult<()> {
    data.persistent.gamma = Some(self.gamma);
    Ok(())
  }

  fn encode_data(ctx: &EncodeContext<'_>) -> PngResult<Vec<Self>> {
    Ok(ctx.data().gamma.filter(|g| *g != 0).map(|gamma| Self { gamma }).into_iter().collect())
  }

  fn compose(&self, cursor: &mut ByteCursor<'_>, _ctx: &EncodeContext<'_>) -> PngResult<()> {
    cursor.write_u32_be(self.gamma);
    Ok(())
  }
}

#[test]
#[cfg(feature = "std")]
fn test_gamma_correct() {
  // gamma 1/2.2 on a 2.2 display is (almost exactly) the identity
  let g = gAMA { gamma: 45455 };
  for s in [0, 1, 64, 128, 200, 255] {
    assert!((i32::from(g.correct(s, 255, 2.2)) - i32::from(s)).abs() <= 1, "{s}");
  }
  // linear data gets brightened
  let linear = gAMA { gamma: 100_000 };
  assert!(linear.correct(128, 255, 2.2) > 128);
  assert_eq!(linear.correct(0, 255, 2.2), 0);
  assert_eq!(linear.correct(255, 255, 2.2), 255);
}
