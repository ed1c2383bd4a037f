//! Adam7 interlacing.
//!
//! An interlaced image is stored as 7 "reduced images" (passes), each one
//! sampling the full image on a coarser grid:
//! ```text
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```
//! A non-interlaced image is treated as a single pass covering everything, so
//! the rest of the pipeline never has to care about the difference.

use super::*;

/// Gets the dimensions of all reduced images at once.
///
/// The output uses index 0 as the base image size, and indexes 1 through 7 for
/// the size of reduced images 1 through 7.
#[inline]
#[must_use]
pub const fn reduced_image_dimensions(full_width: u32, full_height: u32) -> [(u32, u32); 8] {
  let full_patterns_wide = full_width / 8;
  let full_patterns_high = full_height / 8;
  //
  let partial_pattern_width = full_width % 8;
  let partial_pattern_height = full_height % 8;
  //
  let zero = (full_width, full_height);
  //
  let first = (
    full_patterns_wide + (partial_pattern_width + 7) / 8,
    full_patterns_high + (partial_pattern_height + 7) / 8,
  );
  let second = (
    full_patterns_wide + (partial_pattern_width + 3) / 8,
    full_patterns_high + (partial_pattern_height + 7) / 8,
  );
  let third = (
    full_patterns_wide * 2 + ((partial_pattern_width + 3) / 4),
    full_patterns_high + ((partial_pattern_height + 3) / 8),
  );
  let fourth = (
    full_patterns_wide * 2 + (partial_pattern_width + 1) / 4,
    full_patterns_high * 2 + (partial_pattern_height + 3) / 4,
  );
  let fifth = (
    full_patterns_wide * 4 + ((partial_pattern_width + 1) / 2),
    full_patterns_high * 2 + (partial_pattern_height + 1) / 4,
  );
  let sixth = (
    full_patterns_wide * 4 + partial_pattern_width / 2,
    full_patterns_high * 4 + ((partial_pattern_height + 1) / 2),
  );
  let seventh = (
    full_patterns_wide * 8 + partial_pattern_width,
    full_patterns_high * 4 + (partial_pattern_height / 2),
  );
  //
  [zero, first, second, third, fourth, fifth, sixth, seventh]
}

/// Converts a reduced image location into the full image location.
///
/// When giving an `image_level` of 0 the output is the same as the input.
///
/// ## Panics
/// * If the image level given exceeds 7.
#[inline]
#[must_use]
pub const fn interlaced_pos_to_full_pos(
  image_level: usize, reduced_x: u32, reduced_y: u32,
) -> (u32, u32) {
  #[allow(clippy::identity_op)]
  match image_level {
    0 /* full image */ => (reduced_x, reduced_y),
    1 => (reduced_x * 8 + 0, reduced_y * 8 + 0),
    2 => (reduced_x * 8 + 4, reduced_y * 8 + 0),
    3 => (reduced_x * 4 + 0, reduced_y * 8 + 4),
    4 => (reduced_x * 4 + 2, reduced_y * 4 + 0),
    5 => (reduced_x * 2 + 0, reduced_y * 4 + 2),
    6 => (reduced_x * 2 + 1, reduced_y * 2 + 0),
    7 => (reduced_x * 1 + 0, reduced_y * 2 + 1),
    _ => panic!("reduced image level must be 1 through 7")
  }
}

/// One reduced image within the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pass {
  /// 0 for a non-interlaced image, otherwise 1 through 7.
  pub level: usize,
  pub width: u32,
  pub height: u32,
}
impl Pass {
  /// Passes with no pixels contribute no scanlines (not even filter bytes).
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }
}

/// The passes of an image, in stream order, empty passes included.
#[must_use]
pub fn passes(width: u32, height: u32, interlaced: bool) -> Vec<Pass> {
  let dims = reduced_image_dimensions(width, height);
  if interlaced {
    (1..=7).map(|level| Pass { level, width: dims[level].0, height: dims[level].1 }).collect()
  } else {
    vec![Pass { level: 0, width, height }]
  }
}

/// Scatters pass images into one full image.
///
/// The passes must be in stream order and match [`passes`] for the full
/// dimensions (empty passes included).
pub fn deinterlace(passes: Vec<SampleImage>, width: u32, height: u32) -> PngResult<SampleImage> {
  if passes.len() == 1 {
    if let Some(only) = passes.into_iter().next() {
      return Ok(only);
    }
    return Err(PngError::InvalidArgument("no passes to deinterlace"));
  }
  if passes.len() != 7 {
    return Err(PngError::InvalidArgument("an interlaced image has 7 passes"));
  }
  let (channels, bit_depth, indexed) = (passes[0].channels, passes[0].bit_depth, passes[0].indexed);
  let mut full = SampleImage::new(width, height, channels, bit_depth, indexed)?;
  for (i, pass) in passes.iter().enumerate() {
    let level = i + 1;
    for reduced_y in 0..pass.height {
      for reduced_x in 0..pass.width {
        let (x, y) = interlaced_pos_to_full_pos(level, reduced_x, reduced_y);
        if x < width && y < height {
          full.pixel_mut(x, y).copy_from_slice(pass.pixel(reduced_x, reduced_y));
        }
      }
    }
  }
  Ok(full)
}

/// Gathers a full image into pass images, in stream order.
///
/// A non-interlaced image comes back as a single pass.
pub fn interlace(image: SampleImage, interlaced: bool) -> PngResult<Vec<SampleImage>> {
  if !interlaced {
    return Ok(vec![image]);
  }
  let mut out = Vec::with_capacity(7);
  for pass in passes(image.width, image.height, true) {
    let mut reduced =
      SampleImage::new(pass.width, pass.height, image.channels, image.bit_depth, image.indexed)?;
    for reduced_y in 0..pass.height {
      for reduced_x in 0..pass.width {
        let (x, y) = interlaced_pos_to_full_pos(pass.level, reduced_x, reduced_y);
        reduced.pixel_mut(reduced_x, reduced_y).copy_from_slice(image.pixel(x, y));
      }
    }
    out.push(reduced);
  }
  Ok(out)
}

#[test]
fn test_adam7_covers_every_pixel_once() {
  for (w, h) in [(1, 1), (3, 5), (8, 8), (37, 37), (9, 2)] {
    let mut hits = vec![0_u32; (w * h) as usize];
    for pass in passes(w, h, true) {
      for ry in 0..pass.height {
        for rx in 0..pass.width {
          let (x, y) = interlaced_pos_to_full_pos(pass.level, rx, ry);
          assert!(x < w && y < h, "pass {} put ({rx},{ry}) at ({x},{y})", pass.level);
          hits[(y * w + x) as usize] += 1;
        }
      }
    }
    assert!(hits.iter().all(|&n| n == 1), "{w}x{h}: {hits:?}");
  }
}

#[test]
fn test_interlace_then_deinterlace() {
  let (w, h) = (37, 37);
  let mut image = SampleImage::new(w, h, 2, 8, false).unwrap();
  for (i, s) in image.samples.iter_mut().enumerate() {
    *s = (i % 251) as u16;
  }
  let passes = interlace(image.clone(), true).unwrap();
  assert_eq!(passes.len(), 7);
  assert_eq!(passes.iter().map(|p| (p.width * p.height) as usize).sum::<usize>(), 37 * 37);
  assert_eq!(deinterlace(passes, w, h).unwrap(), image);
}
