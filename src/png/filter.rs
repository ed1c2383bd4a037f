//! Scanline filtering.
//!
//! Each scanline of each pass is prefixed with a filter type byte, and the
//! rest of the line is stored as a difference against one of the neighboring
//! bytes:
//! * `a` is the byte one *pixel* to the left (or 0 at the start of the line),
//! * `b` is the byte directly above (or 0 on the first line of a pass),
//! * `c` is the byte above and to the left.
//!
//! Filtering works on bytes, not samples. A pixel of less than one byte is
//! treated as one byte for the purposes of finding `a` and `c`.

use super::*;

/// The five filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl FilterType {
  pub const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];
}
impl TryFrom<u8> for FilterType {
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(other),
    })
  }
}

/// How the encoder picks a filter for each scanline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterStrategy {
  /// Every line uses [`FilterType::None`].
  None,
  Sub,
  Up,
  Average,
  Paeth,
  /// Each line uses whichever filter gives the smallest sum of absolute
  /// (signed) residuals.
  #[default]
  Adaptive,
}
impl FilterStrategy {
  #[inline]
  #[must_use]
  const fn fixed(self) -> Option<FilterType> {
    Some(match self {
      Self::None => FilterType::None,
      Self::Sub => FilterType::Sub,
      Self::Up => FilterType::Up,
      Self::Average => FilterType::Average,
      Self::Paeth => FilterType::Paeth,
      Self::Adaptive => return None,
    })
  }
}

/// The Paeth predictor.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: the order of these tests must not be changed.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Bytes between a byte and its `a` neighbor.
#[inline]
#[must_use]
pub const fn filter_stride(bits_per_pixel: usize) -> usize {
  let bytes = bits_per_pixel / 8;
  if bytes == 0 {
    1
  } else {
    bytes
  }
}

/// Reverses a filter in place. A missing `prev` line is all zeroes.
pub fn unfilter_line(filter_type: FilterType, line: &mut [u8], prev: Option<&[u8]>, stride: usize) {
  let up = |i: usize| prev.map_or(0, |p| p[i]);
  match filter_type {
    FilterType::None => (),
    FilterType::Sub => {
      for i in stride..line.len() {
        line[i] = line[i].wrapping_add(line[i - stride]);
      }
    }
    FilterType::Up => {
      if let Some(prev) = prev {
        line.iter_mut().zip(prev.iter().copied()).for_each(|(x, b)| *x = x.wrapping_add(b));
      }
    }
    FilterType::Average => {
      for i in 0..line.len() {
        let a = if i >= stride { line[i - stride] } else { 0 };
        let avg = ((u16::from(a) + u16::from(up(i))) / 2) as u8;
        line[i] = line[i].wrapping_add(avg);
      }
    }
    FilterType::Paeth => {
      for i in 0..line.len() {
        let (a, c) = if i >= stride { (line[i - stride], up(i - stride)) } else { (0, 0) };
        line[i] = line[i].wrapping_add(paeth_predict(a, up(i), c));
      }
    }
  }
}

/// Applies a filter, writing the residuals to `out` (which must be the same
/// length as `line`).
pub fn filter_line(
  filter_type: FilterType, line: &[u8], prev: Option<&[u8]>, stride: usize, out: &mut [u8],
) {
  let up = |i: usize| prev.map_or(0, |p| p[i]);
  let left = |i: usize| if i >= stride { line[i - stride] } else { 0 };
  for (i, o) in out.iter_mut().enumerate().take(line.len()) {
    let x = line[i];
    *o = match filter_type {
      FilterType::None => x,
      FilterType::Sub => x.wrapping_sub(left(i)),
      FilterType::Up => x.wrapping_sub(up(i)),
      FilterType::Average => {
        x.wrapping_sub(((u16::from(left(i)) + u16::from(up(i))) / 2) as u8)
      }
      FilterType::Paeth => {
        let c = if i >= stride { up(i - stride) } else { 0 };
        x.wrapping_sub(paeth_predict(left(i), up(i), c))
      }
    };
  }
}

/// Sum of residuals read as signed bytes, lower usually compresses better.
#[inline]
#[must_use]
fn residual_cost(residuals: &[u8]) -> u64 {
  residuals.iter().map(|&r| u64::from((r as i8).unsigned_abs())).sum()
}

/// Unfilters every scanline of one pass, in place.
///
/// `data` holds `height` lines of `1 + line_len` bytes each. Afterwards each
/// line's filter byte is 0 and the bytes after it are the raw scanline.
pub fn unfilter_pass(
  data: &mut [u8], line_len: usize, height: usize, stride: usize, pass_level: usize,
) -> PngResult<()> {
  let filterline = line_len + 1;
  let expected = filterline.checked_mul(height).ok_or(PngError::CheckedMath)?;
  if data.len() < expected {
    return Err(PngError::NotEnoughImageData { expected, actual: data.len() });
  }
  let mut prev: Option<&[u8]> = None;
  for (line, chunk) in data[..expected].chunks_exact_mut(filterline).enumerate() {
    let (f, pixels) = chunk.split_at_mut(1);
    let filter_type = FilterType::try_from(f[0]).map_err(|filter_type| {
      PngError::IllegalFilterType { filter_type, pass: pass_level, line }
    })?;
    unfilter_line(filter_type, pixels, prev, stride);
    f[0] = 0;
    prev = Some(&*pixels);
  }
  Ok(())
}

/// Filters every scanline of one pass, appending filter bytes and residuals
/// to `out`.
///
/// `raw` holds `height` lines of exactly `line_len` bytes each.
pub fn filter_pass(
  raw: &[u8], line_len: usize, stride: usize, strategy: FilterStrategy, out: &mut Vec<u8>,
) -> PngResult<()> {
  if line_len == 0 {
    return Ok(());
  }
  let mut scratch: Vec<u8> = Vec::new();
  scratch.try_reserve(line_len)?;
  scratch.resize(line_len, 0);
  let mut best: Vec<u8> = Vec::new();
  best.try_reserve(line_len)?;
  best.resize(line_len, 0);
  let mut prev: Option<&[u8]> = None;
  for line in raw.chunks_exact(line_len) {
    let chosen = match strategy.fixed() {
      Some(filter_type) => {
        filter_line(filter_type, line, prev, stride, &mut best);
        filter_type
      }
      None => {
        let mut chosen = FilterType::None;
        let mut best_cost = u64::MAX;
        for filter_type in FilterType::ALL {
          filter_line(filter_type, line, prev, stride, &mut scratch);
          let cost = residual_cost(&scratch);
          if cost < best_cost {
            best_cost = cost;
            chosen = filter_type;
            core::mem::swap(&mut best, &mut scratch);
          }
        }
        chosen
      }
    };
    out.try_reserve(line_len + 1)?;
    out.push(chosen as u8);
    out.extend_from_slice(&best);
    prev = Some(line);
  }
  Ok(())
}

#[test]
fn test_paeth_predict() {
  assert_eq!(paeth_predict(0, 0, 0), 0);
  // p = 10 + 20 - 5 = 25, closest to b
  assert_eq!(paeth_predict(10, 20, 5), 20);
  // p = 20 + 10 - 5 = 25, closest to a
  assert_eq!(paeth_predict(20, 10, 5), 20);
  // p = 5 + 5 - 10 = 0, ties go to a
  assert_eq!(paeth_predict(5, 5, 10), 5);
  // p = 3 + 9 - 6 = 6, c is closest
  assert_eq!(paeth_predict(3, 9, 6), 6);
  assert_eq!(paeth_predict(100, 50, 100), 50);
}

#[test]
fn test_filter_types_reverse() {
  let prev: Vec<u8> = (0..24_u32).map(|i| (i * 37 % 256) as u8).collect();
  let line: Vec<u8> = (0..24_u32).map(|i| (i * 101 % 256) as u8 ^ 0x5A).collect();
  for stride in [1, 3, 4] {
    for filter_type in FilterType::ALL {
      for prev in [None, Some(prev.as_slice())] {
        let mut filtered = vec![0; line.len()];
        filter_line(filter_type, &line, prev, stride, &mut filtered);
        unfilter_line(filter_type, &mut filtered, prev, stride);
        assert_eq!(filtered, line, "{filter_type:?} stride {stride}, prev {}", prev.is_some());
      }
    }
  }
}

#[test]
fn test_filter_pass_reverses() {
  let line_len = 10;
  let raw: Vec<u8> = (0..50_u32).map(|i| (i * i % 253) as u8).collect();
  for strategy in [
    FilterStrategy::None,
    FilterStrategy::Sub,
    FilterStrategy::Up,
    FilterStrategy::Average,
    FilterStrategy::Paeth,
    FilterStrategy::Adaptive,
  ] {
    let mut filtered = Vec::new();
    filter_pass(&raw, line_len, 2, strategy, &mut filtered).unwrap();
    assert_eq!(filtered.len(), 5 * (line_len + 1));
    unfilter_pass(&mut filtered, line_len, 5, 2, 0).unwrap();
    let unfiltered: Vec<u8> =
      filtered.chunks_exact(line_len + 1).flat_map(|l| l[1..].iter().copied()).collect();
    assert_eq!(unfiltered, raw, "{strategy:?}");
  }
}

#[test]
fn test_unfilter_rejects_bad_filter_type() {
  let mut data = vec![0, 1, 2, 7, 1, 2];
  assert_eq!(
    unfilter_pass(&mut data, 2, 2, 1, 3),
    Err(PngError::IllegalFilterType { filter_type: 7, pass: 3, line: 1 })
  );
}
