//! Module for pixel formats.
//!
//! The codec's canonical pixel format is [`RGBA8`]: four 8-bit channels, red
//! first, no padding between pixels or rows. Palettes store [`RGB8`] entries.
//!
//! Both types are [`Pod`], so a canonical byte buffer can be viewed as a
//! slice of pixels (and back) with [`bytemuck::cast_slice`].
//!
//! ### Between Gray and RGB
//! When going from grayscale to RGB one just simply copies the gray value to
//! each of the RGB channels.
//!
//! However, the reverse isn't quite true. Because the human eyes don't respond
//! equally to all three colors, converting an RGB image to grayscale isn't a
//! plain average. Instead, there's some weighting, as follows:
//! ```text
//! Y = 0.299 * R + 0.587 * G + 0.114 * B
//! ```

use bytemuck::{Pod, Zeroable};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}
impl From<[u8; 3]> for RGB8 {
  #[inline]
  #[must_use]
  fn from([r, g, b]: [u8; 3]) -> Self {
    Self { r, g, b }
  }
}

/// An 8-bit RGBA color, the canonical pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  /// Opaque version of an RGB color.
  #[inline]
  #[must_use]
  pub const fn opaque(RGB8 { r, g, b }: RGB8) -> Self {
    Self { r, g, b, a: u8::MAX }
  }

  #[inline]
  #[must_use]
  pub const fn rgb(self) -> RGB8 {
    RGB8 { r: self.r, g: self.g, b: self.b }
  }

  #[inline]
  #[must_use]
  pub const fn to_array(self) -> [u8; 4] {
    [self.r, self.g, self.b, self.a]
  }

  /// Weighted luma of the color (ITU-R BT.601 weights, rounded).
  ///
  /// Gray colors (where all three channels match) come back unchanged.
  #[inline]
  #[must_use]
  pub const fn luma(self) -> u8 {
    if self.r == self.g && self.g == self.b {
      return self.r;
    }
    let y = (299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32 + 500) / 1000;
    y as u8
  }
}
impl From<[u8; 4]> for RGBA8 {
  #[inline]
  #[must_use]
  fn from([r, g, b, a]: [u8; 4]) -> Self {
    Self { r, g, b, a }
  }
}

#[test]
fn test_luma() {
  assert_eq!(RGBA8::from([7, 7, 7, 0]).luma(), 7);
  assert_eq!(RGBA8::from([255, 0, 0, 255]).luma(), 76);
  assert_eq!(RGBA8::from([255, 255, 254, 255]).luma(), 255);
}
