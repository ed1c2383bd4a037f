//! Sample value conversion between PNG bit depths and 8 bits per channel.
//!
//! * Depths below 8 scale up by `255 / (2^depth - 1)`. For the depths PNG
//!   allows (1, 2, 4) that's exactly the same as replicating the bit pattern
//!   down through the byte, which is what we do.
//! * Depth 16 scales down as `floor(value * 255 / 65535 + 0.5)`.
//! * Palette indexes are never scaled, use the sample directly.

use bitfrob::u8_replicate_bits;

/// Largest sample value at a given bit depth.
#[inline]
#[must_use]
pub const fn max_sample(bit_depth: u8) -> u16 {
  ((1_u32 << bit_depth) - 1) as u16
}

/// Scales a sample at `bit_depth` into the 0..=255 range.
///
/// ## Panics
/// * If the bit depth isn't 1, 2, 4, 8, or 16.
#[inline]
#[must_use]
pub fn sample_to_8(sample: u16, bit_depth: u8) -> u8 {
  match bit_depth {
    1 | 2 | 4 => u8_replicate_bits(u32::from(bit_depth), sample as u8),
    8 => sample as u8,
    16 => ((u32::from(sample) * 255 + 32767) / 65535) as u8,
    _ => panic!("illegal bit depth"),
  }
}

/// Scales an 8-bit value down (or up) to a sample at `bit_depth`.
///
/// This is the inverse of [`sample_to_8`]: every value that `sample_to_8`
/// produces comes back to the same sample.
///
/// ## Panics
/// * If the bit depth isn't 1, 2, 4, 8, or 16.
#[inline]
#[must_use]
pub fn sample_from_8(value: u8, bit_depth: u8) -> u16 {
  match bit_depth {
    1 | 2 | 4 => {
      let max = u32::from(max_sample(bit_depth));
      ((u32::from(value) * max + 127) / 255) as u16
    }
    8 => u16::from(value),
    16 => u16::from(value) * 257,
    _ => panic!("illegal bit depth"),
  }
}

#[test]
fn test_sample_to_8() {
  assert_eq!(sample_to_8(1, 1), 255);
  assert_eq!(sample_to_8(0, 1), 0);
  assert_eq!(sample_to_8(1, 2), 85);
  assert_eq!(sample_to_8(2, 2), 170);
  assert_eq!(sample_to_8(7, 4), 119);
  assert_eq!(sample_to_8(0xFFFF, 16), 255);
  assert_eq!(sample_to_8(0x7FFF, 16), 127);
  assert_eq!(sample_to_8(0x8080, 16), 128);
}

#[test]
fn test_sample_round_trip() {
  for depth in [1, 2, 4, 8, 16] {
    for s in 0..=u32::from(max_sample(depth)).min(255) {
      let s = s as u16;
      let s = if depth == 16 { s * 257 } else { s };
      assert_eq!(sample_from_8(sample_to_8(s, depth), depth), s, "depth {depth} sample {s}");
    }
  }
}
