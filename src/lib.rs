#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

//! A chunk-oriented PNG decoder and encoder.
//!
//! Every chunk type is its own codec with parse, decode, encode, and compose
//! steps (see [`png::ChunkCodec`]), and a [`png::ChunkRegistry`] decides which
//! chunk types are understood and what order they're written in.
//!
//! ```
//! use pngkit::png::*;
//! let pixels = [0_u8, 0, 0, 255, 255, 255, 255, 255];
//! let options = EncodeOptions {
//!   color_type: PngColorType::Y,
//!   bit_depth: 1,
//!   ..EncodeOptions::default()
//! };
//! let bytes = encode_png(2, 1, &pixels, &options).unwrap();
//! let decoded = decode_png(&bytes, true).unwrap();
//! assert_eq!(decoded.pixels, pixels);
//! assert_eq!(decoded.data.volatile.header.map(|h| h.bit_depth), Some(1));
//! ```
//!
//! ## Features
//! * `std` (default): gamma correction, which needs floating point `powf`.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod byte_cursor;
pub use byte_cursor::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod bit_depth_changes;
pub use bit_depth_changes::*;

pub mod png;

/// Used by various image formats that support sRGB colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
// Note(Lokathor): This doesn't have direct impls to parse to and from bytes
// because each format uses different bytes to mean each of these options.
pub enum SrgbIntent {
  /// for images preferring good adaptation to the output device gamut at the
  /// expense of colorimetric accuracy, such as photographs.
  Perceptual,
  /// for images requiring colour appearance matching (relative to the output
  /// device white point), such as logos.
  RelativeColorimetric,
  /// for images preferring preservation of saturation at the expense of hue and
  /// lightness, such as charts and graphs.
  Saturation,
  /// for images requiring preservation of absolute colorimetry, such as
  /// previews of images destined for a different output device (proofs).
  AbsoluteColorimetric,
}
