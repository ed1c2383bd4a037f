#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Library Design Assumptions
//!
//! * The entire PNG data stream is a single byte slice, and the encoder
//!   produces a single `Vec<u8>`. There's no streaming.
//! * Pixels go in and come out as RGBA8 (`width * height * 4` bytes,
//!   row-major), whatever the color type and bit depth of the PNG.
//! * Everything else (text, gamma, timestamps, and so on) goes through
//!   [`PngData`].
//!
//! ## Decoding
//!
//! Call [`decode_png`] for the defaults, or set up a [`Decoder`] with
//! [`DecodeOptions`]. A decoder that should keep some private chunk types can
//! be made with [`Decoder::with_registry`].
//!
//! ## Encoding
//!
//! Call [`encode_png`], or use an [`Encoder`]. The [`EncodeOptions`] pick the
//! color type, bit depth, interlacing, filtering, and compression, and carry
//! the [`PersistentData`] to write.
//!
//! ## Parsing Errors
//!
//! Quoting [section 13.2 of the PNG
//! spec](https://www.w3.org/TR/2003/REC-PNG-20031110/#13Decoders.Errors):
//!
//! > Errors that have little or no effect on the processing of the image may be
//! > ignored, while those that affect critical data shall be dealt with in a
//! > manner appropriate to the application.
//!
//! In our case, that means that by default we ignore what we can:
//!
//! * CRC mismatches on ancillary chunks that are safe to copy.
//! * Duplicates of chunks that may appear only once (you get the first one).
//! * Most of the chunk ordering rules.
//! * Ancillary chunks with bad contents, which are dropped.
//! * Data after `IEND`.
//! * Image data that inflates past what the header needs (only the needed
//!   part is ever decompressed).
//!
//! Each of these is logged and listed in [`VolatileData::tolerated`]. With
//! [`DecodeOptions::strict`] they're all errors instead.
//!
//! Problems with critical data are always errors: a bad signature, a broken
//! `IHDR`, CRC mismatches on critical chunks, unknown critical chunks,
//! corrupt compressed data, and illegal filter types. Compressed text and ICC
//! profiles bigger than [`DecodeOptions::max_metadata_len`] count as invalid
//! chunks.

pub(crate) use alloc::{borrow::Cow, collections::BTreeMap, string::String, vec, vec::Vec};
pub(crate) use core::fmt::{Debug, Display, Write};

pub(crate) use crate::{
  bit_depth_changes::*, latin1_to_string, string_to_latin1, ByteCursor, HeaderError, PngError,
  PngResult, SrgbIntent, RGB8, RGBA8,
};

/// The first eight bytes of every PNG.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Checks if the PNG signature is correct.
#[inline]
#[must_use]
pub fn is_png_signature(bytes: &[u8]) -> bool {
  bytes.starts_with(&PNG_SIGNATURE)
}

mod chunk_ty;
pub use chunk_ty::*;

mod crc32;
pub use crc32::*;

mod zlib;
pub use zlib::*;

mod raw_chunk;
pub use raw_chunk::*;

mod registry;
pub use registry::*;

mod chunk;
pub use chunk::*;

mod data;
pub use data::*;

mod filter;
pub use filter::*;

mod interlace;
pub use interlace::*;

mod scale;
pub use scale::*;

mod decoder;
pub use decoder::*;

mod encoder;
pub use encoder::*;

// critical chunks

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod idat;
pub use idat::*;

mod iend;
pub use iend::*;

// ancillary chunks

mod trns;
pub use trns::*;

mod gama;
pub use gama::*;

mod chrm;
pub use chrm::*;

mod srgb;
pub use srgb::*;

mod iccp;
pub use iccp::*;

mod text;
pub use text::*;

mod ztxt;
pub use ztxt::*;

mod itxt;
pub use itxt::*;

mod bkgd;
pub use bkgd::*;

mod hist;
pub use hist::*;

mod phys;
pub use phys::*;

mod sbit;
pub use sbit::*;

mod splt;
pub use splt::*;

mod time;
pub use time::*;

mod unknown;
pub use unknown::*;

#[cfg(test)]
mod tests;
