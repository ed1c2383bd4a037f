//! Zlib compression, provided by `miniz_oxide`.
//!
//! The only PNG specific part is turning the library errors into our errors.

use super::*;

use miniz_oxide::{
  deflate::compress_to_vec_zlib,
  inflate::{decompress_to_vec_zlib_with_limit, DecompressError, TINFLStatus},
};

/// Highest compression level accepted by [`deflate`].
pub const MAX_COMPRESSION_LEVEL: u8 = 10;

/// Decompresses a zlib stream, producing at most `limit` bytes.
///
/// The flag is `true` when the stream has more output than `limit` allows.
/// In that case only the first `limit` bytes are returned.
pub fn inflate_up_to(zlib_data: &[u8], limit: usize) -> PngResult<(Vec<u8>, bool)> {
  // one byte of headroom, so a stream of exactly `limit` bytes can finish
  match decompress_to_vec_zlib_with_limit(zlib_data, limit.saturating_add(1)) {
    Ok(mut out) | Err(DecompressError { status: TINFLStatus::HasMoreOutput, output: mut out }) => {
      let more = out.len() > limit;
      out.truncate(limit);
      Ok((out, more))
    }
    Err(e) => {
      log::debug!("zlib inflate failed: {:?}", e.status);
      Err(PngError::Decompression)
    }
  }
}

/// Decompresses a complete zlib stream of at most `limit` bytes.
pub fn inflate(zlib_data: &[u8], limit: usize) -> PngResult<Vec<u8>> {
  match inflate_up_to(zlib_data, limit)? {
    (out, false) => Ok(out),
    (_, true) => Err(PngError::InflateLimit { limit }),
  }
}

/// Compresses bytes into a complete zlib stream.
///
/// `level` is clamped to `0..=10`.
#[inline]
#[must_use]
pub fn deflate(data: &[u8], level: u8) -> Vec<u8> {
  compress_to_vec_zlib(data, level.min(MAX_COMPRESSION_LEVEL))
}

#[test]
fn test_zlib_round_trip() {
  let data: Vec<u8> = (0..2000_u32).map(|i| (i % 7) as u8).collect();
  for level in [0, 1, 6, 10, 200] {
    let z = deflate(&data, level);
    assert_eq!(inflate(&z, data.len()).unwrap(), data);
  }
}

#[test]
fn test_inflate_corrupt() {
  let mut z = deflate(b"some text that will be compressed", 6);
  let half = z.len() / 2;
  z.truncate(half);
  assert_eq!(inflate(&z, 1000), Err(PngError::Decompression));
  assert_eq!(inflate(&[1, 2, 3], 1000), Err(PngError::Decompression));
}

#[test]
fn test_inflate_limit() {
  let z = deflate(&[7; 5000], 6);
  assert_eq!(inflate(&z, 4999), Err(PngError::InflateLimit { limit: 4999 }));
  let (head, more) = inflate_up_to(&z, 10).unwrap();
  assert_eq!(head, [7; 10]);
  assert!(more);
  assert_eq!(inflate_up_to(&z, 5000).unwrap(), (vec![7; 5000], false));
  assert_eq!(inflate_up_to(&z, 1 << 20).unwrap(), (vec![7; 5000], false));
}
