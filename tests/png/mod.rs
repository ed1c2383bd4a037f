use pngkit::{png::*, sample_to_8, HeaderError, PngError, SrgbIntent, RGB8, RGBA8};

fn chunk(ty: &[u8; 4], payload: &[u8]) -> Vec<u8> {
  let mut hasher = crc32fast::Hasher::new();
  hasher.update(ty);
  hasher.update(payload);
  let mut v = Vec::new();
  v.extend_from_slice(&(payload.len() as u32).to_be_bytes());
  v.extend_from_slice(ty);
  v.extend_from_slice(payload);
  v.extend_from_slice(&hasher.finalize().to_be_bytes());
  v
}

fn png_with_header(ihdr: &[u8]) -> Vec<u8> {
  let mut v = PNG_SIGNATURE.to_vec();
  v.extend(chunk(b"IHDR", ihdr));
  v.extend(chunk(b"IDAT", &deflate(&[0, 0], 6)));
  v.extend(chunk(b"IEND", &[]));
  v
}

#[test]
fn test_minimal_gray_png() {
  let bytes = png_with_header(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]);
  let png = decode_png(&bytes, true).unwrap();
  assert_eq!((png.width, png.height), (1, 1));
  assert_eq!(png.pixels, [0, 0, 0, 255]);
  assert_eq!(png.rgba8(), [RGBA8 { r: 0, g: 0, b: 0, a: 255 }]);
  let header = png.data.volatile.header.unwrap();
  assert_eq!(header.bit_depth, 8);
  assert_eq!(header.color_type, PngColorType::Y);
  assert!(!header.is_interlaced);
  assert_eq!(png_get_header(&bytes), Ok(header));
}

#[test]
fn test_bad_signature() {
  let mut bytes = png_with_header(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]);
  bytes[1] = b'p';
  assert_eq!(decode_png(&bytes, false), Err(PngError::Signature));
  assert_eq!(decode_png(&[], false), Err(PngError::Signature));
}

#[test]
fn test_header_rejections() {
  let table: [([u8; 13], HeaderError); 5] = [
    ([0, 0, 0, 1, 0, 0, 0, 1, 3, 0, 0, 0, 0], HeaderError::BitDepth(3)),
    (
      [0, 0, 0, 1, 0, 0, 0, 1, 4, 2, 0, 0, 0],
      HeaderError::DepthColorCombination { bit_depth: 4, color_type: 2 },
    ),
    ([0, 0, 0, 0, 0, 0, 0, 1, 8, 0, 0, 0, 0], HeaderError::ZeroDimension),
    ([0, 0, 0, 1, 0, 0, 0, 1, 8, 9, 0, 0, 0], HeaderError::ColorType(9)),
    ([0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 1, 0, 0], HeaderError::CompressionMethod(1)),
  ];
  for (ihdr, expected) in table {
    let bytes = png_with_header(&ihdr);
    assert_eq!(decode_png(&bytes, false), Err(PngError::Header(expected)), "{ihdr:?}");
  }
}

#[test]
fn test_crc_matches_crc32fast() {
  for len in [0, 1, 13, 100, 4000] {
    let data = super::rand_bytes(len);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(b"IDAT");
    hasher.update(&data);
    assert_eq!(chunk_crc(*b"IDAT", &data), hasher.finalize());
  }
  assert_eq!(chunk_crc(*b"IEND", &[]), 0xAE426082);
}

/// Random pixels that survive a trip through the given format unchanged.
fn exact_pixels(color_type: PngColorType, bit_depth: u8, count: usize) -> Vec<u8> {
  let noise = super::rand_bytes(count * 4);
  let sample = |byte: u8| match bit_depth {
    1 | 2 | 4 => sample_to_8(u16::from(byte) & ((1 << bit_depth) - 1), bit_depth),
    _ => byte,
  };
  noise
    .chunks_exact(4)
    .flat_map(|n| match color_type {
      PngColorType::Y => {
        let y = sample(n[0]);
        [y, y, y, 255]
      }
      PngColorType::YA => [n[0], n[0], n[0], n[1]],
      PngColorType::RGB => [n[0], n[1], n[2], 255],
      PngColorType::RGBA => [n[0], n[1], n[2], n[3]],
      // few enough distinct colors to fit the palette
      PngColorType::Index => {
        let i = n[0] & ((1 << bit_depth.min(4)) - 1);
        [i, i.wrapping_mul(3), 200, 255 - i]
      }
    })
    .collect()
}

#[test]
fn test_round_trips() {
  let color_types =
    [PngColorType::Y, PngColorType::RGB, PngColorType::Index, PngColorType::YA, PngColorType::RGBA];
  for color_type in color_types {
    for &bit_depth in color_type.allowed_bit_depths() {
      for interlaced in [false, true] {
        for (width, height) in [(1, 1), (3, 5), (17, 9)] {
          let pixels = exact_pixels(color_type, bit_depth, width * height);
          let options = EncodeOptions { color_type, bit_depth, interlaced, ..EncodeOptions::default() };
          let bytes = encode_png(width as u32, height as u32, &pixels, &options).unwrap();
          let png = decode_png(&bytes, true).unwrap();
          let what = format!("{color_type:?} {bit_depth} {interlaced} {width}x{height}");
          assert_eq!(png.pixels, pixels, "{what}");
          let header = png.data.volatile.header.unwrap();
          assert_eq!(header.bit_depth, bit_depth, "{what}");
          assert_eq!(header.color_type, color_type, "{what}");
          assert_eq!(header.is_interlaced, interlaced, "{what}");
        }
      }
    }
  }
}

#[test]
fn test_every_filter_strategy() {
  let pixels = exact_pixels(PngColorType::RGBA, 8, 13 * 7);
  let strategies = [
    FilterStrategy::None,
    FilterStrategy::Sub,
    FilterStrategy::Up,
    FilterStrategy::Average,
    FilterStrategy::Paeth,
    FilterStrategy::Adaptive,
  ];
  for filter in strategies {
    for bit_depth in [8, 16] {
      let options = EncodeOptions { filter, bit_depth, ..EncodeOptions::default() };
      let bytes = encode_png(13, 7, &pixels, &options).unwrap();
      assert_eq!(decode_png(&bytes, true).unwrap().pixels, pixels, "{filter:?} {bit_depth}");
    }
  }
}

fn rich_metadata() -> PersistentData {
  PersistentData {
    background_color: Some(RGB8 { r: 10, g: 20, b: 30 }),
    chromaticities: Some(Chromaticities {
      white_x: 31270,
      white_y: 32900,
      red_x: 64000,
      red_y: 33000,
      green_x: 30000,
      green_y: 60000,
      blue_x: 15000,
      blue_y: 6000,
    }),
    gamma: Some(45455),
    histogram: None,
    physical_dimensions: Some(PhysicalDimensions {
      pixels_per_unit_x: 2835,
      pixels_per_unit_y: 2835,
      unit: PhysicalUnit::Meter,
    }),
    texts: vec![
      TextEntry::plain("Title", "A picture"),
      TextEntry::plain("Author", "Somebody"),
      TextEntry {
        keyword: "Comment".into(),
        text: "compressed comment text ".repeat(8),
        kind: TextKind::Compressed,
      },
      TextEntry {
        keyword: "Description".into(),
        text: "h\u{e9}llo \u{2713}".into(),
        kind: TextKind::International {
          compressed: true,
          language: "en-us".into(),
          translated_keyword: "Beschreibung".into(),
        },
      },
      TextEntry {
        keyword: "Source".into(),
        text: "plain utf-8 \u{1F600}".into(),
        kind: TextKind::International {
          compressed: false,
          language: String::new(),
          translated_keyword: String::new(),
        },
      },
    ],
    modification_time: Some(Timestamp { year: 2024, month: 7, day: 14, hour: 9, minute: 3, second: 0 }),
    icc_profile: Some(IccProfile { name: "fake profile".into(), profile: vec![7; 300] }),
    transparency: None,
    significant_bits: Some(SignificantBits::Rgb { r: 5, g: 6, b: 5 }),
    suggested_palettes: vec![
      SuggestedPalette {
        name: "small".into(),
        sample_depth: 8,
        entries: vec![SuggestedPaletteEntry { r: 1, g: 2, b: 3, a: 255, frequency: 9 }],
      },
      SuggestedPalette {
        name: "deep".into(),
        sample_depth: 16,
        entries: vec![
          SuggestedPaletteEntry { r: 1000, g: 2000, b: 3000, a: 65535, frequency: 1 },
          SuggestedPaletteEntry { r: 0, g: 0, b: 0, a: 0, frequency: 0 },
        ],
      },
    ],
    unknown_chunks: vec![UnknownChunk { ty: ChunkTy(*b"prVt"), data: b"private bytes".to_vec() }],
  }
}

#[test]
fn test_metadata_round_trip() {
  let options = EncodeOptions {
    color_type: PngColorType::RGB,
    bit_depth: 16,
    interlaced: true,
    data: rich_metadata(),
    ..EncodeOptions::default()
  };
  let pixels = exact_pixels(PngColorType::RGB, 16, 6 * 4);
  let bytes = encode_png(6, 4, &pixels, &options).unwrap();
  let png = decode_png(&bytes, false).unwrap();
  assert_eq!(png.pixels, pixels);
  assert_eq!(png.data.persistent, options.data);
  assert_eq!(png.data.volatile.texts.len(), 2);
  assert_eq!(png.data.volatile.compressed_texts.len(), 1);
  assert_eq!(png.data.volatile.international_texts.len(), 2);
  // the private chunk is the only thing that isn't understood
  assert_eq!(png.data.volatile.tolerated.len(), 1);
  assert_eq!(png.data.volatile.tolerated[0].issue, ToleratedIssue::Unknown);

  // encoding the decoded data again gives the same bytes
  let again = EncodeOptions { data: png.data.persistent.clone(), ..options };
  assert_eq!(encode_png(6, 4, &png.pixels, &again).unwrap(), bytes);
}

#[test]
fn test_srgb_intent() {
  for intent in [
    SrgbIntent::Perceptual,
    SrgbIntent::RelativeColorimetric,
    SrgbIntent::Saturation,
    SrgbIntent::AbsoluteColorimetric,
  ] {
    let options = EncodeOptions { rendering_intent: Some(intent), ..EncodeOptions::default() };
    let bytes = encode_png(1, 1, &[1, 2, 3, 4], &options).unwrap();
    let png = decode_png(&bytes, true).unwrap();
    assert_eq!(png.data.volatile.rendering_intent, Some(intent));
  }
}

#[test]
fn test_bad_text_keyword() {
  let data = PersistentData { texts: vec![TextEntry::plain("", "no keyword")], ..Default::default() };
  let options = EncodeOptions { data, ..EncodeOptions::default() };
  assert!(encode_png(1, 1, &[0; 4], &options).is_err());
}

#[test]
fn test_RawChunkIter_no_panics() {
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in RawChunkIter::new(&v) {
      //
    }
  }
}

#[test]
fn test_decode_garbage_no_panics() {
  for _ in 0..20 {
    let mut v = PNG_SIGNATURE.to_vec();
    v.extend(super::rand_bytes(512));
    let _ = decode_png(&v, false);
    let _ = decode_png(&v[8..], false);
  }
  let pixels = exact_pixels(PngColorType::RGBA, 8, 8 * 8);
  let options = EncodeOptions { interlaced: true, ..EncodeOptions::default() };
  let good = encode_png(8, 8, &pixels, &options).unwrap();
  for _ in 0..200 {
    let mut v = good.clone();
    let noise = super::rand_bytes(4);
    let at = (usize::from(noise[0]) << 8 | usize::from(noise[1])) % v.len();
    v[at] ^= noise[2] | 1;
    let _ = decode_png(&v, false);
    v.truncate(usize::from(noise[3]) % v.len());
    let _ = decode_png(&v, false);
  }
}
