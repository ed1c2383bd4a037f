use super::*;

/// Frames the given payloads into a PNG, CRCs and all.
fn build_png(chunks: &[(ChunkTy, &[u8])]) -> Vec<u8> {
  let mut out = ByteCursor::new();
  out.write_bytes(&PNG_SIGNATURE);
  for (ty, payload) in chunks {
    write_raw_chunk(&mut out, *ty, |c| {
      c.write_bytes(payload);
      Ok(())
    })
    .unwrap();
  }
  out.into_vec()
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&width.to_be_bytes());
  v.extend_from_slice(&height.to_be_bytes());
  v.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
  v
}

/// Flips a bit of the CRC of the first chunk of type `ty`.
fn corrupt_crc(bytes: &mut [u8], ty: ChunkTy) {
  let raw = RawChunkIter::new(bytes).map(Result::unwrap).find(|raw| raw.ty == ty).unwrap();
  let crc_at = raw.payload_offset() + raw.data.len();
  bytes[crc_at] ^= 1;
}

fn lenient() -> Decoder {
  Decoder::new(DecodeOptions::default())
}

fn strict() -> Decoder {
  Decoder::new(DecodeOptions { strict: true, ..DecodeOptions::default() })
}

fn one_gray_pixel(extra: &[(ChunkTy, &[u8])]) -> Vec<u8> {
  let header = ihdr(1, 1, 8, 0);
  let idat = deflate(&[0, 0x80], 6);
  let mut chunks: Vec<(ChunkTy, &[u8])> = vec![(ChunkTy::IHDR, &header)];
  chunks.extend_from_slice(extra);
  chunks.push((ChunkTy::IDAT, &idat));
  chunks.push((ChunkTy::IEND, &[]));
  build_png(&chunks)
}

#[test]
fn test_reduced_image_dimensions() {
  assert_eq!(reduced_image_dimensions(0, 0), [(0, 0); 8]);
  // one
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(w, 0)[1].0, ex, "failed w:{w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(0, h)[1].1, ex, "failed h:{h}");
  }
  // two
  for (w, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(w, 0)[2].0, ex, "failed w:{w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(0, h)[2].1, ex, "failed h:{h}");
  }
  // three
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 2, 2, 2, 2]) {
    assert_eq!(reduced_image_dimensions(w, 0)[3].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(0, h)[3].1, ex, "failed h: {h}");
  }
  // four
  for (w, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(reduced_image_dimensions(w, 0)[4].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 2, 2, 2, 2]) {
    assert_eq!(reduced_image_dimensions(0, h)[4].1, ex, "failed h: {h}");
  }
  // five
  for (w, ex) in (1..=8).zip([1, 1, 2, 2, 3, 3, 4, 4]) {
    assert_eq!(reduced_image_dimensions(w, 0)[5].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(reduced_image_dimensions(0, h)[5].1, ex, "failed h: {h}");
  }
  // six
  for (w, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(reduced_image_dimensions(w, 0)[6].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 2, 2, 3, 3, 4, 4]) {
    assert_eq!(reduced_image_dimensions(0, h)[6].1, ex, "failed h: {h}");
  }
  // seven
  for (w, ex) in (1..=8).zip([1, 2, 3, 4, 5, 6, 7, 8]) {
    assert_eq!(reduced_image_dimensions(w, 0)[7].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(reduced_image_dimensions(0, h)[7].1, ex, "failed h: {h}");
  }
  //
  assert_eq!(
    reduced_image_dimensions(8, 8),
    [
      (8, 8), // zeroth
      (1, 1), // one
      (1, 1), // two
      (2, 1), // three
      (2, 2), // four
      (4, 2), // five
      (4, 4), // six
      (8, 4), // seven
    ]
  );
}

#[test]
fn test_decoder_states() {
  let bytes = one_gray_pixel(&[]);
  let mut d = lenient();
  assert_eq!(d.state(), DecodeState::Init);
  let png = d.decode(&bytes).unwrap();
  assert_eq!(png.pixels, [0x80, 0x80, 0x80, 0xFF]);
  assert_eq!(d.state(), DecodeState::Done);
  assert!(png.data.volatile.tolerated.is_empty());

  assert_eq!(d.decode(&bytes[1..]), Err(PngError::Signature));
  assert_eq!(d.state(), DecodeState::Failed);
}

#[test]
fn test_ancillary_crc_mismatch() {
  let mut bytes = one_gray_pixel(&[(ChunkTy::tEXt, b"Title\0hello")]);
  corrupt_crc(&mut bytes, ChunkTy::tEXt);

  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.data.persistent.texts, [TextEntry::plain("Title", "hello")]);
  assert!(matches!(
    png.data.volatile.tolerated[..],
    [Tolerated { ty: ChunkTy::tEXt, issue: ToleratedIssue::CrcMismatch { .. }, .. }]
  ));

  assert!(matches!(strict().decode(&bytes), Err(PngError::CrcMismatch { ty: ChunkTy::tEXt, .. })));
}

#[test]
fn test_critical_crc_mismatch() {
  let mut bytes = one_gray_pixel(&[]);
  corrupt_crc(&mut bytes, ChunkTy::IDAT);
  assert!(matches!(lenient().decode(&bytes), Err(PngError::CrcMismatch { ty: ChunkTy::IDAT, .. })));
}

#[test]
fn test_duplicate_once_only_chunk() {
  let first = 45455_u32.to_be_bytes();
  let second = 100000_u32.to_be_bytes();
  let bytes = one_gray_pixel(&[(ChunkTy::gAMA, &first), (ChunkTy::gAMA, &second)]);

  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.data.persistent.gamma, Some(45455));
  assert_eq!(png.data.volatile.tolerated.len(), 1);
  assert_eq!(png.data.volatile.tolerated[0].issue, ToleratedIssue::Duplicate);

  assert!(matches!(strict().decode(&bytes), Err(PngError::DuplicateChunk { ty: ChunkTy::gAMA, .. })));
}

#[test]
fn test_palette_on_grayscale() {
  let bytes = one_gray_pixel(&[(ChunkTy::PLTE, &[1, 2, 3])]);
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.pixels, [0x80, 0x80, 0x80, 0xFF]);
  assert!(png.data.volatile.palette.is_empty());
  assert!(matches!(strict().decode(&bytes), Err(PngError::ChunkOrder { ty: ChunkTy::PLTE, .. })));
}

#[test]
fn test_invalid_ancillary_chunk_is_dropped() {
  // a gAMA of 0 is meaningless
  let bytes = one_gray_pixel(&[(ChunkTy::gAMA, &[0, 0, 0, 0])]);
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.data.persistent.gamma, None);
  assert!(matches!(png.data.volatile.tolerated[0].issue, ToleratedIssue::Invalid(_)));
  assert!(matches!(strict().decode(&bytes), Err(PngError::InvalidChunk { ty: ChunkTy::gAMA, .. })));
}

#[test]
fn test_split_idat_around_other_chunk() {
  let header = ihdr(1, 1, 8, 0);
  let z = deflate(&[0, 0x40], 6);
  let (a, b) = z.split_at(3);
  let bytes = build_png(&[
    (ChunkTy::IHDR, &header),
    (ChunkTy::IDAT, a),
    (ChunkTy::tEXt, b"k\0v"),
    (ChunkTy::IDAT, b),
    (ChunkTy::IEND, &[]),
  ]);
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.pixels, [0x40, 0x40, 0x40, 0xFF]);
  assert!(png
    .data
    .volatile
    .tolerated
    .iter()
    .any(|t| t.ty == ChunkTy::IDAT && matches!(t.issue, ToleratedIssue::OutOfOrder(_))));
  assert!(matches!(strict().decode(&bytes), Err(PngError::ChunkOrder { ty: ChunkTy::IDAT, .. })));
}

#[test]
fn test_trailing_data() {
  let mut bytes = one_gray_pixel(&[]);
  bytes.extend_from_slice(b"junk");
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.data.volatile.tolerated[0].issue, ToleratedIssue::TrailingData { len: 4 });
  let end = bytes.len() - 4;
  assert_eq!(strict().decode(&bytes), Err(PngError::TrailingData { offset: end, len: 4 }));
}

#[test]
fn test_surplus_image_data() {
  let header = ihdr(1, 1, 8, 0);
  // a few hundred bytes of zlib that inflate to a megabyte
  let idat = deflate(&vec![0; 1 << 20], 10);
  let bytes = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IDAT, &idat), (ChunkTy::IEND, &[])]);
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.pixels, [0, 0, 0, 255]);
  assert_eq!(
    png.data.volatile.tolerated,
    [Tolerated { ty: ChunkTy::IDAT, offset: 33, issue: ToleratedIssue::ExtraImageData }]
  );
  assert_eq!(strict().decode(&bytes), Err(PngError::TooMuchImageData { expected: 2 }));

  let idat = deflate(&[0, 0x80, 1], 6);
  let bytes = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IDAT, &idat), (ChunkTy::IEND, &[])]);
  assert_eq!(lenient().decode(&bytes).unwrap().pixels, [0x80, 0x80, 0x80, 0xFF]);
  assert_eq!(strict().decode(&bytes), Err(PngError::TooMuchImageData { expected: 2 }));
}

#[test]
fn test_metadata_len_limit() {
  let mut ztxt = b"Comment\0\0".to_vec();
  ztxt.extend(deflate(&[b'x'; 100], 6));
  let mut iccp = b"profile\0\0".to_vec();
  iccp.extend(deflate(&[1; 300], 6));
  let bytes = one_gray_pixel(&[(ChunkTy::iCCP, &iccp), (ChunkTy::zTXt, &ztxt)]);

  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.data.persistent.texts.len(), 1);
  assert_eq!(png.data.persistent.icc_profile.map(|p| p.profile.len()), Some(300));

  let options = DecodeOptions { max_metadata_len: 99, ..DecodeOptions::default() };
  let png = Decoder::new(options).decode(&bytes).unwrap();
  assert!(png.data.persistent.texts.is_empty());
  assert!(png.data.persistent.icc_profile.is_none());
  let dropped: Vec<ChunkTy> = png
    .data
    .volatile
    .tolerated
    .iter()
    .filter(|t| matches!(t.issue, ToleratedIssue::Invalid(_)))
    .map(|t| t.ty)
    .collect();
  assert_eq!(dropped, [ChunkTy::iCCP, ChunkTy::zTXt]);

  let options = DecodeOptions { strict: true, max_metadata_len: 99, ..DecodeOptions::default() };
  assert!(matches!(
    Decoder::new(options).decode(&bytes),
    Err(PngError::InvalidChunk { ty: ChunkTy::iCCP, .. })
  ));
}

#[test]
fn test_missing_chunks() {
  let header = ihdr(1, 1, 8, 0);
  let idat = deflate(&[0, 0], 6);
  let no_end = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IDAT, &idat)]);
  assert_eq!(lenient().decode(&no_end), Err(PngError::MissingChunk { ty: ChunkTy::IEND }));
  let no_data = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IEND, &[])]);
  assert_eq!(lenient().decode(&no_data), Err(PngError::MissingChunk { ty: ChunkTy::IDAT }));
  let no_header = build_png(&[(ChunkTy::IDAT, &idat), (ChunkTy::IEND, &[])]);
  assert!(matches!(lenient().decode(&no_header), Err(PngError::ChunkOrder { ty: ChunkTy::IDAT, .. })));
}

#[test]
fn test_indexed_without_palette() {
  let header = ihdr(1, 1, 8, 3);
  let idat = deflate(&[0, 0], 6);
  let bytes = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IDAT, &idat), (ChunkTy::IEND, &[])]);
  assert!(matches!(lenient().decode(&bytes), Err(PngError::ChunkOrder { ty: ChunkTy::IDAT, .. })));
}

#[test]
fn test_palette_index_out_of_range() {
  let header = ihdr(2, 1, 8, 3);
  let idat = deflate(&[0, 0, 5], 6);
  let bytes = build_png(&[
    (ChunkTy::IHDR, &header),
    (ChunkTy::PLTE, &[255, 0, 0]),
    (ChunkTy::IDAT, &idat),
    (ChunkTy::IEND, &[]),
  ]);
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.pixels, [255, 0, 0, 255, 0, 0, 0, 255]);
  assert_eq!(strict().decode(&bytes), Err(PngError::PaletteIndex { index: 5, palette_len: 1 }));
}

#[test]
fn test_illegal_filter_type() {
  let header = ihdr(1, 1, 8, 0);
  let idat = deflate(&[9, 0], 6);
  let bytes = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IDAT, &idat), (ChunkTy::IEND, &[])]);
  assert_eq!(
    lenient().decode(&bytes),
    Err(PngError::IllegalFilterType { filter_type: 9, pass: 0, line: 0 })
  );
}

#[test]
fn test_short_image_data() {
  let header = ihdr(2, 2, 8, 0);
  let idat = deflate(&[0, 1, 2], 6);
  let bytes = build_png(&[(ChunkTy::IHDR, &header), (ChunkTy::IDAT, &idat), (ChunkTy::IEND, &[])]);
  assert_eq!(
    lenient().decode(&bytes),
    Err(PngError::NotEnoughImageData { expected: 6, actual: 3 })
  );
}

#[test]
fn test_max_pixels() {
  let bytes = one_gray_pixel(&[]);
  let mut d = Decoder::new(DecodeOptions { max_pixels: 0, ..DecodeOptions::default() });
  assert!(matches!(d.decode(&bytes), Err(PngError::InvalidArgument(_))));
}

#[test]
fn test_unknown_chunks() {
  let bytes = one_gray_pixel(&[(ChunkTy(*b"prVt"), b"abc"), (ChunkTy(*b"prVT"), b"xyz")]);
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(
    png.data.persistent.unknown_chunks,
    [UnknownChunk { ty: ChunkTy(*b"prVt"), data: b"abc".to_vec() }]
  );
  assert_eq!(
    png.data.volatile.unsafe_chunks,
    [UnknownChunk { ty: ChunkTy(*b"prVT"), data: b"xyz".to_vec() }]
  );
  let unknown = png.data.volatile.tolerated.iter().filter(|t| t.issue == ToleratedIssue::Unknown);
  assert_eq!(unknown.count(), 2);
}

#[test]
fn test_custom_critical_chunk() {
  let custom = ChunkTy(*b"CUSt");
  let mut registry = ChunkRegistry::standard();
  registry.register_custom(custom, band::MISC, true).unwrap();

  let options = EncodeOptions {
    data: PersistentData {
      unknown_chunks: vec![UnknownChunk { ty: custom, data: vec![1, 2, 3] }],
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  // without the registry the encoder refuses it
  assert!(matches!(
    encode_png(1, 1, &[1, 2, 3, 4], &options),
    Err(PngError::InvalidArgument(_))
  ));
  let bytes =
    Encoder::with_registry(options.clone(), registry.clone()).encode(1, 1, &[1, 2, 3, 4]).unwrap();
  assert!(matches!(
    lenient().decode(&bytes),
    Err(PngError::UnknownCriticalChunk { ty, .. }) if ty == custom
  ));
  let png = Decoder::with_registry(DecodeOptions::default(), registry).decode(&bytes).unwrap();
  assert_eq!(png.pixels, [1, 2, 3, 4]);
  assert_eq!(png.data.persistent.unknown_chunks, options.data.unknown_chunks);
  assert!(png.data.volatile.tolerated.is_empty());
}

#[test]
fn test_background_composite() {
  let options = EncodeOptions {
    data: PersistentData {
      background_color: Some(RGB8 { r: 0, g: 0, b: 255 }),
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  let bytes = encode_png(2, 1, &[255, 0, 0, 0, 0, 255, 0, 255], &options).unwrap();
  let plain = lenient().decode(&bytes).unwrap();
  assert_eq!(plain.pixels, [255, 0, 0, 0, 0, 255, 0, 255]);
  assert_eq!(plain.data.persistent.background_color, Some(RGB8 { r: 0, g: 0, b: 255 }));
  let mut d = Decoder::new(DecodeOptions { apply_background: true, ..DecodeOptions::default() });
  assert_eq!(d.decode(&bytes).unwrap().pixels, [0, 0, 255, 255, 0, 255, 0, 255]);
}

#[test]
fn test_transparency_key_round_trip() {
  let options = EncodeOptions {
    color_type: PngColorType::Y,
    data: PersistentData {
      transparency: Some(Transparency::Color(RGB8 { r: 0, g: 0, b: 0 })),
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  let pixels = [9, 9, 9, 0, 255, 255, 255, 255];
  let bytes = encode_png(2, 1, &pixels, &options).unwrap();
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.pixels, [0, 0, 0, 0, 255, 255, 255, 255]);
  assert_eq!(png.data.persistent.transparency, options.data.transparency);

  let mut d =
    Decoder::new(DecodeOptions { resolve_transparency: false, ..DecodeOptions::default() });
  assert_eq!(d.decode(&bytes).unwrap().pixels, [0, 0, 0, 255, 255, 255, 255, 255]);
}

#[test]
fn test_indexed_alpha_round_trip() {
  let options = EncodeOptions { color_type: PngColorType::Index, ..EncodeOptions::default() };
  let pixels = [10, 20, 30, 40, 10, 20, 30, 255, 10, 20, 30, 40];
  let bytes = encode_png(3, 1, &pixels, &options).unwrap();
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.pixels, pixels);
  assert_eq!(
    png.data.volatile.palette,
    [RGB8 { r: 10, g: 20, b: 30 }, RGB8 { r: 10, g: 20, b: 30 }]
  );
  assert_eq!(png.data.persistent.transparency, Some(Transparency::Alphas(vec![40])));
}

#[test]
fn test_palette_too_large() {
  let options =
    EncodeOptions { color_type: PngColorType::Index, bit_depth: 1, ..EncodeOptions::default() };
  let pixels = [1, 1, 1, 255, 2, 2, 2, 255, 3, 3, 3, 255];
  assert_eq!(
    encode_png(3, 1, &pixels, &options),
    Err(PngError::PaletteTooLarge { colors: 3, max: 2 })
  );
}

#[test]
fn test_pixel_not_in_palette() {
  let options = EncodeOptions {
    color_type: PngColorType::Index,
    palette: Some(vec![RGBA8 { r: 0, g: 0, b: 0, a: 255 }]),
    ..EncodeOptions::default()
  };
  assert_eq!(
    encode_png(2, 1, &[0, 0, 0, 255, 1, 1, 1, 255], &options),
    Err(PngError::PaletteLookup { x: 1, y: 0, rgba: [1, 1, 1, 255] })
  );
}

#[test]
fn test_bad_encode_arguments() {
  let options = EncodeOptions::default();
  assert!(matches!(encode_png(2, 2, &[0; 12], &options), Err(PngError::InvalidArgument(_))));
  assert_eq!(encode_png(0, 2, &[], &options), Err(PngError::Header(HeaderError::ZeroDimension)));
  let bad_depth = EncodeOptions { bit_depth: 4, ..EncodeOptions::default() };
  assert_eq!(
    encode_png(1, 1, &[0; 4], &bad_depth),
    Err(PngError::Header(HeaderError::DepthColorCombination { bit_depth: 4, color_type: 6 }))
  );
  let mut e = Encoder::new(options);
  assert!(e.encode(1, 1, &[0; 3]).is_err());
  assert_eq!(e.state(), EncodeState::Failed);
}

#[test]
fn test_idat_splitting() {
  let options = EncodeOptions { max_idat_len: 10, compression_level: 0, ..EncodeOptions::default() };
  let pixels: Vec<u8> = (0..16 * 16 * 4).map(|i| (i * 7) as u8).collect();
  let bytes = encode_png(16, 16, &pixels, &options).unwrap();
  let idats: Vec<RawChunk<'_>> = RawChunkIter::new(&bytes)
    .map(Result::unwrap)
    .filter(|raw| raw.ty == ChunkTy::IDAT)
    .collect();
  assert!(idats.len() > 1);
  assert!(idats.iter().all(|raw| raw.data.len() <= 10));
  assert_eq!(lenient().decode(&bytes).unwrap().pixels, pixels);
}

#[test]
fn test_chunk_order_on_write() {
  let options = EncodeOptions {
    color_type: PngColorType::Index,
    rendering_intent: Some(SrgbIntent::Perceptual),
    data: PersistentData {
      gamma: Some(45455),
      histogram: Some(vec![1, 1]),
      texts: vec![TextEntry::plain("a", "b")],
      modification_time: Some(Timestamp {
        year: 2024,
        month: 2,
        day: 29,
        hour: 23,
        minute: 59,
        second: 60,
      }),
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  let bytes = encode_png(2, 1, &[0, 0, 0, 255, 9, 9, 9, 255], &options).unwrap();
  let order: Vec<ChunkTy> = RawChunkIter::new(&bytes).map(|raw| raw.unwrap().ty).collect();
  assert_eq!(
    order,
    [
      ChunkTy::IHDR,
      ChunkTy::gAMA,
      ChunkTy::sRGB,
      ChunkTy::PLTE,
      ChunkTy::hIST,
      ChunkTy::tIME,
      ChunkTy::tEXt,
      ChunkTy::IDAT,
      ChunkTy::IEND
    ]
  );
  let png = strict().decode(&bytes).unwrap();
  assert_eq!(png.data.persistent, options.data);
  assert_eq!(png.data.volatile.rendering_intent, Some(SrgbIntent::Perceptual));
}

#[cfg(feature = "std")]
#[test]
fn test_palette_gamma() {
  let options = EncodeOptions {
    color_type: PngColorType::Index,
    data: PersistentData { gamma: Some(100_000), ..PersistentData::default() },
    ..EncodeOptions::default()
  };
  let bytes = encode_png(1, 1, &[128, 0, 255, 255], &options).unwrap();
  let mut d = Decoder::new(DecodeOptions {
    apply_gamma: true,
    display_gamma: 1.0,
    ..DecodeOptions::default()
  });
  // gamma 1.0 on a 1.0 display changes nothing
  assert_eq!(d.decode(&bytes).unwrap().pixels, [128, 0, 255, 255]);
  let mut d = Decoder::new(DecodeOptions {
    apply_gamma: true,
    display_gamma: 2.0,
    ..DecodeOptions::default()
  });
  // exponent 1/2: 255 * sqrt(128/255) = 180.66
  assert_eq!(d.decode(&bytes).unwrap().pixels, [181, 0, 255, 255]);
}

/// A 2x1 grayscale image where the first pixel is the transparency key.
fn keyed_gray(gamma: Option<u32>) -> Vec<u8> {
  let options = EncodeOptions {
    color_type: PngColorType::Y,
    data: PersistentData {
      gamma,
      transparency: Some(Transparency::Color(RGB8 { r: 100, g: 100, b: 100 })),
      background_color: Some(RGB8 { r: 50, g: 50, b: 50 }),
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  encode_png(2, 1, &[100, 100, 100, 0, 200, 200, 200, 255], &options).unwrap()
}

#[cfg(feature = "std")]
#[test]
fn test_gamma_keeps_transparency_key() {
  let bytes = keyed_gray(Some(100_000));
  assert_eq!(lenient().decode(&bytes).unwrap().pixels, [100, 100, 100, 0, 200, 200, 200, 255]);
  let gamma = DecodeOptions { apply_gamma: true, display_gamma: 2.0, ..DecodeOptions::default() };
  // exponent 1/2: 255 * sqrt(100/255) = 159.69, 255 * sqrt(200/255) = 225.83
  let png = Decoder::new(gamma).decode(&bytes).unwrap();
  assert_eq!(png.pixels, [160, 160, 160, 0, 226, 226, 226, 255]);

  let both = DecodeOptions { apply_background: true, ..gamma };
  let png = Decoder::new(both).decode(&bytes).unwrap();
  assert_eq!(png.pixels, [50, 50, 50, 255, 226, 226, 226, 255]);

  let options = EncodeOptions {
    color_type: PngColorType::RGB,
    data: PersistentData {
      gamma: Some(45455),
      transparency: Some(Transparency::Color(RGB8 { r: 100, g: 150, b: 200 })),
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  let bytes = encode_png(2, 1, &[100, 150, 200, 0, 10, 20, 30, 255], &options).unwrap();
  let png = Decoder::new(gamma).decode(&bytes).unwrap();
  let alphas: Vec<u8> = png.pixels.chunks_exact(4).map(|px| px[3]).collect();
  assert_eq!(alphas, [0, 255]);
}

#[test]
fn test_background_behind_transparency_key() {
  let bytes = keyed_gray(None);
  let options = DecodeOptions { apply_background: true, ..DecodeOptions::default() };
  let png = Decoder::new(options).decode(&bytes).unwrap();
  assert_eq!(png.pixels, [50, 50, 50, 255, 200, 200, 200, 255]);

  // without transparency there's nothing to show the background through
  let options = DecodeOptions { resolve_transparency: false, ..options };
  let png = Decoder::new(options).decode(&bytes).unwrap();
  assert_eq!(png.pixels, [100, 100, 100, 255, 200, 200, 200, 255]);
}

#[test]
fn test_indexed_background_behind_alpha() {
  let options = EncodeOptions {
    color_type: PngColorType::Index,
    data: PersistentData {
      background_color: Some(RGB8 { r: 4, g: 5, b: 6 }),
      ..PersistentData::default()
    },
    ..EncodeOptions::default()
  };
  let bytes = encode_png(2, 1, &[1, 2, 3, 0, 4, 5, 6, 255], &options).unwrap();
  let bkgd = RawChunkIter::new(&bytes).map(Result::unwrap).find(|raw| raw.ty == ChunkTy::bKGD);
  assert_eq!(bkgd.map(|raw| raw.data), Some(&[1_u8][..]));
  let png = lenient().decode(&bytes).unwrap();
  assert_eq!(png.data.persistent.background_color, Some(RGB8 { r: 4, g: 5, b: 6 }));
  let options = DecodeOptions { apply_background: true, ..DecodeOptions::default() };
  let png = Decoder::new(options).decode(&bytes).unwrap();
  assert_eq!(png.pixels, [4, 5, 6, 255, 4, 5, 6, 255]);
}
