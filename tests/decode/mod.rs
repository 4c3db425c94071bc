use ninepatch::{
  decode, decode_with,
  pixel_formats::RGBA8,
  png::{
    png_get_header, png_inflate_image_data, unfilter_decompressed_data, PngChunkType,
    PngColorType, PngRawChunkIter, PngWriter, IHDR,
  },
  DecodeOptions, LayoutBounds, NinePatchError, StretchRegions, LAYOUT_BOUNDS_TAG,
  LAYOUT_BOUNDS_TICK_COLOR, NINE_PATCH_TAG, STRETCH_TICK_COLOR,
};

const K: u32 = STRETCH_TICK_COLOR;
const R: u32 = LAYOUT_BOUNDS_TICK_COLOR;

/// Builds a compiled nine-patch PNG, and remembers the ARGB value that each
/// source pixel should decode to.
pub struct Fixture {
  ihdr: IHDR,
  /// The raw bytes of each pixel, row by row. Packed pixels are one byte each.
  samples: Vec<Vec<u8>>,
  expected: Vec<u32>,
  before: Vec<(PngChunkType, Vec<u8>)>,
  after: Vec<(PngChunkType, Vec<u8>)>,
}

fn sample(x: u32, y: u32, seed: u32) -> u8 {
  (x * 37 + y * 91 + seed * 53) as u8
}

impl Fixture {
  fn new(
    width: u32, height: u32, color_type: PngColorType, bit_depth: u8,
    mut f: impl FnMut(u32, u32) -> (Vec<u8>, u32),
  ) -> Self {
    let mut samples = Vec::new();
    let mut expected = Vec::new();
    for y in 0..height {
      for x in 0..width {
        let (s, argb) = f(x, y);
        samples.push(s);
        expected.push(argb);
      }
    }
    Self {
      ihdr: IHDR { width, height, bit_depth, color_type, is_interlaced: false },
      samples,
      expected,
      before: Vec::new(),
      after: Vec::new(),
    }
  }

  pub fn rgba(width: u32, height: u32) -> Self {
    Self::new(width, height, PngColorType::RGBA, 8, |x, y| {
      let (r, g, b, a) = (sample(x, y, 0), sample(x, y, 1), sample(x, y, 2), sample(x, y, 3));
      (vec![r, g, b, a], u32::from_be_bytes([a, r, g, b]))
    })
  }

  pub fn rgb(width: u32, height: u32) -> Self {
    Self::new(width, height, PngColorType::RGB, 8, |x, y| {
      let (r, g, b) = (sample(x, y, 4), sample(x, y, 5), sample(x, y, 6));
      (vec![r, g, b], u32::from_be_bytes([0xFF, r, g, b]))
    })
  }

  pub fn gray(width: u32, height: u32) -> Self {
    Self::new(width, height, PngColorType::Y, 8, |x, y| {
      let v = sample(x, y, 7);
      (vec![v], u32::from_be_bytes([0xFF, v, v, v]))
    })
  }

  pub fn gray_alpha(width: u32, height: u32) -> Self {
    Self::new(width, height, PngColorType::YA, 8, |x, y| {
      let (v, a) = (sample(x, y, 8), sample(x, y, 9));
      (vec![v, a], u32::from_be_bytes([a, v, v, v]))
    })
  }

  /// 16 palette entries, the first 5 of them with an alpha value.
  fn palette() -> (Vec<u8>, Vec<u8>) {
    let plte = (0..16_u8).flat_map(|i| [i * 16, 255 - i * 16, i * 7]).collect();
    let trns = (0..5_u8).map(|i| i * 50).collect();
    (plte, trns)
  }

  fn palette_argb(i: u8) -> u32 {
    let (plte, trns) = Self::palette();
    match plte.get(usize::from(i) * 3..usize::from(i) * 3 + 3) {
      Some(&[r, g, b]) => {
        let a = trns.get(usize::from(i)).copied().unwrap_or(0xFF);
        u32::from_be_bytes([a, r, g, b])
      }
      _ => 0xFF00_0000,
    }
  }

  /// 8-bit indexes, some of which are past the end of the palette.
  pub fn indexed(width: u32, height: u32) -> Self {
    let mut fixture = Self::new(width, height, PngColorType::Index, 8, |x, y| {
      let i = ((x + 3 * y) % 20) as u8;
      (vec![i], Self::palette_argb(i))
    });
    let (plte, trns) = Self::palette();
    fixture.before.push((PngChunkType::PLTE, plte));
    fixture.before.push((PngChunkType::tRNS, trns));
    fixture
  }

  /// 4-bit indexes, all within the palette.
  pub fn indexed_packed(width: u32, height: u32) -> Self {
    let mut fixture = Self::new(width, height, PngColorType::Index, 4, |x, y| {
      let i = ((x + 3 * y) % 16) as u8;
      (vec![i], Self::palette_argb(i))
    });
    let (plte, trns) = Self::palette();
    fixture.before.push((PngChunkType::PLTE, plte));
    fixture.before.push((PngChunkType::tRNS, trns));
    fixture
  }

  pub fn all_models(width: u32, height: u32) -> Vec<Self> {
    vec![
      Self::rgba(width, height),
      Self::rgb(width, height),
      Self::gray(width, height),
      Self::gray_alpha(width, height),
      Self::indexed(width, height),
      Self::indexed_packed(width, height),
    ]
  }

  pub fn with_regions(mut self, regions: &StretchRegions) -> Self {
    self.before.push((PngChunkType(NINE_PATCH_TAG), regions.to_chunk_data().unwrap()));
    self
  }

  pub fn with_nine_patch(self) -> Self {
    self.with_regions(&StretchRegions::default())
  }

  pub fn with_layout_bounds(mut self, bounds: LayoutBounds) -> Self {
    self.before.push((PngChunkType(LAYOUT_BOUNDS_TAG), bounds.to_chunk_data().unwrap().to_vec()));
    self
  }

  pub fn with_chunk_before(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
    self.before.push((PngChunkType(*tag), data.to_vec()));
    self
  }

  pub fn with_chunk_after(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
    self.after.push((PngChunkType(*tag), data.to_vec()));
    self
  }

  pub fn interlaced(mut self) -> Self {
    self.ihdr.is_interlaced = true;
    self
  }

  fn pack_row<'a>(&self, pixels: impl Iterator<Item = &'a Vec<u8>>) -> Vec<u8> {
    let bits = usize::from(self.ihdr.bit_depth);
    if bits >= 8 {
      return pixels.flatten().copied().collect();
    }
    let per_byte = 8 / bits;
    let pixels: Vec<u8> = pixels.map(|s| s[0]).collect();
    pixels
      .chunks(per_byte)
      .map(|chunk| {
        chunk.iter().enumerate().fold(0_u8, |acc, (i, v)| acc | (v << (8 - bits * (i + 1))))
      })
      .collect()
  }

  fn sample_at(&self, x: u32, y: u32) -> &Vec<u8> {
    &self.samples[(y * self.ihdr.width + x) as usize]
  }

  pub fn build(&self) -> Vec<u8> {
    let IHDR { width, height, .. } = self.ihdr;
    let mut w = PngWriter::new().unwrap();
    w.write_ihdr(&self.ihdr).unwrap();
    for (ty, data) in &self.before {
      w.write_chunk(*ty, data).unwrap();
    }
    if self.ihdr.is_interlaced {
      // (x, y, x step, y step) of each Adam7 pass
      const PASSES: [(u32, u32, u32, u32); 7] = [
        (0, 0, 8, 8),
        (4, 0, 8, 8),
        (0, 4, 4, 8),
        (2, 0, 4, 4),
        (0, 2, 2, 4),
        (1, 0, 2, 2),
        (0, 1, 1, 2),
      ];
      let mut filtered = Vec::new();
      for (x0, y0, dx, dy) in PASSES {
        let xs: Vec<u32> = (x0..width).step_by(dx as usize).collect();
        if xs.is_empty() {
          continue;
        }
        for y in (y0..height).step_by(dy as usize) {
          filtered.push(0);
          filtered.extend(self.pack_row(xs.iter().map(|&x| self.sample_at(x, y))));
        }
      }
      let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, 6);
      w.write_chunk(PngChunkType::IDAT, &compressed).unwrap();
    } else {
      let mut scanlines = Vec::new();
      for y in 0..height {
        scanlines.extend(self.pack_row((0..width).map(|x| self.sample_at(x, y))));
      }
      w.write_image_data(&self.ihdr, &scanlines).unwrap();
    }
    for (ty, data) in &self.after {
      w.write_chunk(*ty, data).unwrap();
    }
    w.finish().unwrap()
  }
}

/// The pixels of a decoded output image.
struct Decoded {
  width: u32,
  height: u32,
  pixels: Vec<u32>,
}
impl Decoded {
  fn read(png: &[u8]) -> Self {
    let ihdr = png_get_header(png).unwrap();
    assert_eq!(ihdr.color_type, PngColorType::RGBA);
    assert_eq!(ihdr.bit_depth, 8);
    assert!(!ihdr.is_interlaced);
    let mut data = png_inflate_image_data(png, &ihdr).unwrap();
    let mut pixels = vec![0; (ihdr.width * ihdr.height) as usize];
    unfilter_decompressed_data(&ihdr, &mut data, |x, y, px| {
      let p = RGBA8 { r: px[0], g: px[1], b: px[2], a: px[3] };
      pixels[(y * ihdr.width + x) as usize] = p.to_argb32();
    })
    .unwrap();
    Self { width: ihdr.width, height: ihdr.height, pixels }
  }
  fn at(&self, row: u32, col: u32) -> u32 {
    self.pixels[(row * self.width + col) as usize]
  }
  fn row(&self, row: u32) -> Vec<u32> {
    (0..self.width).map(|col| self.at(row, col)).collect()
  }
  fn col(&self, col: u32) -> Vec<u32> {
    (0..self.height).map(|row| self.at(row, col)).collect()
  }
  fn interior(&self) -> Vec<u32> {
    let mut out = Vec::new();
    for row in 1..self.height - 1 {
      for col in 1..self.width - 1 {
        out.push(self.at(row, col));
      }
    }
    out
  }
}

#[test]
fn test_output_is_bordered_rgba() {
  let png = decode(&Fixture::rgba(5, 3).with_nine_patch().build()).unwrap();
  let ihdr = png_get_header(&png).unwrap();
  assert_eq!((ihdr.width, ihdr.height), (7, 5));
  let out = Decoded::read(&png);
  assert_eq!(out.pixels.len(), 35);
}

#[test]
fn test_interior_matches_source_pixels() {
  for fixture in Fixture::all_models(7, 5) {
    let png = fixture.with_nine_patch();
    let out = Decoded::read(&decode(&png.build()).unwrap());
    assert_eq!(out.interior(), png.expected, "{:?}", png.ihdr);
  }
}

#[test]
fn test_interlaced_matches_plain() {
  for fixture in Fixture::all_models(11, 9) {
    let fixture = fixture.with_nine_patch();
    let plain = fixture.build();
    let fixture = fixture.interlaced();
    let interlaced = fixture.build();
    assert_ne!(plain, interlaced);
    let plain_out = Decoded::read(&decode(&plain).unwrap());
    let interlaced_out = Decoded::read(&decode(&interlaced).unwrap());
    assert_eq!(plain_out.pixels, interlaced_out.pixels, "{:?}", fixture.ihdr);
    assert_eq!(interlaced_out.interior(), fixture.expected);
  }
}

#[test]
fn test_four_by_four_scenario() {
  let regions = StretchRegions { x_divs: vec![1, 3], ..Default::default() };
  let out = Decoded::read(&decode(&Fixture::rgba(4, 4).with_regions(&regions).build()).unwrap());
  assert_eq!((out.width, out.height), (6, 6));
  assert_eq!(out.row(0), [0, 0, K, K, 0, 0]);
  assert_eq!(out.col(0), [0, K, K, K, K, 0]);
}

#[test]
fn test_stretch_and_padding_ticks() {
  let regions = StretchRegions {
    padding_left: 2,
    padding_right: 1,
    padding_top: 1,
    padding_bottom: 3,
    x_divs: vec![0, 2, 5, 7],
    y_divs: vec![3, 4],
  };
  let out = Decoded::read(&decode(&Fixture::gray(8, 6).with_regions(&regions).build()).unwrap());
  assert_eq!(out.row(0), [0, K, K, 0, 0, 0, K, K, 0, 0]);
  assert_eq!(out.col(0), [0, 0, 0, 0, K, 0, 0, 0]);
  assert_eq!(out.row(7), [0, 0, 0, K, K, K, K, K, 0, 0]);
  assert_eq!(out.col(9), [0, 0, K, K, 0, 0, 0, 0]);
}

#[test]
fn test_layout_bound_ticks() {
  let bounds = LayoutBounds { left: 2, top: 1, right: 1, bottom: 2 };
  let png = Fixture::rgb(5, 5).with_nine_patch().with_layout_bounds(bounds).build();
  let out = Decoded::read(&decode(&png).unwrap());
  assert_eq!(out.row(6), [0, R, R, K, K, R, 0]);
  assert_eq!(out.col(6), [0, R, K, K, R, R, 0]);
  // corners are never painted
  for (row, col) in [(0, 0), (0, 6), (6, 0), (6, 6)] {
    assert_eq!(out.at(row, col), 0);
  }

  let disabled = decode_with(&png, &DecodeOptions { layout_bounds: false }).unwrap();
  let out = Decoded::read(&disabled);
  assert_eq!(out.row(6), [0, K, K, K, K, K, 0]);
  assert_eq!(out.col(6), [0, K, K, K, K, K, 0]);
}

#[test]
fn test_missing_layout_bounds_equals_disabled() {
  let png = Fixture::indexed(6, 4).with_nine_patch().build();
  let enabled = decode(&png).unwrap();
  let disabled = decode_with(&png, &DecodeOptions { layout_bounds: false }).unwrap();
  assert_eq!(enabled, disabled);
}

#[test]
fn test_copy_safe_chunks_are_carried() {
  let png = Fixture::rgba(3, 2)
    .with_chunk_before(b"tEXt", b"Comment\0hello")
    .with_chunk_before(b"gAMA", &[0, 0, 0xB1, 0x8F])
    .with_nine_patch()
    .with_chunk_after(b"zzZz", &[1, 2, 3])
    .build();
  let out = decode(&png).unwrap();
  let chunks: Vec<_> = PngRawChunkIter::new(&out).collect();
  assert!(chunks.iter().all(|c| c.declared_crc() == c.actual_crc()));
  let tys: Vec<[u8; 4]> = chunks.iter().map(|c| c.chunk_type().0).collect();
  assert_eq!(tys, [*b"IHDR", *b"tEXt", NINE_PATCH_TAG, *b"IDAT", *b"zzZz", *b"IEND"]);
  assert_eq!(chunks[1].data(), b"Comment\0hello");
  assert_eq!(chunks[4].data(), [1, 2, 3]);
  // decoding the output again still finds the carried nine-patch chunk
  assert!(decode(&out).is_ok());
}

#[test]
fn test_empty_input_is_empty_output() {
  assert_eq!(decode(&[]), Ok(Vec::new()));
}

#[test]
fn test_missing_nine_patch_chunk() {
  let png = Fixture::rgba(2, 2).build();
  assert_eq!(decode(&png), Err(NinePatchError::ChunkNotFound));
}

#[test]
fn test_truncated_nine_patch_chunk() {
  let mut png = Fixture::rgba(2, 2).build();
  png.extend_from_slice(&[0, 0, 0, 48]);
  png.extend_from_slice(&NINE_PATCH_TAG);
  png.extend_from_slice(&[0, 2, 2, 0, 0, 0, 0, 32, 0, 0]);
  assert_eq!(decode(&png), Err(NinePatchError::MalformedInput));
}

#[test]
fn test_truncated_layout_bounds_chunk() {
  let mut png = Fixture::rgba(2, 2).with_nine_patch().build();
  png.extend_from_slice(&[0, 0, 0, 16]);
  png.extend_from_slice(&LAYOUT_BOUNDS_TAG);
  png.extend_from_slice(&[0, 0, 0, 1, 0, 0]);
  assert_eq!(decode(&png), Err(NinePatchError::MalformedInput));
  // the chunk is never looked at when layout bounds are off
  assert!(decode_with(&png, &DecodeOptions { layout_bounds: false }).is_ok());
}

#[test]
fn test_div_past_image_is_malformed() {
  let regions = StretchRegions { y_divs: vec![1, 9], ..Default::default() };
  let png = Fixture::rgba(3, 3).with_regions(&regions).build();
  assert_eq!(decode(&png), Err(NinePatchError::MalformedInput));
}

#[test]
fn test_sixteen_bit_is_unsupported() {
  let fixture = Fixture::new(2, 2, PngColorType::RGB, 16, |_, _| (vec![0; 6], 0)).with_nine_patch();
  assert_eq!(decode(&fixture.build()), Err(NinePatchError::Unsupported));
}

#[test]
fn test_huge_header_with_tiny_image_data() {
  let ihdr = IHDR {
    width: 12_000,
    height: 12_000,
    bit_depth: 8,
    color_type: PngColorType::RGBA,
    is_interlaced: false,
  };
  let mut w = PngWriter::new().unwrap();
  w.write_ihdr(&ihdr).unwrap();
  w.write_chunk(PngChunkType(NINE_PATCH_TAG), &StretchRegions::default().to_chunk_data().unwrap())
    .unwrap();
  w.write_chunk(PngChunkType::IDAT, &[0x78]).unwrap();
  let png = w.finish().unwrap();
  assert_eq!(decode(&png), Err(NinePatchError::DimensionsTooLarge));
}
