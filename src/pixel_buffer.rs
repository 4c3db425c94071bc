#![forbid(unsafe_code)]

//! The bordered ARGB pixel buffer, filled from a source PNG and written back
//! out as an RGBA PNG.

use alloc::vec::Vec;

use crate::{
  pixel_formats::{gray_argb32, opaque_argb32, RGB8, RGBA8},
  png::{
    is_png_header_correct, png_get_copy_safe_chunks, png_get_header, png_get_palette,
    png_get_transparency, png_inflate_image_data, unfilter_decompressed_data, CopySafeChunks,
    PngColorType, PngWriter, IHDR,
  },
  NinePatchError, NinePatchResult,
};

/// How the pixels of a source image turn into ARGB.
///
/// This is resolved once per image from the header, and then the extraction
/// picks one per-pixel conversion for the whole image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceColorModel<'b> {
  /// Palette lookups. `alphas` is the transparency table, which may be shorter
  /// than the palette (or empty).
  Indexed { palette: &'b [RGB8], alphas: &'b [u8] },
  Grayscale,
  GrayscaleAlpha,
  Truecolor,
  TruecolorAlpha,
}
impl<'b> SourceColorModel<'b> {
  /// Picks the color model for an image.
  ///
  /// ## Failure
  /// * [`MalformedInput`](NinePatchError::MalformedInput) for an indexed image
  ///   without a palette.
  /// * [`Unsupported`](NinePatchError::Unsupported) for any channel depth
  ///   other than 8 bits. Indexed images can use packed indexes, since their
  ///   palette is always 8 bits per channel.
  pub fn resolve(ihdr: &IHDR, png: &'b [u8]) -> NinePatchResult<Self> {
    Ok(match (ihdr.color_type, ihdr.bit_depth) {
      (PngColorType::Index, 1 | 2 | 4 | 8) => {
        let palette = png_get_palette(png).ok_or(NinePatchError::MalformedInput)?;
        let alphas = png_get_transparency(png).unwrap_or(&[]);
        Self::Indexed { palette, alphas }
      }
      (PngColorType::Y, 8) => Self::Grayscale,
      (PngColorType::YA, 8) => Self::GrayscaleAlpha,
      (PngColorType::RGB, 8) => Self::Truecolor,
      (PngColorType::RGBA, 8) => Self::TruecolorAlpha,
      _ => return Err(NinePatchError::Unsupported),
    })
  }

  /// Resolves a palette index. Indexes past the end of the palette are opaque
  /// black, indexes past the end of the transparency table are opaque.
  #[inline]
  #[must_use]
  fn index_to_argb32(palette: &[RGB8], alphas: &[u8], i: u8) -> u32 {
    let RGB8 { r, g, b } = palette.get(usize::from(i)).copied().unwrap_or_default();
    let a = alphas.get(usize::from(i)).copied().unwrap_or(u8::MAX);
    RGBA8 { r, g, b, a }.to_argb32()
  }
}

/// A row-major grid of ARGB pixels with a one pixel border on every side.
///
/// The buffer is `source_width + 2` wide and `source_height + 2` tall. Row and
/// column 0, and the last row and column, are the border. Every cell starts
/// as fully transparent `0x0000_0000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
  source_width: u32,
  source_height: u32,
  pixels: Vec<u32>,
}
impl PixelBuffer {
  /// Makes a transparent buffer for a source image of the given size.
  pub fn new_bordered(source_width: u32, source_height: u32) -> NinePatchResult<Self> {
    let too_large = NinePatchError::DimensionsTooLarge;
    let width = source_width.checked_add(2).ok_or(too_large)?;
    let height = source_height.checked_add(2).ok_or(too_large)?;
    let len = (width as usize).checked_mul(height as usize).ok_or(too_large)?;
    let mut pixels = Vec::new();
    pixels.try_reserve(len)?;
    pixels.resize(len, 0);
    Ok(Self { source_width, source_height, pixels })
  }

  /// Width of the source image (without the border).
  #[inline]
  #[must_use]
  pub const fn source_width(&self) -> u32 {
    self.source_width
  }
  /// Height of the source image (without the border).
  #[inline]
  #[must_use]
  pub const fn source_height(&self) -> u32 {
    self.source_height
  }
  /// Width of the buffer, including the border.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.source_width + 2
  }
  /// Height of the buffer, including the border.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.source_height + 2
  }
  /// All the pixels, row by row.
  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[u32] {
    &self.pixels
  }

  #[inline]
  #[must_use]
  const fn index_of(&self, row: u32, col: u32) -> Option<usize> {
    if row < self.height() && col < self.width() {
      Some(row as usize * self.width() as usize + col as usize)
    } else {
      None
    }
  }

  /// Gets the pixel at `(row, col)` in buffer coordinates.
  #[inline]
  #[must_use]
  pub fn get(&self, row: u32, col: u32) -> Option<u32> {
    self.index_of(row, col).map(|i| self.pixels[i])
  }

  /// Gets the pixel at `(row, col)` in buffer coordinates.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, row: u32, col: u32) -> Option<&mut u32> {
    self.index_of(row, col).map(|i| &mut self.pixels[i])
  }

  /// One row of the buffer, border included.
  #[inline]
  #[must_use]
  pub fn row(&self, row: u32) -> Option<&[u32]> {
    let start = self.index_of(row, 0)?;
    self.pixels.get(start..start + self.width() as usize)
  }

  /// Writes a source pixel, which goes one down and one right of its source
  /// position. Positions outside the source image are dropped.
  #[inline]
  fn put_source_pixel(&mut self, x: u32, y: u32, argb: u32) {
    if x < self.source_width && y < self.source_height {
      if let Some(p) = self.get_mut(y + 1, x + 1) {
        *p = argb;
      }
    }
  }

  /// Decodes a PNG into a bordered buffer, and collects the chunks that need
  /// to be carried into the output.
  ///
  /// The border is left transparent.
  pub fn extract(png: &[u8]) -> NinePatchResult<Extracted<'_>> {
    if !is_png_header_correct(png) {
      log::debug!("PNG signature is wrong, reading the chunks anyway");
    }
    let ihdr = png_get_header(png).ok_or(NinePatchError::MalformedInput)?;
    log::debug!(
      "source is {}x{}, {:?} at {} bits, interlaced: {}",
      ihdr.width,
      ihdr.height,
      ihdr.color_type,
      ihdr.bit_depth,
      ihdr.is_interlaced
    );
    if ihdr.width == 0 || ihdr.height == 0 {
      return Err(NinePatchError::MalformedInput);
    }
    let model = SourceColorModel::resolve(&ihdr, png)?;
    // inflating first also checks the header's size against the image data
    let mut zlib_buffer = png_inflate_image_data(png, &ihdr)?;
    let mut buffer = Self::new_bordered(ihdr.width, ihdr.height)?;
    let zlib = &mut zlib_buffer[..];
    let b = &mut buffer;
    match model {
      SourceColorModel::Indexed { palette, alphas } => {
        unfilter_decompressed_data(&ihdr, zlib, |x, y, data| {
          if let [i] = *data {
            b.put_source_pixel(x, y, SourceColorModel::index_to_argb32(palette, alphas, i));
          }
        })?
      }
      SourceColorModel::Grayscale => unfilter_decompressed_data(&ihdr, zlib, |x, y, data| {
        if let [gray] = *data {
          b.put_source_pixel(x, y, gray_argb32(gray, u8::MAX));
        }
      })?,
      SourceColorModel::GrayscaleAlpha => unfilter_decompressed_data(&ihdr, zlib, |x, y, data| {
        if let [gray, a] = *data {
          b.put_source_pixel(x, y, gray_argb32(gray, a));
        }
      })?,
      SourceColorModel::Truecolor => unfilter_decompressed_data(&ihdr, zlib, |x, y, data| {
        if let [r, g, b_] = *data {
          b.put_source_pixel(x, y, opaque_argb32(r, g, b_));
        }
      })?,
      SourceColorModel::TruecolorAlpha => unfilter_decompressed_data(&ihdr, zlib, |x, y, data| {
        if let [r, g, b_, a] = *data {
          b.put_source_pixel(x, y, RGBA8 { r, g, b: b_, a }.to_argb32());
        }
      })?,
    }
    let copy_safe = png_get_copy_safe_chunks(png)?;
    log::debug!("carrying {} copy-safe chunks", copy_safe.len());
    Ok(Extracted { buffer, copy_safe })
  }

  /// Encodes the whole buffer as an 8-bit RGBA PNG.
  ///
  /// The `copy_safe` chunks are written on the same side of the image data as
  /// they were found.
  pub fn encode(&self, copy_safe: &CopySafeChunks<'_>) -> NinePatchResult<Vec<u8>> {
    let ihdr = IHDR {
      width: self.width(),
      height: self.height(),
      bit_depth: 8,
      color_type: PngColorType::RGBA,
      is_interlaced: false,
    };
    let mut scanlines: Vec<RGBA8> = Vec::new();
    scanlines.try_reserve(self.pixels.len())?;
    scanlines.extend(self.pixels.iter().copied().map(RGBA8::from_argb32));

    let mut writer = PngWriter::new()?;
    writer.write_ihdr(&ihdr)?;
    for raw_chunk in &copy_safe.before_idat {
      writer.write_raw_chunk(raw_chunk)?;
    }
    writer.write_image_data(&ihdr, bytemuck::cast_slice(&scanlines))?;
    for raw_chunk in &copy_safe.after_idat {
      writer.write_raw_chunk(raw_chunk)?;
    }
    writer.finish()
  }
}

/// The output of [`PixelBuffer::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'b> {
  pub buffer: PixelBuffer,
  pub copy_safe: CopySafeChunks<'b>,
}
