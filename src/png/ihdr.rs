use crate::{NinePatchError, NinePatchResult};

use super::reduced_image_dimensions;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = NinePatchError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(NinePatchError::MalformedInput),
    })
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced.
  pub is_interlaced: bool,
}
impl IHDR {
  /// Bits used by one pixel of the stored data.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Filtering is per byte within a pixel when pixels are more than 1 byte
  /// each, and per byte when pixels are 1 byte or less.
  #[inline]
  #[must_use]
  pub const fn filter_chunk_size(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Each line is a filter byte (1) + pixel data. When pixels are less than 8
  /// bits per channel it's possible to end up with partial bytes on the end,
  /// so we must round up.
  #[inline]
  pub fn bytes_per_filterline(&self, width: u32) -> NinePatchResult<usize> {
    let bits_per_line = self
      .bits_per_pixel()
      .checked_mul(width as usize)
      .ok_or(NinePatchError::DimensionsTooLarge)?;
    Ok(1 + bits_per_line.div_ceil(8))
  }

  /// Gets the buffer size required to perform Zlib decompression.
  ///
  /// Interlaced images add up all 7 reduced images, non-interlaced images are
  /// just the full image.
  pub fn get_zlib_decompression_requirement(&self) -> NinePatchResult<usize> {
    let temp_bytes_for_image = |width: u32, height: u32| -> NinePatchResult<usize> {
      if width == 0 || height == 0 {
        return Ok(0);
      }
      self
        .bytes_per_filterline(width)?
        .checked_mul(height as usize)
        .ok_or(NinePatchError::DimensionsTooLarge)
    };
    if self.is_interlaced {
      let mut total = 0_usize;
      for (width, height) in reduced_image_dimensions(self.width, self.height).into_iter().skip(1) {
        total = total
          .checked_add(temp_bytes_for_image(width, height)?)
          .ok_or(NinePatchError::DimensionsTooLarge)?;
      }
      Ok(total)
    } else {
      temp_bytes_for_image(self.width, self.height)
    }
  }

  /// The 13 bytes of chunk data for this header.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let [w0, w1, w2, w3] = self.width.to_be_bytes();
    let [h0, h1, h2, h3] = self.height.to_be_bytes();
    [
      w0,
      w1,
      w2,
      w3,
      h0,
      h1,
      h2,
      h3,
      self.bit_depth,
      self.color_type as u8,
      0,
      0,
      self.is_interlaced as u8,
    ]
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = NinePatchError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    let Ok(bytes) = <[u8; 13]>::try_from(value) else {
      return Err(NinePatchError::MalformedInput);
    };
    let [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, _, _, interlace_method] = bytes;
    Ok(Self {
      width: u32::from_be_bytes([w0, w1, w2, w3]),
      height: u32::from_be_bytes([h0, h1, h2, h3]),
      bit_depth: match color_type {
        0 if [1, 2, 4, 8, 16].contains(&bit_depth) => bit_depth,
        2 if [8, 16].contains(&bit_depth) => bit_depth,
        3 if [1, 2, 4, 8].contains(&bit_depth) => bit_depth,
        4 if [8, 16].contains(&bit_depth) => bit_depth,
        6 if [8, 16].contains(&bit_depth) => bit_depth,
        _ => return Err(NinePatchError::MalformedInput),
      },
      color_type: PngColorType::try_from(color_type)?,
      is_interlaced: match interlace_method {
        0 => false,
        1 => true,
        _ => return Err(NinePatchError::MalformedInput),
      },
    })
  }
}
