//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.

use crate::{NinePatchError, NinePatchResult};

use super::IHDR;

/// Given the dimensions of the full PNG image, computes the size of each
/// reduced image.
///
/// The PNG interlacing scheme converts a full image to 7 reduced images, each
/// with potentially separate dimensions. The output uses index 0 as the base
/// image size, and indexes 1 through 7 for the size of reduced images 1
/// through 7.
#[inline]
#[must_use]
pub(crate) const fn reduced_image_dimensions(
  full_width: u32, full_height: u32,
) -> [(u32, u32); 8] {
  // ```
  // 1 6 4 6 2 6 4 6
  // 7 7 7 7 7 7 7 7
  // 5 6 5 6 5 6 5 6
  // 7 7 7 7 7 7 7 7
  // 3 6 4 6 3 6 4 6
  // 7 7 7 7 7 7 7 7
  // 5 6 5 6 5 6 5 6
  // 7 7 7 7 7 7 7 7
  // ```
  let full_patterns_wide = full_width / 8;
  let full_patterns_high = full_height / 8;
  //
  let partial_pattern_width = full_width % 8;
  let partial_pattern_height = full_height % 8;
  //
  let zero = (full_width, full_height);
  //
  let first = (
    full_patterns_wide + (partial_pattern_width + 7) / 8,
    full_patterns_high + (partial_pattern_height + 7) / 8,
  );
  let second = (
    full_patterns_wide + (partial_pattern_width + 3) / 8,
    full_patterns_high + (partial_pattern_height + 7) / 8,
  );
  let third = (
    full_patterns_wide * 2 + ((partial_pattern_width + 3) / 4),
    full_patterns_high + ((partial_pattern_height + 3) / 8),
  );
  let fourth = (
    full_patterns_wide * 2 + (partial_pattern_width + 1) / 4,
    full_patterns_high * 2 + (partial_pattern_height + 3) / 4,
  );
  let fifth = (
    full_patterns_wide * 4 + ((partial_pattern_width + 1) / 2),
    full_patterns_high * 2 + (partial_pattern_height + 1) / 4,
  );
  let sixth = (
    full_patterns_wide * 4 + partial_pattern_width / 2,
    full_patterns_high * 4 + ((partial_pattern_height + 1) / 2),
  );
  let seventh = (
    full_patterns_wide * 8 + partial_pattern_width,
    full_patterns_high * 4 + (partial_pattern_height / 2),
  );
  //
  [zero, first, second, third, fourth, fifth, sixth, seventh]
}

/// Converts a reduced image location into the full image location.
///
/// An `image_level` of 0 is the full image, and gives back the input.
#[inline]
#[must_use]
pub(crate) const fn interlaced_pos_to_full_pos(
  image_level: usize, reduced_x: u32, reduced_y: u32,
) -> (u32, u32) {
  #[allow(clippy::identity_op)]
  match image_level {
    1 => (reduced_x * 8 + 0, reduced_y * 8 + 0),
    2 => (reduced_x * 8 + 4, reduced_y * 8 + 0),
    3 => (reduced_x * 4 + 0, reduced_y * 8 + 4),
    4 => (reduced_x * 4 + 2, reduced_y * 4 + 0),
    5 => (reduced_x * 2 + 0, reduced_y * 4 + 2),
    6 => (reduced_x * 2 + 1, reduced_y * 2 + 0),
    7 => (reduced_x * 1 + 0, reduced_y * 2 + 1),
    _ => (reduced_x, reduced_y),
  }
}

/// Splits one byte of packed pixels into separate pixels and passes each one to
/// the `op`, stopping at the padding bits past the image's edge.
fn send_out_pixel<F: FnMut(u32, u32, &[u8])>(
  header: &IHDR, image_level: usize, reduced_x: u32, reduced_y: u32, data: &[u8], op: &mut F,
) {
  let (per_byte, bits) = match header.bit_depth {
    1 => (8, 1),
    2 => (4, 2),
    4 => (2, 4),
    _ => {
      let (image_x, image_y) = interlaced_pos_to_full_pos(image_level, reduced_x, reduced_y);
      op(image_x, image_y, data);
      return;
    }
  };
  let full_data: u8 = data[0];
  let mask = (1_u8 << bits) - 1;
  for plus_x in 0..per_byte {
    let (image_x, image_y) =
      interlaced_pos_to_full_pos(image_level, reduced_x * per_byte + plus_x, reduced_y);
    if image_x >= header.width {
      return;
    }
    let down_shift = 8 - bits * (plus_x + 1);
    op(image_x, image_y, &[(full_data >> down_shift) & mask]);
  }
}

#[inline]
#[must_use]
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: the order of these tests is fixed by the PNG spec, don't change it.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses one line's filter in place. An empty `prev` is the implied line of
/// zeroes above the first line of an image.
fn unfilter_line(filter: u8, pixels: &mut [u8], prev: &[u8], filter_chunk_size: usize) {
  let up = |i: usize| prev.get(i).copied().unwrap_or(0);
  match filter {
    1 => {
      // Sub
      for i in filter_chunk_size..pixels.len() {
        pixels[i] = pixels[i].wrapping_add(pixels[i - filter_chunk_size]);
      }
    }
    2 => {
      // Up
      pixels.iter_mut().zip(prev.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
    }
    3 => {
      // Average
      for i in 0..pixels.len() {
        let a = if i >= filter_chunk_size { pixels[i - filter_chunk_size] } else { 0 };
        let avg = ((a as u32 + up(i) as u32) / 2) as u8;
        pixels[i] = pixels[i].wrapping_add(avg);
      }
    }
    4 => {
      // Paeth
      for i in 0..pixels.len() {
        let (a, c) = if i >= filter_chunk_size {
          (pixels[i - filter_chunk_size], up(i - filter_chunk_size))
        } else {
          (0, 0)
        };
        pixels[i] = pixels[i].wrapping_add(paeth_predict(a, up(i), c));
      }
    }
    _ => {
      // No Filter, or unknown filter, have no alterations.
    }
  }
}

/// Given the `header`, `decompressed` buffer, and a per-pixel `op`, unfilters
/// the data and passes each pixel output to the `op` as the unfiltering occurs.
///
/// Each call to the `op` gets `|x, y, data|` as arguments, where `x` and `y`
/// are the position of the pixel data (relative to the top left), and `data` is
/// a slice of bytes representing the unfiltered pixel value at that location.
/// Bit-packed pixel data will be unpacked and have the callback called once per
/// pixel, with the data in the lowest bits of a single byte.
///
/// Interlaced images are handled by working through the reduced images, so the
/// `op` sees pixels in reduced image order rather than row order.
///
/// The data is unfiltered in place, and also each filter byte is reset to the
/// "no filter" setting as well.
///
/// ## Failure
/// * A `decompressed` buffer larger than required is fine, the extra bytes are
///   ignored.
/// * A buffer that's too small is an error (possibly after some amount of the
///   unfiltering is done).
pub fn unfilter_decompressed_data<F>(
  header: &IHDR, mut decompressed: &mut [u8], mut op: F,
) -> NinePatchResult<()>
where
  F: FnMut(u32, u32, &[u8]),
{
  if header.width == 0 || header.height == 0 {
    return Err(NinePatchError::MalformedInput);
  }

  let filter_chunk_size = header.filter_chunk_size();

  // When the data is interlaced, we want to process the 1st through 7th reduced
  // images, so we take all of the image dimensions but drop the 0th one from
  // the iterator before we begin to use it. When the data is not interlaced we
  // take only the 0th image of the iterator (the full image).
  let mut image_it = reduced_image_dimensions(header.width, header.height)
    .into_iter()
    .enumerate()
    .take(if header.is_interlaced { 8 } else { 1 });
  if header.is_interlaced {
    image_it.next();
  }

  for (image_level, (reduced_width, reduced_height)) in image_it {
    if reduced_width == 0 || reduced_height == 0 {
      // the full image is never empty, but a reduced image can be.
      continue;
    }

    let bytes_per_filterline = header.bytes_per_filterline(reduced_width)?;
    let bytes_used_this_image = bytes_per_filterline
      .checked_mul(reduced_height as usize)
      .ok_or(NinePatchError::DimensionsTooLarge)?;
    if decompressed.len() < bytes_used_this_image {
      return Err(NinePatchError::MalformedInput);
    }
    let (these_bytes, more_bytes) =
      core::mem::take(&mut decompressed).split_at_mut(bytes_used_this_image);
    decompressed = more_bytes;

    let mut b_pixels: &[u8] = &[];
    for (reduced_y, filterline) in these_bytes.chunks_exact_mut(bytes_per_filterline).enumerate()
    {
      let Some((f, pixels)) = filterline.split_first_mut() else { continue };
      unfilter_line(*f, pixels, b_pixels, filter_chunk_size);
      *f = 0;
      for (reduced_x, pixel) in pixels.chunks_exact(filter_chunk_size).enumerate() {
        send_out_pixel(header, image_level, reduced_x as u32, reduced_y as u32, pixel, &mut op);
      }
      b_pixels = pixels;
    }
  }

  Ok(())
}
