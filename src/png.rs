#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! This is only as much PNG as the nine-patch decoder needs: reading 8-bit
//! images of every color type (plus packed indexed images), and writing 8-bit
//! RGBA images.
//!
//! ## Library Design Assumptions
//!
//! * The entire PNG encoded source data stream is a single byte slice.
//! * The decompressed image data goes into a single buffer which is large
//!   enough to hold all of it at once.
//!
//! ## Parsing Errors
//!
//! We ignore as many spec violations as we possibly can when parsing.
//! Particularly, we ignore:
//!
//! * When the first 8 bytes of the data stream, marking it as PNG data, are
//!   incorrect. The [PngRawChunkIter] will just skip the first 8 bytes of
//!   input, regardless of if they're correct or not.
//! * All the chunk ordering rules.
//! * Rules against duplicate chunks (you'll generally get the first one).
//! * Both of the checksum systems (CRC32 checks on individual chunks, and
//!   Adler32 checking on the Zlib compressed image data).

use alloc::vec::Vec;

use miniz_oxide::inflate::TINFLStatus;

use crate::{pixel_formats::RGB8, NinePatchError, NinePatchResult};

mod crc32;
pub use crc32::*;

mod ihdr;
pub use ihdr::*;

mod raw_chunk;
pub use raw_chunk::*;

mod unfilter;
pub use unfilter::*;

mod writer;
pub use writer::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// Gets the [IHDR] out of the PNG bytes.
pub fn png_get_header(bytes: &[u8]) -> Option<IHDR> {
  PngRawChunkIter::new(bytes)
    .filter(|raw_chunk| raw_chunk.chunk_type() == PngChunkType::IHDR)
    .find_map(|raw_chunk| IHDR::try_from(raw_chunk.data()).ok())
}

/// Gets the palette out of the PNG bytes.
///
/// A `PLTE` whose length isn't a multiple of 3 is skipped.
pub fn png_get_palette(bytes: &[u8]) -> Option<&[RGB8]> {
  PngRawChunkIter::new(bytes)
    .filter(|raw_chunk| raw_chunk.chunk_type() == PngChunkType::PLTE)
    .find_map(|raw_chunk| bytemuck::try_cast_slice::<u8, RGB8>(raw_chunk.data()).ok())
}

/// Gets the transparency chunk data for the PNG bytes, if any.
///
/// For indexed images this is one alpha value per palette entry. There can be
/// fewer alpha entries than palette entries, missing entries are opaque.
pub fn png_get_transparency(bytes: &[u8]) -> Option<&[u8]> {
  PngRawChunkIter::new(bytes)
    .find(|raw_chunk| raw_chunk.chunk_type() == PngChunkType::tRNS)
    .map(|raw_chunk| raw_chunk.data())
}

/// Gets an iterator over all the `IDAT` slices in the PNG bytes.
pub fn png_get_idat(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
  PngRawChunkIter::new(bytes)
    .filter(|raw_chunk| raw_chunk.chunk_type() == PngChunkType::IDAT)
    .map(|raw_chunk| raw_chunk.data())
}

/// The ancillary chunks of a PNG that are marked safe to copy.
///
/// The chunks are kept in stream order, split by whether they came before or
/// after the image data. A chunk after the first `IDAT` is "after" even if
/// more `IDAT` chunks follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySafeChunks<'b> {
  pub before_idat: Vec<PngRawChunk<'b>>,
  pub after_idat: Vec<PngRawChunk<'b>>,
}
impl CopySafeChunks<'_> {
  /// Total number of chunks held.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.before_idat.len() + self.after_idat.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Collects every chunk that's both ancillary and safe-to-copy.
pub fn png_get_copy_safe_chunks(bytes: &[u8]) -> NinePatchResult<CopySafeChunks<'_>> {
  let mut out = CopySafeChunks::default();
  let mut seen_idat = false;
  for raw_chunk in PngRawChunkIter::new(bytes) {
    let ty = raw_chunk.chunk_type();
    if ty == PngChunkType::IDAT {
      seen_idat = true;
    } else if ty.is_ancillary() && ty.is_safe_to_copy() {
      let list = if seen_idat { &mut out.after_idat } else { &mut out.before_idat };
      list.try_reserve(1)?;
      list.push(raw_chunk);
    }
  }
  Ok(out)
}

/// Deflate can't expand its input by more than about this much.
const MAX_INFLATE_RATIO: usize = 1032;

/// Inflates all of the image data of a PNG into a new buffer.
///
/// The buffer is exactly [`get_zlib_decompression_requirement`] bytes long.
/// Image data that decompresses to more than that is cut off at the end of
/// the buffer.
///
/// ## Failure
/// * [`MalformedInput`](NinePatchError::MalformedInput) if there's no image
///   data at all.
/// * [`DimensionsTooLarge`](NinePatchError::DimensionsTooLarge) if the header
///   asks for more data than the `IDAT` chunks could possibly inflate to.
///   This is checked before anything is allocated.
/// * [`MalformedInput`](NinePatchError::MalformedInput) if the data
///   decompresses to fewer bytes than required, or won't decompress at all.
///
/// [`get_zlib_decompression_requirement`]: IHDR::get_zlib_decompression_requirement
pub fn png_inflate_image_data(bytes: &[u8], ihdr: &IHDR) -> NinePatchResult<Vec<u8>> {
  let zlib_len = ihdr.get_zlib_decompression_requirement()?;
  let idat_len = png_get_idat(bytes).map(<[u8]>::len).fold(0_usize, usize::saturating_add);
  if idat_len == 0 {
    return Err(NinePatchError::MalformedInput);
  }
  if idat_len.saturating_mul(MAX_INFLATE_RATIO) < zlib_len {
    log::debug!("{idat_len} bytes of image data can't inflate to {zlib_len} bytes");
    return Err(NinePatchError::DimensionsTooLarge);
  }
  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve(zlib_len)?;
  zlib_buffer.resize(zlib_len, 0);
  match miniz_oxide::inflate::decompress_slice_iter_to_slice(
    &mut zlib_buffer,
    png_get_idat(bytes),
    true,
    true,
  ) {
    Ok(decompression_count) if decompression_count == zlib_len => Ok(zlib_buffer),
    Ok(decompression_count) => {
      log::debug!("image data ended early: {decompression_count} of {zlib_len} bytes");
      Err(NinePatchError::MalformedInput)
    }
    // the buffer is full, anything past it isn't needed.
    Err(TINFLStatus::HasMoreOutput) => Ok(zlib_buffer),
    Err(e) => {
      log::debug!("image data failed to inflate: {e:?}");
      Err(NinePatchError::MalformedInput)
    }
  }
}
