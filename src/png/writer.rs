use alloc::vec::Vec;

use crate::{NinePatchError, NinePatchResult};

use super::{png_crc, PngChunkType, PngRawChunk, IHDR, PNG_SIGNATURE};

/// Compression level handed to the deflate encoder.
const DEFLATE_LEVEL: u8 = 6;

/// The image data is split into `IDAT` chunks of at most this many bytes.
const MAX_IDAT_LEN: usize = 64 * 1024;

/// Builds a PNG datastream one chunk at a time.
///
/// The writer doesn't enforce chunk ordering, it's up to the caller to write
/// the header first and call [`finish`](Self::finish) last.
#[derive(Debug, Clone, Default)]
pub struct PngWriter {
  bytes: Vec<u8>,
}
impl PngWriter {
  /// Starts a new datastream with the PNG signature already written.
  pub fn new() -> NinePatchResult<Self> {
    let mut bytes = Vec::new();
    bytes.try_reserve(PNG_SIGNATURE.len())?;
    bytes.extend_from_slice(&PNG_SIGNATURE);
    Ok(Self { bytes })
  }

  /// Writes a complete chunk: length, type, data, and a freshly computed CRC.
  pub fn write_chunk(&mut self, chunk_ty: PngChunkType, data: &[u8]) -> NinePatchResult<()> {
    let len = u32::try_from(data.len())
      .ok()
      .filter(|&len| len <= i32::MAX as u32)
      .ok_or(NinePatchError::DimensionsTooLarge)?;
    self.bytes.try_reserve(12 + data.len())?;
    self.bytes.extend_from_slice(&len.to_be_bytes());
    self.bytes.extend_from_slice(&chunk_ty.0);
    self.bytes.extend_from_slice(data);
    self.bytes.extend_from_slice(&png_crc(chunk_ty.0, data).to_be_bytes());
    Ok(())
  }

  /// Replays a chunk read from another PNG.
  #[inline]
  pub fn write_raw_chunk(&mut self, raw_chunk: &PngRawChunk<'_>) -> NinePatchResult<()> {
    self.write_chunk(raw_chunk.chunk_type(), raw_chunk.data())
  }

  #[inline]
  pub fn write_ihdr(&mut self, ihdr: &IHDR) -> NinePatchResult<()> {
    self.write_chunk(PngChunkType::IHDR, &ihdr.to_bytes())
  }

  /// Compresses and writes the image data.
  ///
  /// `scanlines` is the packed pixel data of every row, top to bottom, without
  /// filter bytes. Every line is written with filter type 0 (None).
  ///
  /// Only non-interlaced output is supported.
  pub fn write_image_data(&mut self, ihdr: &IHDR, scanlines: &[u8]) -> NinePatchResult<()> {
    if ihdr.is_interlaced {
      return Err(NinePatchError::Unsupported);
    }
    let bytes_per_filterline = ihdr.bytes_per_filterline(ihdr.width)?;
    let bytes_per_scanline = bytes_per_filterline - 1;
    let total = ihdr.get_zlib_decompression_requirement()?;
    if bytes_per_scanline == 0 || scanlines.len() != bytes_per_scanline * ihdr.height as usize {
      return Err(NinePatchError::MalformedInput);
    }
    let mut filtered: Vec<u8> = Vec::new();
    filtered.try_reserve(total)?;
    for line in scanlines.chunks_exact(bytes_per_scanline) {
      filtered.push(0);
      filtered.extend_from_slice(line);
    }
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, DEFLATE_LEVEL);
    log::trace!("image data: {} filtered bytes, {} compressed", filtered.len(), compressed.len());
    for idat in compressed.chunks(MAX_IDAT_LEN) {
      self.write_chunk(PngChunkType::IDAT, idat)?;
    }
    Ok(())
  }

  /// Writes the `IEND` chunk and gives back the finished bytes.
  pub fn finish(mut self) -> NinePatchResult<Vec<u8>> {
    self.write_chunk(PngChunkType::IEND, &[])?;
    Ok(self.bytes)
  }
}
