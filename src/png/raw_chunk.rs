use core::fmt::{Debug, Write};

use super::png_crc;

/// The four byte type code of a PNG chunk.
///
/// The case of each letter is a property bit of the chunk: bit 5 of the first
/// byte marks ancillary chunks, bit 5 of the fourth byte marks chunks that are
/// safe to copy into an edited image.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const gAMA: Self = Self(*b"gAMA");
}
impl PngChunkType {
  /// Ancillary chunks can be ignored by a decoder and the image is still
  /// displayable.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    (self.0[0] & 0x20) != 0
  }

  /// Safe-to-copy chunks don't depend on the image data, so an editor may
  /// carry them into the modified image even if it doesn't understand them.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & 0x20) != 0
  }
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  type_: PngChunkType,
  data: &'b [u8],
  declared_crc: u32,
}
impl<'b> PngRawChunk<'b> {
  #[inline]
  #[must_use]
  pub const fn chunk_type(&self) -> PngChunkType {
    self.type_
  }
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// Computes the CRC that the chunk *should* have declared.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc(self.type_.0, self.data)
  }
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("type_", &self.type_)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Iteration stops at the first chunk that's cut short by the end of the
/// input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkIter<'b>(&'b [u8]);
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG header automatically.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = PngRawChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let (len_bytes, rest) = self.0.split_first_chunk::<4>()?;
    let chunk_len = u32::from_be_bytes(*len_bytes) as usize;
    let (type_bytes, rest) = rest.split_first_chunk::<4>()?;
    let data = rest.get(..chunk_len)?;
    let (crc_bytes, rest) = rest[chunk_len..].split_first_chunk::<4>()?;
    self.0 = rest;
    Some(PngRawChunk {
      type_: PngChunkType(*type_bytes),
      data,
      declared_crc: u32::from_be_bytes(*crc_bytes),
    })
  }
}
