#![forbid(unsafe_code)]

//! The optional `npLb` chunk: optical layout bounds.

use crate::{find_chunk, try_pull_count_be, NinePatchError, NinePatchResult};

/// The chunk type of the layout bounds chunk.
pub const LAYOUT_BOUNDS_TAG: [u8; 4] = *b"npLb";

/// Layout bound insets, in pixels, from each edge of the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutBounds {
  pub left: u32,
  pub top: u32,
  pub right: u32,
  pub bottom: u32,
}
impl LayoutBounds {
  /// Scans PNG bytes for the `npLb` chunk and parses it.
  ///
  /// Most nine-patches don't have layout bounds, so a missing chunk is
  /// `Ok(None)`. A chunk that's present but can't be read is still an error.
  pub fn find_in(png: &[u8]) -> NinePatchResult<Option<Self>> {
    match find_chunk(png, LAYOUT_BOUNDS_TAG) {
      Ok(cursor) => Self::parse(cursor).map(Some),
      Err(NinePatchError::ChunkNotFound) => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// Parses the chunk data: `left`, `top`, `right`, `bottom`, each a 32-bit
  /// big-endian value.
  pub fn parse(data: &[u8]) -> NinePatchResult<Self> {
    let (left, rest) = try_pull_count_be(data)?;
    let (top, rest) = try_pull_count_be(rest)?;
    let (right, rest) = try_pull_count_be(rest)?;
    let (bottom, _) = try_pull_count_be(rest)?;
    Ok(Self { left, top, right, bottom })
  }

  /// Serializes back into chunk data.
  pub fn to_chunk_data(&self) -> NinePatchResult<[u8; 16]> {
    let mut out = [0_u8; 16];
    for (dst, v) in out.chunks_exact_mut(4).zip([self.left, self.top, self.right, self.bottom]) {
      dst.copy_from_slice(&i32::try_from(v)?.to_be_bytes());
    }
    Ok(out)
  }
}
