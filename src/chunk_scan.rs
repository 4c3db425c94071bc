#![forbid(unsafe_code)]

//! Locates a tagged chunk within PNG bytes.
//!
//! Unlike [`PngRawChunkIter`](crate::png::PngRawChunkIter) this doesn't need
//! the matched chunk to be complete: it hands back everything after the tag
//! and lets the chunk's parser decide how much it needs.

use crate::{NinePatchError, NinePatchResult};

/// Finds the first chunk with the given type tag.
///
/// The first 8 bytes (the PNG signature) are skipped without being checked.
/// After that the bytes are read as a series of chunks: a big-endian length,
/// the tag, `length` bytes of data, and a CRC that's never checked.
///
/// On success the output is the "cursor": the rest of the input, starting
/// immediately after the matched tag (so, at the chunk's data).
///
/// ## Failure
/// * [`ChunkNotFound`](NinePatchError::ChunkNotFound) if the input runs out
///   before a matching chunk appears.
pub fn find_chunk(bytes: &[u8], tag: [u8; 4]) -> NinePatchResult<&[u8]> {
  let mut cursor = bytes.get(8..).ok_or(NinePatchError::ChunkNotFound)?;
  loop {
    let Some((length, rest)) = cursor.split_first_chunk::<4>() else {
      return Err(NinePatchError::ChunkNotFound);
    };
    let Some((chunk_tag, rest)) = rest.split_first_chunk::<4>() else {
      return Err(NinePatchError::ChunkNotFound);
    };
    if *chunk_tag == tag {
      return Ok(rest);
    }
    let length = u32::from_be_bytes(*length) as usize;
    log::trace!("skipping chunk {} ({length} bytes)", chunk_tag.escape_ascii());
    // the data, then the CRC
    let skip = length.saturating_add(4);
    cursor = rest.get(skip..).ok_or(NinePatchError::ChunkNotFound)?;
  }
}
