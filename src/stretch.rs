#![forbid(unsafe_code)]

//! The `npTc` chunk: content padding and stretchable regions.
//!
//! The chunk is the platform's `Res_png_9patch` struct serialized in network
//! byte order:
//!
//! ```text
//! offset  size  field
//!      0     1  wasDeserialized (ignored)
//!      1     1  numXDivs
//!      2     1  numYDivs
//!      3     1  numColors
//!      4     4  xDivsOffset (ignored)
//!      8     4  yDivsOffset (ignored)
//!     12    16  paddingLeft, paddingRight, paddingTop, paddingBottom
//!     28     4  colorsOffset (ignored)
//!     32   4*X  xDivs
//!      …   4*Y  yDivs
//!      …   4*C  colors (ignored)
//! ```
//!
//! Every 32-bit field is signed on the wire.

use alloc::vec::Vec;

use crate::{
  find_chunk, try_pull_count_be, try_pull_u8, try_skip, NinePatchError, NinePatchResult,
};

/// The chunk type of the nine-patch metadata chunk.
pub const NINE_PATCH_TAG: [u8; 4] = *b"npTc";

/// Size of the fixed part of the chunk, before the arrays.
const HEADER_LEN: usize = 32;

/// Content padding plus the stretchable spans along each axis.
///
/// `x_divs` and `y_divs` are always an even length. Each pair `[start, end)`
/// is one stretchable span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StretchRegions {
  pub padding_left: u32,
  pub padding_right: u32,
  pub padding_top: u32,
  pub padding_bottom: u32,
  pub x_divs: Vec<u32>,
  pub y_divs: Vec<u32>,
}
impl StretchRegions {
  /// Scans PNG bytes for the `npTc` chunk and parses it.
  ///
  /// A PNG without the chunk isn't a compiled nine-patch, so this fails with
  /// [`ChunkNotFound`](NinePatchError::ChunkNotFound).
  pub fn find_in(png: &[u8]) -> NinePatchResult<Self> {
    let cursor = find_chunk(png, NINE_PATCH_TAG)?;
    Self::parse(cursor)
  }

  /// Parses the chunk data. Bytes past the `y_divs` are ignored.
  pub fn parse(data: &[u8]) -> NinePatchResult<Self> {
    let rest = try_skip(data, 1)?;
    let (num_x_divs, rest) = try_pull_u8(rest)?;
    let (num_y_divs, rest) = try_pull_u8(rest)?;
    // numColors, xDivsOffset, yDivsOffset
    let rest = try_skip(rest, 1 + 4 + 4)?;
    let (padding_left, rest) = try_pull_count_be(rest)?;
    let (padding_right, rest) = try_pull_count_be(rest)?;
    let (padding_top, rest) = try_pull_count_be(rest)?;
    let (padding_bottom, rest) = try_pull_count_be(rest)?;
    // colorsOffset
    let rest = try_skip(rest, 4)?;
    if num_x_divs % 2 != 0 || num_y_divs % 2 != 0 {
      return Err(NinePatchError::MalformedInput);
    }
    let (x_divs, rest) = pull_divs(rest, num_x_divs)?;
    let (y_divs, _colors) = pull_divs(rest, num_y_divs)?;
    Ok(Self { padding_left, padding_right, padding_top, padding_bottom, x_divs, y_divs })
  }

  /// The stretchable spans along the width, as `(start, end)` pairs.
  #[inline]
  pub fn x_spans(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    self.x_divs.chunks_exact(2).map(|pair| (pair[0], pair[1]))
  }

  /// The stretchable spans along the height, as `(start, end)` pairs.
  #[inline]
  pub fn y_spans(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    self.y_divs.chunks_exact(2).map(|pair| (pair[0], pair[1]))
  }

  /// Serializes back into chunk data, with an empty color table.
  pub fn to_chunk_data(&self) -> NinePatchResult<Vec<u8>> {
    let num_x_divs = u8::try_from(self.x_divs.len())?;
    let num_y_divs = u8::try_from(self.y_divs.len())?;
    let x_divs_offset = HEADER_LEN as u32;
    let y_divs_offset = x_divs_offset + 4 * u32::from(num_x_divs);
    let colors_offset = y_divs_offset + 4 * u32::from(num_y_divs);
    let mut out = Vec::new();
    out.try_reserve(colors_offset as usize)?;
    out.extend_from_slice(&[0, num_x_divs, num_y_divs, 0]);
    out.extend_from_slice(&x_divs_offset.to_be_bytes());
    out.extend_from_slice(&y_divs_offset.to_be_bytes());
    for padding in [self.padding_left, self.padding_right, self.padding_top, self.padding_bottom] {
      out.extend_from_slice(&i32::try_from(padding)?.to_be_bytes());
    }
    out.extend_from_slice(&colors_offset.to_be_bytes());
    for div in self.x_divs.iter().chain(self.y_divs.iter()) {
      out.extend_from_slice(&i32::try_from(*div)?.to_be_bytes());
    }
    Ok(out)
  }
}

fn pull_divs(mut bytes: &[u8], count: u8) -> NinePatchResult<(Vec<u32>, &[u8])> {
  let mut divs = Vec::new();
  divs.try_reserve(count as usize)?;
  for _ in 0..count {
    let (div, rest) = try_pull_count_be(bytes)?;
    divs.push(div);
    bytes = rest;
  }
  Ok((divs, bytes))
}
