#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
//#![warn(missing_docs)]

//! A crate for decoding compiled nine-patch images.
//!
//! When an Android app is packaged, every `.9.png` has its one pixel border
//! stripped off, and the border's meaning is stored in private PNG chunks
//! instead: `npTc` for the stretch regions and content padding, and `npLb` for
//! the (optional) layout bounds. This crate reverses that, giving back an
//! editable nine-patch with the border ticks painted in again.
//!
//! ```no_run
//! # fn main() -> Result<(), ninepatch::NinePatchError> {
//! # let compiled: &[u8] = &[];
//! let editable: Vec<u8> = ninepatch::decode(compiled)?;
//! # Ok(())
//! # }
//! ```
//!
//! The output is always an 8-bit RGBA PNG that's two pixels wider and two
//! pixels taller than the source.

extern crate alloc;
use alloc::vec::Vec;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod parser_helpers;
pub(crate) use parser_helpers::*;

pub mod pixel_formats;

pub mod png;

mod chunk_scan;
pub use chunk_scan::*;

mod stretch;
pub use stretch::*;

mod layout_bounds;
pub use layout_bounds::*;

mod pixel_buffer;
pub use pixel_buffer::*;

mod ticks;
pub use ticks::*;

/// Settings for [`decode_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
  /// Paint the layout bound ticks when the source has an `npLb` chunk.
  pub layout_bounds: bool,
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self { layout_bounds: true }
  }
}

/// Decodes a compiled nine-patch PNG into an editable nine-patch PNG.
///
/// Same as [`decode_with`] using the default options.
#[inline]
pub fn decode(png: &[u8]) -> NinePatchResult<Vec<u8>> {
  decode_with(png, &DecodeOptions::default())
}

/// Decodes a compiled nine-patch PNG into an editable nine-patch PNG.
///
/// Empty input gives empty output.
///
/// ## Failure
/// * [`ChunkNotFound`](NinePatchError::ChunkNotFound) if there's no `npTc`
///   chunk. A missing `npLb` chunk is not an error.
/// * [`MalformedInput`](NinePatchError::MalformedInput) if the PNG or either
///   nine-patch chunk can't be read, or if they describe ticks that don't fit
///   the image.
/// * [`Unsupported`](NinePatchError::Unsupported) for 16-bit channels and
///   packed greyscale.
/// * [`DimensionsTooLarge`](NinePatchError::DimensionsTooLarge) or
///   [`Alloc`](NinePatchError::Alloc) if the image is too big to work with.
pub fn decode_with(png: &[u8], options: &DecodeOptions) -> NinePatchResult<Vec<u8>> {
  if png.is_empty() {
    return Ok(Vec::new());
  }
  let Extracted { mut buffer, copy_safe } = PixelBuffer::extract(png)?;
  let regions = StretchRegions::find_in(png)?;
  log::debug!("stretch regions: {regions:?}");
  let bounds = if options.layout_bounds { LayoutBounds::find_in(png)? } else { None };
  log::debug!("layout bounds: {bounds:?}");
  paint_stretch_ticks(&mut buffer, &regions)?;
  if let Some(bounds) = &bounds {
    paint_layout_bound_ticks(&mut buffer, bounds)?;
  }
  let out = buffer.encode(&copy_safe)?;
  log::debug!("encoded {}x{} output, {} bytes", buffer.width(), buffer.height(), out.len());
  Ok(out)
}
