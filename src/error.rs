use core::{fmt, num::TryFromIntError};

/// An error from the `ninepatch` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NinePatchError {
  /// The PNG data or one of the nine-patch chunks was truncated or otherwise
  /// couldn't be read.
  MalformedInput,

  /// The chunk scan ran out of input before finding the requested chunk.
  ///
  /// For the layout-bounds chunk this is never surfaced, the parser turns it
  /// into `Ok(None)`.
  ChunkNotFound,

  /// The PNG uses a feature outside of the 8-bit channel contract, such as
  /// 16-bit channels or packed greyscale.
  Unsupported,

  /// The image is too large to have its bordered pixel buffer indexed, or the
  /// header claims more pixels than the image data could ever inflate to.
  DimensionsTooLarge,

  /// The allocator couldn't give us enough space.
  Alloc,
}
impl From<alloc::collections::TryReserveError> for NinePatchError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for NinePatchError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::MalformedInput
  }
}
impl fmt::Display for NinePatchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::MalformedInput => "malformed PNG or nine-patch data",
      Self::ChunkNotFound => "chunk not found",
      Self::Unsupported => "unsupported PNG pixel format",
      Self::DimensionsTooLarge => "image dimensions too large",
      Self::Alloc => "allocation failed",
    })
  }
}
impl core::error::Error for NinePatchError {}

/// Shorthand for results within this crate.
pub type NinePatchResult<T> = Result<T, NinePatchError>;
