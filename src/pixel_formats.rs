//! Module for pixel formats.
//!
//! The decoder works with a single canonical pixel format internally: a `u32`
//! holding ARGB with alpha in the most significant byte (`0xAARRGGBB`). That's
//! the value the border ticks are painted with, and what every source color
//! model is normalized into.
//!
//! The structs here are the byte-level layouts that show up in PNG data: the
//! palette entries of a `PLTE` chunk, and the 8-bit RGBA pixels written to the
//! output.
//!
//! ### Between Gray and RGB
//! When going from greyscale to RGB one just simply copies the gray value to
//! each of the RGB channels. The decoder never goes the other way.

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8-bits per channel.
///
/// This is the layout of a `PLTE` entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An 8-bits per channel RGBA pixel.
///
/// This is the byte order of PNG color type 6 at bit depth 8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  /// Packs into the canonical `0xAARRGGBB` value.
  #[inline]
  #[must_use]
  pub const fn to_argb32(self) -> u32 {
    u32::from_be_bytes([self.a, self.r, self.g, self.b])
  }

  /// Unpacks a canonical `0xAARRGGBB` value.
  #[inline]
  #[must_use]
  pub const fn from_argb32(argb: u32) -> Self {
    let [a, r, g, b] = argb.to_be_bytes();
    Self { r, g, b, a }
  }
}

/// Packs an opaque RGB color into `0xFFRRGGBB`.
#[inline]
#[must_use]
pub const fn opaque_argb32(r: u8, g: u8, b: u8) -> u32 {
  u32::from_be_bytes([0xFF, r, g, b])
}

/// Packs a gray value with alpha into `0xAAYYYYYY`.
#[inline]
#[must_use]
pub const fn gray_argb32(y: u8, a: u8) -> u32 {
  u32::from_be_bytes([a, y, y, y])
}

#[test]
fn test_argb32_packing() {
  let p = RGBA8 { r: 0x11, g: 0x22, b: 0x33, a: 0x44 };
  assert_eq!(p.to_argb32(), 0x4411_2233);
  assert_eq!(RGBA8::from_argb32(0x4411_2233), p);
  assert_eq!(opaque_argb32(1, 2, 3), 0xFF01_0203);
  assert_eq!(gray_argb32(0x80, 0x7F), 0x7F80_8080);
}
