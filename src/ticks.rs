#![forbid(unsafe_code)]

//! Painting the border ticks.
//!
//! All the ranges here are inclusive at both ends, in buffer coordinates (so
//! source column `c` is buffer column `c + 1`). A range whose start is past
//! its end paints nothing.

use crate::{LayoutBounds, NinePatchError, NinePatchResult, PixelBuffer, StretchRegions};

/// Color of the stretch and padding ticks: opaque black.
pub const STRETCH_TICK_COLOR: u32 = 0xFF00_0000;

/// Color of the layout bound ticks: opaque red.
pub const LAYOUT_BOUNDS_TICK_COLOR: u32 = 0xFFFF_0000;

fn put(buffer: &mut PixelBuffer, row: i64, col: i64, argb: u32) -> NinePatchResult<()> {
  let row = u32::try_from(row)?;
  let col = u32::try_from(col)?;
  let cell = buffer.get_mut(row, col).ok_or(NinePatchError::MalformedInput)?;
  *cell = argb;
  Ok(())
}

fn draw_h_line(buffer: &mut PixelBuffer, row: i64, x1: i64, x2: i64) -> NinePatchResult<()> {
  (x1..=x2).try_for_each(|col| put(buffer, row, col, STRETCH_TICK_COLOR))
}

fn draw_v_line(buffer: &mut PixelBuffer, col: i64, y1: i64, y2: i64) -> NinePatchResult<()> {
  (y1..=y2).try_for_each(|row| put(buffer, row, col, STRETCH_TICK_COLOR))
}

/// Paints the stretch ticks (top row and left column) and the content padding
/// ticks (bottom row and right column).
///
/// ## Failure
/// * [`MalformedInput`](NinePatchError::MalformedInput) if a div or padding
///   would put a tick outside of the buffer. Cells painted before the bad tick
///   stay painted.
pub fn paint_stretch_ticks(
  buffer: &mut PixelBuffer, regions: &StretchRegions,
) -> NinePatchResult<()> {
  let w = i64::from(buffer.source_width());
  let h = i64::from(buffer.source_height());

  let (left, right) = (i64::from(regions.padding_left), i64::from(regions.padding_right));
  let (top, bottom) = (i64::from(regions.padding_top), i64::from(regions.padding_bottom));
  draw_h_line(buffer, h + 1, left + 1, w - right)?;
  draw_v_line(buffer, w + 1, top + 1, h - bottom)?;

  if regions.x_divs.is_empty() {
    draw_h_line(buffer, 0, 1, w)?;
  } else {
    for (start, end) in regions.x_spans() {
      draw_h_line(buffer, 0, i64::from(start) + 1, i64::from(end))?;
    }
  }
  if regions.y_divs.is_empty() {
    draw_v_line(buffer, 0, 1, h)?;
  } else {
    for (start, end) in regions.y_spans() {
      draw_v_line(buffer, 0, i64::from(start) + 1, i64::from(end))?;
    }
  }
  Ok(())
}

/// Paints the layout bound ticks in [`LAYOUT_BOUNDS_TICK_COLOR`].
///
/// These share the bottom row and right column with the padding ticks, and
/// overwrite them where they overlap.
///
/// ## Failure
/// * [`MalformedInput`](NinePatchError::MalformedInput) if a bound is larger
///   than the image along its axis.
pub fn paint_layout_bound_ticks(
  buffer: &mut PixelBuffer, bounds: &LayoutBounds,
) -> NinePatchResult<()> {
  let w = i64::from(buffer.source_width());
  let h = i64::from(buffer.source_height());
  let red = LAYOUT_BOUNDS_TICK_COLOR;
  for i in 0..i64::from(bounds.left) {
    put(buffer, h + 1, 1 + i, red)?;
  }
  for i in 0..i64::from(bounds.right) {
    put(buffer, h + 1, w - i, red)?;
  }
  for i in 0..i64::from(bounds.top) {
    put(buffer, 1 + i, w + 1, red)?;
  }
  for i in 0..i64::from(bounds.bottom) {
    put(buffer, h - i, w + 1, red)?;
  }
  Ok(())
}
