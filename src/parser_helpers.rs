#![forbid(unsafe_code)]

//! Shorthands for pulling big-endian values off the front of a byte slice.
//!
//! Every function here takes the "cursor" slice and gives back the value along
//! with the rest of the slice, so parsers read like a sequence of `?` lines.

use crate::{NinePatchError, NinePatchResult};

#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(
  bytes: &[u8],
) -> NinePatchResult<([u8; N], &[u8])> {
  match bytes.split_first_chunk::<N>() {
    Some((head, tail)) => Ok((*head, tail)),
    None => Err(NinePatchError::MalformedInput),
  }
}

#[inline]
pub(crate) fn try_pull_u8(bytes: &[u8]) -> NinePatchResult<(u8, &[u8])> {
  let ([u], rest) = try_pull_byte_array::<1>(bytes)?;
  Ok((u, rest))
}

#[inline]
pub(crate) fn try_pull_i32_be(bytes: &[u8]) -> NinePatchResult<(i32, &[u8])> {
  let (a, rest) = try_pull_byte_array::<4>(bytes)?;
  Ok((i32::from_be_bytes(a), rest))
}

/// Pulls a signed 32-bit value that must not be negative.
///
/// The compiled nine-patch format stores pixel counts and coordinates as
/// `int32_t`, a negative one can't be drawn.
#[inline]
pub(crate) fn try_pull_count_be(bytes: &[u8]) -> NinePatchResult<(u32, &[u8])> {
  let (i, rest) = try_pull_i32_be(bytes)?;
  Ok((u32::try_from(i)?, rest))
}

#[inline]
pub(crate) fn try_skip(bytes: &[u8], count: usize) -> NinePatchResult<&[u8]> {
  bytes.get(count..).ok_or(NinePatchError::MalformedInput)
}

#[test]
fn test_pull_helpers() {
  let bytes = [0x00, 0x00, 0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFF, 7];
  let (i, rest) = try_pull_count_be(&bytes).unwrap();
  assert_eq!(i, 0x0102);
  assert_eq!(try_pull_i32_be(rest).unwrap().0, -1);
  assert_eq!(try_pull_count_be(rest), Err(NinePatchError::MalformedInput));
  let rest = try_skip(rest, 4).unwrap();
  assert_eq!(try_pull_u8(rest).unwrap(), (7, &[][..]));
  assert_eq!(try_pull_i32_be(&bytes[6..]), Err(NinePatchError::MalformedInput));
  assert_eq!(try_skip(&bytes, 10), Err(NinePatchError::MalformedInput));
}
