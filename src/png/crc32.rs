const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// The CRC32 of a chunk: computed over the chunk type and then the chunk data,
/// but not the length.
#[inline]
#[must_use]
pub fn png_crc(chunk_ty: [u8; 4], data: &[u8]) -> u32 {
  update_crc(u32::MAX, chunk_ty.iter().copied().chain(data.iter().copied())) ^ u32::MAX
}

#[test]
fn test_png_crc() {
  // the CRC of an empty IEND chunk is the same in every PNG ever written.
  assert_eq!(png_crc(*b"IEND", &[]), 0xAE42_6082);
  // the common "1x1, 8-bit, RGBA" header.
  assert_eq!(png_crc(*b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]), 0x1F15_C489);
}
