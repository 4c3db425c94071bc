use ninepatch::png::{PngRawChunkIter, PNG_SIGNATURE};

#[test]
fn test_PngRawChunkIter_no_panics() {
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in PngRawChunkIter::new(&v) {
      //
    }
  }
}

#[test]
fn test_decode_random_data_no_panics() {
  for _ in 0..20 {
    let v = super::rand_bytes(512);
    let _ = ninepatch::decode(&v);
    // with a good signature the chunk scan gets further before giving up
    let mut v2 = PNG_SIGNATURE.to_vec();
    v2.extend_from_slice(&v);
    let _ = ninepatch::decode(&v2);
  }
}

#[test]
fn test_decode_truncated_input_no_panics() {
  let png = crate::decode::Fixture::rgba(3, 3).with_nine_patch().build();
  assert!(ninepatch::decode(&png).is_ok());
  for end in 1..png.len() {
    let _ = ninepatch::decode(&png[..end]);
  }
  // cut inside the header
  assert!(ninepatch::decode(&png[..20]).is_err());
}
