// PaddedBuffer: logical view vs. allocation with decoder slack

use lz4_adaptive::block::{PaddedBuffer, ADDITIONAL_BYTES_AT_END_OF_BUFFER};

const SLACK: usize = ADDITIONAL_BYTES_AT_END_OF_BUFFER;

#[test]
fn with_len_is_zeroed_and_padded() {
    let buf = PaddedBuffer::with_len(100);
    assert_eq!(buf.len(), 100);
    assert!(!buf.is_empty());
    assert!(buf.as_slice().iter().all(|&b| b == 0));
    assert_eq!(buf.padded().len(), 100 + SLACK);
}

#[test]
fn from_slice_and_from_agree() {
    let a = PaddedBuffer::from_slice(b"column data");
    let b = PaddedBuffer::from(&b"column data"[..]);
    assert_eq!(a, b);
    assert_eq!(a.as_ref(), b"column data");
}

#[test]
fn mutable_views_cover_logical_bytes_and_slack() {
    let mut buf = PaddedBuffer::with_len(4);
    buf.as_mut_slice().copy_from_slice(b"abcd");
    buf.padded_mut()[4 + SLACK - 1] = 0xFF;
    assert_eq!(buf.as_slice(), b"abcd");
    assert_eq!(buf.padded()[4 + SLACK - 1], 0xFF);
}

#[test]
fn shrinking_keeps_prefix() {
    let mut buf = PaddedBuffer::from_slice(b"abcdefgh");
    buf.resize(3);
    assert_eq!(buf.as_slice(), b"abc");
    assert_eq!(buf.padded().len(), 3 + SLACK);
    assert!(buf.padded()[3..].iter().all(|&b| b == 0));
}

#[test]
fn shrink_then_grow_exposes_only_zeros() {
    let mut buf = PaddedBuffer::from_slice(b"abcdefgh");
    buf.resize(3);
    buf.padded_mut()[3 + SLACK - 1] = 0xFF; // decoder scratch in the slack
    buf.resize(6);
    assert_eq!(buf.as_slice(), b"abc\0\0\0");
    assert!(buf.padded()[3..].iter().all(|&b| b == 0));
}

#[test]
fn into_vec_returns_logical_bytes() {
    let buf = PaddedBuffer::from_slice(&[9; 17]);
    let v = buf.into_vec();
    assert_eq!(v, vec![9u8; 17]);
}
