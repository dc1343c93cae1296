//! Fixed-stride copy primitives shared by all decoder variants.
//!
//! Every routine here copies in strides of `W` bytes and may touch up to
//! `W - 1` bytes past the logical end of the range.  Callers reserve
//! [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`](super::types::ADDITIONAL_BYTES_AT_END_OF_BUFFER)
//! bytes of slack to absorb that.

use core::ptr;

/// Copy exactly `W` bytes from earlier output to `dst`.
///
/// Used for matches whose offset is at least `W`, so the two ranges never
/// overlap.
///
/// # Safety
/// `src` must be readable and `dst` writable for `W` bytes, and
/// `src + W <= dst` or `dst + W <= src`.
#[inline(always)]
pub unsafe fn copy_from_output<const W: usize>(dst: *mut u8, src: *const u8) {
    ptr::copy_nonoverlapping(src, dst, W);
}

/// Copy at least `size` literal bytes from the compressed input in `W`-byte
/// strides.  At least one stride is always copied.
///
/// # Safety
/// `src` must be readable and `dst` writable for `size` rounded up to the
/// next multiple of `W` (at least `W`) bytes, and the two ranges must not
/// overlap.
#[inline(always)]
pub unsafe fn wild_copy_from_input<const W: usize>(
    mut dst: *mut u8,
    mut src: *const u8,
    size: usize,
) {
    let mut i = 0;
    loop {
        ptr::copy_nonoverlapping(src, dst, W);
        dst = dst.add(W);
        src = src.add(W);
        i += W;
        if i >= size {
            break;
        }
    }
}

/// Copy at least `size` bytes of earlier output forward in `W`-byte strides.
///
/// Strides run in order, so a later stride may read bytes an earlier stride
/// has just written; that is how long repeating matches unroll.
///
/// # Safety
/// `dst - src >= W`, `src` readable and `dst` writable for `size` rounded up
/// to the next multiple of `W` (at least `W`) bytes.
#[inline(always)]
pub unsafe fn wild_copy_from_output<const W: usize>(
    mut dst: *mut u8,
    mut src: *const u8,
    size: usize,
) {
    let mut i = 0;
    loop {
        ptr::copy_nonoverlapping(src, dst, W);
        dst = dst.add(W);
        src = src.add(W);
        i += W;
        if i >= size {
            break;
        }
    }
}
