//! LZ4 block decoder, generic over the copy width.
//!
//! [`decompress_impl`] parses the token stream and rebuilds the output with
//! `W`-byte wild copies.  It is instantiated once per [`CopyVariant`]; the
//! dispatch layer picks which instantiation runs.
//!
//! # Security boundary
//!
//! Malformed, truncated, or adversarial input must come back as
//! `Err(DecompressError::MalformedInput)`, never as a panic or an access
//! outside the caller's buffers.  Bounds are tracked as `usize` positions so
//! no out-of-range pointer is ever formed; each token costs a handful of
//! checked comparisons and the copies themselves run unchecked inside the
//! slack region guaranteed by [`check_buffers`].

use super::types::{
    read_le16, DecompressError, ADDITIONAL_BYTES_AT_END_OF_BUFFER, MINMATCH, ML_BITS, ML_MASK,
    RUN_MASK,
};
use super::variant::{CopyVariant, Portable};

#[inline(always)]
fn output_error<T>() -> Result<T, DecompressError> {
    Err(DecompressError::MalformedInput)
}

// ─────────────────────────────────────────────────────────────────────────────
// Buffer contract
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that both slices carry their logical size plus
/// [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`] bytes of slack.
pub fn check_buffers(
    src: &[u8],
    src_size: usize,
    dst: &[u8],
    dst_size: usize,
) -> Result<(), DecompressError> {
    let src_required = src_size.saturating_add(ADDITIONAL_BYTES_AT_END_OF_BUFFER);
    if src.len() < src_required {
        return Err(DecompressError::SourceTooShort { required: src_required, available: src.len() });
    }
    let dst_required = dst_size.saturating_add(ADDITIONAL_BYTES_AT_END_OF_BUFFER);
    if dst.len() < dst_required {
        return Err(DecompressError::DestinationTooShort {
            required: dst_required,
            available: dst.len(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Length extension
// ─────────────────────────────────────────────────────────────────────────────

/// Sum extension bytes starting at `*ip`.  Stops after the first byte that
/// is not 255, or when the input runs out.
///
/// # Safety
/// `*ip < input_end` and `input_end` bytes are readable at `src`.
#[inline(always)]
unsafe fn read_length_extension(src: *const u8, ip: &mut usize, input_end: usize) -> usize {
    let mut length: usize = 0;
    loop {
        let s = *src.add(*ip);
        *ip += 1;
        length = length.saturating_add(s as usize);
        if s != 255 || *ip >= input_end {
            break;
        }
    }
    length
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder loop
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one LZ4 block of `src_size` compressed bytes into exactly
/// `dst_size` bytes of `dst`.
///
/// Returns `Ok(())` only when the last literal run ends exactly at
/// `dst_size`; trailing source bytes after that point are ignored.  On error
/// the contents of `dst` are unspecified.
///
/// Bytes of `dst` past `dst_size` are scratch space and may be overwritten.
///
/// # Safety
/// [`check_buffers`] must have succeeded for the same arguments, and
/// `V::is_supported()` must hold.
#[inline(never)]
pub unsafe fn decompress_impl<V: CopyVariant>(
    src: &[u8],
    src_size: usize,
    dst: &mut [u8],
    dst_size: usize,
) -> Result<(), DecompressError> {
    decompress_loop::<V>(src, src_size, dst, dst_size)
}

/// [`decompress_impl`] compiled with SSSE3 enabled, so the `pshufb` overlap
/// copies of the `Ssse3Copy*` variants inline into the loop.
///
/// # Safety
/// As [`decompress_impl`]; the CPU must support SSSE3.
#[cfg(target_arch = "x86_64")]
#[inline(never)]
#[target_feature(enable = "ssse3")]
pub unsafe fn decompress_impl_ssse3<V: CopyVariant>(
    src: &[u8],
    src_size: usize,
    dst: &mut [u8],
    dst_size: usize,
) -> Result<(), DecompressError> {
    decompress_loop::<V>(src, src_size, dst, dst_size)
}

#[inline(always)]
unsafe fn decompress_loop<V: CopyVariant>(
    src: &[u8],
    src_size: usize,
    dst: &mut [u8],
    dst_size: usize,
) -> Result<(), DecompressError> {
    debug_assert!(check_buffers(src, src_size, dst, dst_size).is_ok());

    let ibase: *const u8 = src.as_ptr();
    let obase: *mut u8 = dst.as_mut_ptr();

    let input_end = src_size;
    let output_end = dst_size;
    // Wild copies may read this far; reads must stay strictly below it.
    let read_limit = src_size + ADDITIONAL_BYTES_AT_END_OF_BUFFER;

    // Invariants at the top of each iteration: ip <= input_end, op <= output_end.
    let mut ip: usize = 0;
    let mut op: usize = 0;

    loop {
        // ── Token ────────────────────────────────────────────────────────────
        if ip >= input_end {
            return output_error();
        }
        // SAFETY: ip < input_end.
        let token = *ibase.add(ip);
        ip += 1;

        // ── Literals ─────────────────────────────────────────────────────────
        let mut length = (token >> ML_BITS) as usize;
        if length == RUN_MASK as usize {
            if ip + 1 >= input_end {
                return output_error();
            }
            // SAFETY: ip < input_end.
            length = length.saturating_add(read_length_extension(ibase, &mut ip, input_end));
        }

        if length > output_end - op {
            return output_error();
        }
        if length > input_end - ip {
            // The stream claims more literals than it carries.
            return output_error();
        }
        // The wild copy below reads whole strides.
        let real_length = (length / V::WIDTH + 1) * V::WIDTH;
        if real_length >= read_limit - ip {
            return output_error();
        }

        let copy_end = op + length;
        // SAFETY: reads stay below read_limit (checked above); writes end
        // before copy_end + W <= dst_size + ADDITIONAL_BYTES_AT_END_OF_BUFFER.
        V::wild_copy_from_input(obase.add(op), ibase.add(ip), length);

        if copy_end == output_end {
            return Ok(());
        }
        ip += length;
        op = copy_end;

        // ── Match offset ─────────────────────────────────────────────────────
        if ip + 1 >= input_end {
            return output_error();
        }
        // SAFETY: ip + 1 < input_end.
        let offset = read_le16(ibase.add(ip)) as usize;
        ip += 2;

        if offset == 0 || offset > op {
            // Zero offsets and references before the start of the output
            // are both invalid.
            return output_error();
        }
        // SAFETY: offset <= op.
        let mut match_ptr: *const u8 = obase.add(op - offset);

        // ── Match length ─────────────────────────────────────────────────────
        let mut length = (token as u32 & ML_MASK) as usize;
        if length == ML_MASK as usize {
            if ip + 1 >= input_end {
                return output_error();
            }
            // SAFETY: ip < input_end.
            length = length.saturating_add(read_length_extension(ibase, &mut ip, input_end));
        }
        length = length.saturating_add(MINMATCH);

        if length > output_end - op {
            return output_error();
        }
        let copy_end = op + length;

        // ── Match copy ───────────────────────────────────────────────────────
        //
        // output: Hello
        //              ^-op
        //         ^-match_ptr; offset = 5
        //
        // output: HelloHelloHel
        //            ^-match_ptr ^-op + W
        //
        // Worst case (length == MINMATCH at the very end of the output) writes
        // 2 * W - MINMATCH bytes past dst_size.
        let mut out = obase.add(op);
        if offset < V::WIDTH {
            // SAFETY: 1 <= offset < W, match_ptr == out - offset; W bytes are
            // readable from match_ptr and writable at out inside dst + slack.
            V::copy_overlap(out, &mut match_ptr, offset);
        } else {
            // SAFETY: offset >= W, so the ranges do not overlap.
            V::copy_from_output(out, match_ptr);
            match_ptr = match_ptr.add(V::WIDTH);
        }
        out = out.add(V::WIDTH);

        // SAFETY: from here on out - match_ptr >= W.
        V::copy_from_output(out, match_ptr);
        if length > 2 * V::WIDTH {
            // SAFETY: copy_end <= dst_size; the final stride ends before
            // copy_end + W.
            V::wild_copy_from_output(
                out.add(V::WIDTH),
                match_ptr.add(V::WIDTH),
                copy_end - (op + 2 * V::WIDTH),
            );
        }

        op = copy_end;
    }
}

/// Checked entry point for a single variant.
///
/// Validates the slack contract with [`check_buffers`] and then runs
/// [`decompress_impl`].  A variant the CPU cannot run decodes through
/// [`Portable`] instead.
pub fn decompress_block<V: CopyVariant>(
    src: &[u8],
    src_size: usize,
    dst: &mut [u8],
    dst_size: usize,
) -> Result<(), DecompressError> {
    check_buffers(src, src_size, dst, dst_size)?;
    // SAFETY: the buffer contract was just verified; `Portable<V>` only uses
    // scalar copies.
    unsafe {
        if V::is_supported() {
            decompress_impl::<V>(src, src_size, dst, dst_size)
        } else {
            decompress_impl::<Portable<V>>(src, src_size, dst, dst_size)
        }
    }
}
