//! Public decompression entry point.
//!
//! [`decompress`] is what callers use: it picks a decoder variant through the
//! shared [`PerformanceStatistics`], times the decode when the block is large
//! enough for the measurement to mean something, and feeds the timing back.
//! Small blocks always go to the 8-byte variant, untimed.
//!
//! Every variant runs on the best overlap-copy backend the CPU supports
//! ([`runtime_backend`]), so an x86_64 build without SSSE3 in its target
//! still takes the `pshufb` path on hardware that has it.

use crate::block::{
    check_buffers, decompress_impl, runtime_backend, Backend, Copy16, Copy32, Copy8,
    DecompressError, PaddedBuffer, VARIANT_COUNT,
};
#[cfg(target_arch = "x86_64")]
use crate::block::{decompress_impl_ssse3, Ssse3Copy16, Ssse3Copy32, Ssse3Copy8};
use crate::config::MEASUREMENT_THRESHOLD;
use crate::stats::PerformanceStatistics;
use crate::timefn::Stopwatch;

/// Decode the LZ4 block in `source[..source_size]` into exactly
/// `dest[..dest_size]`.
///
/// Both slices must extend [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`] bytes past
/// their logical size; a shorter slice is reported as
/// [`DecompressError::SourceTooShort`] or
/// [`DecompressError::DestinationTooShort`] before anything is read.  The
/// destination slack is scratch space and may be overwritten.
///
/// This is stricter than a plain LZ4 block API, where `dest` needs only
/// `dest_size` writable bytes: allocate `dest_size + 64`, or use
/// [`decompress_padded`].
///
/// A zero `source_size` or `dest_size` succeeds without touching either
/// buffer.
///
/// [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`]: crate::ADDITIONAL_BYTES_AT_END_OF_BUFFER
pub fn decompress(
    source: &[u8],
    source_size: usize,
    dest: &mut [u8],
    dest_size: usize,
    stats: &PerformanceStatistics,
) -> Result<(), DecompressError> {
    if source_size == 0 || dest_size == 0 {
        return Ok(());
    }
    check_buffers(source, source_size, dest, dest_size)?;

    if dest_size < MEASUREMENT_THRESHOLD {
        // SAFETY: buffer contract verified above.
        return unsafe { run_variant(0, source, source_size, dest, dest_size) };
    }

    let variant = stats.select();
    let mut watch = Stopwatch::start();
    // SAFETY: buffer contract verified above; `select` returns a valid index.
    let result = unsafe { run_variant(variant, source, source_size, dest, dest_size) };
    watch.stop();
    stats.update(variant, watch.elapsed_seconds(), dest_size as f64);
    result
}

/// Decode with one specific variant, bypassing selection and timing.
///
/// Same buffer contract as [`decompress`].  `index` outside
/// `0..VARIANT_COUNT` is [`DecompressError::UnknownVariant`].
pub fn decompress_variant(
    index: usize,
    source: &[u8],
    source_size: usize,
    dest: &mut [u8],
    dest_size: usize,
) -> Result<(), DecompressError> {
    if index >= VARIANT_COUNT {
        return Err(DecompressError::UnknownVariant(index));
    }
    if source_size == 0 || dest_size == 0 {
        return Ok(());
    }
    check_buffers(source, source_size, dest, dest_size)?;
    // SAFETY: buffer contract verified above.
    unsafe { run_variant(index, source, source_size, dest, dest_size) }
}

/// [`decompress`] over buffers that carry their own slack.  `dest.len()` is
/// the expected decompressed size.
pub fn decompress_padded(
    source: &PaddedBuffer,
    dest: &mut PaddedBuffer,
    stats: &PerformanceStatistics,
) -> Result<(), DecompressError> {
    let source_size = source.len();
    let dest_size = dest.len();
    decompress(source.padded(), source_size, dest.padded_mut(), dest_size, stats)
}

/// Overlap-copy backend [`decompress`] runs on this machine.
pub fn active_backend() -> Backend {
    runtime_backend()
}

/// # Safety
/// [`check_buffers`] must have succeeded for the same arguments.
unsafe fn run_variant(
    index: usize,
    source: &[u8],
    source_size: usize,
    dest: &mut [u8],
    dest_size: usize,
) -> Result<(), DecompressError> {
    #[cfg(target_arch = "x86_64")]
    {
        if runtime_backend() == Backend::Ssse3 {
            return match index {
                0 => decompress_impl_ssse3::<Ssse3Copy8>(source, source_size, dest, dest_size),
                1 => decompress_impl_ssse3::<Ssse3Copy16>(source, source_size, dest, dest_size),
                2 => decompress_impl_ssse3::<Ssse3Copy32>(source, source_size, dest, dest_size),
                other => Err(DecompressError::UnknownVariant(other)),
            };
        }
    }

    match index {
        0 => decompress_impl::<Copy8>(source, source_size, dest, dest_size),
        1 => decompress_impl::<Copy16>(source, source_size, dest, dest_size),
        2 => decompress_impl::<Copy32>(source, source_size, dest, dest_size),
        other => Err(DecompressError::UnknownVariant(other)),
    }
}
