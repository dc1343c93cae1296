//! Copy-width variants of the block decoder.
//!
//! The decoder loop is written once, generic over [`CopyVariant`], and
//! monomorphised for each width so the stride, the masks and the advance
//! tables are compile-time constants inside the hot loop.
//!
//! | Variant index | Type     | Width |
//! |---------------|----------|-------|
//! | 0             | `Copy8`  | 8     |
//! | 1             | `Copy16` | 16    |
//! | 2             | `Copy32` | 32    |
//!
//! [`Portable`] wraps any of them and swaps the overlap copy for the scalar
//! backend, so the portable path can be run end-to-end on SIMD hardware.
//!
//! On x86_64, `Ssse3Copy8`/`Ssse3Copy16`/`Ssse3Copy32` use the `pshufb`
//! overlap copy regardless of the compile-time target.  They are only sound
//! on CPUs with SSSE3 and are meant to run inside
//! [`decompress_impl_ssse3`](super::decompress_core::decompress_impl_ssse3).

use core::marker::PhantomData;

use super::copy;
use super::overlap::{native, scalar};
#[cfg(target_arch = "x86_64")]
use super::overlap::ssse3;

/// Number of decoder variants the selector chooses between.
pub const VARIANT_COUNT: usize = 3;

/// Copy width of each variant, by variant index.
pub const VARIANT_WIDTHS: [usize; VARIANT_COUNT] = [8, 16, 32];

/// Compile-time description of one decoder variant.
///
/// All methods are raw-pointer primitives; their safety contracts are those
/// of the functions in [`copy`] and [`super::overlap`] they forward to.
pub trait CopyVariant {
    /// Copy granularity in bytes.
    const WIDTH: usize;
    /// Human-readable name used in reports.
    const NAME: &'static str;

    /// Whether the running CPU can execute [`copy_overlap`](Self::copy_overlap).
    #[inline]
    fn is_supported() -> bool {
        true
    }

    /// Overlapping copy for `1 <= offset < WIDTH`, using the backend this
    /// variant compiles to.
    ///
    /// # Safety
    /// See [`scalar::copy_overlap_8`] and friends.
    unsafe fn copy_overlap(op: *mut u8, match_ptr: &mut *const u8, offset: usize);

    /// Overlapping copy through the portable scalar backend.
    ///
    /// # Safety
    /// See [`scalar::copy_overlap_8`] and friends.
    unsafe fn copy_overlap_portable(op: *mut u8, match_ptr: &mut *const u8, offset: usize);

    /// # Safety
    /// See [`copy::copy_from_output`].
    unsafe fn copy_from_output(dst: *mut u8, src: *const u8);

    /// # Safety
    /// See [`copy::wild_copy_from_input`].
    unsafe fn wild_copy_from_input(dst: *mut u8, src: *const u8, size: usize);

    /// # Safety
    /// See [`copy::wild_copy_from_output`].
    unsafe fn wild_copy_from_output(dst: *mut u8, src: *const u8, size: usize);
}

macro_rules! copy_variant {
    ($name:ident, $width:literal, $overlap:ident) => {
        #[doc = concat!("Decoder variant copying in ", stringify!($width), "-byte strides.")]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl CopyVariant for $name {
            const WIDTH: usize = $width;
            const NAME: &'static str = stringify!($name);

            #[inline(always)]
            unsafe fn copy_overlap(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
                native::$overlap(op, match_ptr, offset)
            }

            #[inline(always)]
            unsafe fn copy_overlap_portable(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
                scalar::$overlap(op, match_ptr, offset)
            }

            #[inline(always)]
            unsafe fn copy_from_output(dst: *mut u8, src: *const u8) {
                copy::copy_from_output::<$width>(dst, src)
            }

            #[inline(always)]
            unsafe fn wild_copy_from_input(dst: *mut u8, src: *const u8, size: usize) {
                copy::wild_copy_from_input::<$width>(dst, src, size)
            }

            #[inline(always)]
            unsafe fn wild_copy_from_output(dst: *mut u8, src: *const u8, size: usize) {
                copy::wild_copy_from_output::<$width>(dst, src, size)
            }
        }
    };
}

copy_variant!(Copy8, 8, copy_overlap_8);
copy_variant!(Copy16, 16, copy_overlap_16);
copy_variant!(Copy32, 32, copy_overlap_32);

#[cfg(target_arch = "x86_64")]
macro_rules! ssse3_variant {
    ($name:ident, $base:ident, $overlap:ident) => {
        #[doc = concat!("[`", stringify!($base), "`] with the SSSE3 overlap copy.")]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl CopyVariant for $name {
            const WIDTH: usize = $base::WIDTH;
            const NAME: &'static str = $base::NAME;

            #[inline]
            fn is_supported() -> bool {
                is_x86_feature_detected!("ssse3")
            }

            #[inline(always)]
            unsafe fn copy_overlap(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
                ssse3::$overlap(op, match_ptr, offset)
            }

            #[inline(always)]
            unsafe fn copy_overlap_portable(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
                scalar::$overlap(op, match_ptr, offset)
            }

            #[inline(always)]
            unsafe fn copy_from_output(dst: *mut u8, src: *const u8) {
                $base::copy_from_output(dst, src)
            }

            #[inline(always)]
            unsafe fn wild_copy_from_input(dst: *mut u8, src: *const u8, size: usize) {
                $base::wild_copy_from_input(dst, src, size)
            }

            #[inline(always)]
            unsafe fn wild_copy_from_output(dst: *mut u8, src: *const u8, size: usize) {
                $base::wild_copy_from_output(dst, src, size)
            }
        }
    };
}

#[cfg(target_arch = "x86_64")]
ssse3_variant!(Ssse3Copy8, Copy8, copy_overlap_8);
#[cfg(target_arch = "x86_64")]
ssse3_variant!(Ssse3Copy16, Copy16, copy_overlap_16);
#[cfg(target_arch = "x86_64")]
ssse3_variant!(Ssse3Copy32, Copy32, copy_overlap_32);

/// `V` with its overlap copy forced onto the scalar backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable<V>(PhantomData<V>);

impl<V: CopyVariant> CopyVariant for Portable<V> {
    const WIDTH: usize = V::WIDTH;
    const NAME: &'static str = V::NAME;

    #[inline(always)]
    unsafe fn copy_overlap(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        V::copy_overlap_portable(op, match_ptr, offset)
    }

    #[inline(always)]
    unsafe fn copy_overlap_portable(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        V::copy_overlap_portable(op, match_ptr, offset)
    }

    #[inline(always)]
    unsafe fn copy_from_output(dst: *mut u8, src: *const u8) {
        V::copy_from_output(dst, src)
    }

    #[inline(always)]
    unsafe fn wild_copy_from_input(dst: *mut u8, src: *const u8, size: usize) {
        V::wild_copy_from_input(dst, src, size)
    }

    #[inline(always)]
    unsafe fn wild_copy_from_output(dst: *mut u8, src: *const u8, size: usize) {
        V::wild_copy_from_output(dst, src, size)
    }
}
