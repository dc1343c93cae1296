//! Overlapping match copies for offsets shorter than the copy width.
//!
//! When a match starts fewer than `W` bytes behind the output cursor, a
//! single `W`-byte copy would read bytes it has not produced yet.  These
//! routines instead write `W` bytes that repeat the `offset`-byte period found
//! at the match pointer, then advance the match pointer so that the next plain
//! `W`-byte copy continues the same period at a distance of at least `W`.
//!
//! Three backends produce identical bytes for every `offset` in `1..W`:
//!
//! | Backend  | Availability            | Technique                               |
//! |----------|-------------------------|-----------------------------------------|
//! | `scalar` | everywhere              | 4 byte copies + staged 4/8/16-byte copies |
//! | `ssse3`  | x86_64 with SSSE3       | one vector load + `pshufb` per 16 bytes |
//! | `neon`   | aarch64                 | one vector load + `tbl` per 8/16 bytes  |
//!
//! Offset `0` is never passed in; the decoder rejects it before copying.
//!
//! `native` is the backend the target enables at compile time.  The default
//! x86_64 target has no SSSE3, so [`runtime_backend`] detects it on the
//! running CPU and the dispatch layer switches to the `Ssse3Copy*` variants.

use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Match-pointer advance tables
// ─────────────────────────────────────────────────────────────────────────────
//
// ADVANCE_W[o] == W % o when that is non-zero, else o.  Entry 0 is unused.

pub static ADVANCE_8: [u8; 8] = [0, 1, 2, 2, 4, 3, 2, 1];

pub static ADVANCE_16: [u8; 16] = [0, 1, 2, 1, 4, 1, 4, 2, 8, 7, 6, 5, 4, 3, 2, 1];

pub static ADVANCE_32: [u8; 32] = [
    0, 1, 2, 2, 4, 2, 2, 4, 8, 5, 2, 10, 8, 6, 4, 2, //
    16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1,
];

// ─────────────────────────────────────────────────────────────────────────────
// Scalar stage tables
// ─────────────────────────────────────────────────────────────────────────────
//
// Read position (relative to the match pointer) for the stage that fills
// output bytes [k, 2k).  STAGE_k[o] ≡ k (mod o) and never exceeds o, so each
// stage reads only bytes that are already final.

/// Stage filling output bytes `4..8`.
pub static STAGE_4: [u8; 32] = [
    0, 1, 2, 1, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, //
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
];

/// Stage filling output bytes `8..16`.
pub static STAGE_8: [u8; 32] = [
    0, 1, 2, 2, 4, 3, 2, 1, 0, 8, 8, 8, 8, 8, 8, 8, //
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
];

/// Stage filling output bytes `16..32`.
pub static STAGE_16: [u8; 32] = [
    0, 1, 2, 1, 4, 1, 4, 2, 8, 7, 6, 5, 4, 3, 2, 1, //
    16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
];

// ─────────────────────────────────────────────────────────────────────────────
// Shuffle masks
// ─────────────────────────────────────────────────────────────────────────────

/// Build `table[o][i] = (start + i) % o` for `o` in `1..N`; row 0 stays zero.
const fn build_masks<const N: usize>(start: usize) -> [[u8; N]; N] {
    let mut table = [[0u8; N]; N];
    let mut o = 1;
    while o < N {
        let mut i = 0;
        while i < N {
            table[o][i] = ((start + i) % o) as u8;
            i += 1;
        }
        o += 1;
    }
    table
}

/// Permutation for the 8-byte variant: `MASKS_8[o][i] = i % o`.
pub static MASKS_8: [[u8; 8]; 8] = build_masks::<8>(0);

/// Permutation for the 16-byte variant and for the first half of the 32-byte
/// variant: `MASKS_16[o][i] = i % o`.
pub static MASKS_16: [[u8; 16]; 16] = build_masks::<16>(0);

/// Permutation for output bytes `16..32` of the 32-byte variant, taken from
/// the same 16-byte load: `MASKS_32_HI[o][i] = (16 + i) % o`.
pub static MASKS_32_HI: [[u8; 16]; 16] = build_masks::<16>(16);

// ─────────────────────────────────────────────────────────────────────────────
// Portable backend
// ─────────────────────────────────────────────────────────────────────────────

pub mod scalar {
    use super::{ADVANCE_16, ADVANCE_32, ADVANCE_8, STAGE_16, STAGE_4, STAGE_8};
    use core::ptr;

    /// The first four bytes go one at a time: for `offset < 4` each byte
    /// depends on the one written `offset` positions earlier.
    #[inline(always)]
    unsafe fn copy_head(op: *mut u8, m: *const u8) {
        *op = *m;
        *op.add(1) = *m.add(1);
        *op.add(2) = *m.add(2);
        *op.add(3) = *m.add(3);
    }

    /// # Safety
    /// `1 <= offset < 8`, `*match_ptr == op - offset`, `op` writable for 8 bytes.
    #[inline(always)]
    pub unsafe fn copy_overlap_8(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let m = *match_ptr;
        copy_head(op, m);
        ptr::copy_nonoverlapping(m.add(STAGE_4[offset] as usize), op.add(4), 4);
        *match_ptr = m.add(ADVANCE_8[offset] as usize);
    }

    /// # Safety
    /// `1 <= offset < 16`, `*match_ptr == op - offset`, `op` writable for 16 bytes.
    #[inline(always)]
    pub unsafe fn copy_overlap_16(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let m = *match_ptr;
        copy_head(op, m);
        ptr::copy_nonoverlapping(m.add(STAGE_4[offset] as usize), op.add(4), 4);
        ptr::copy_nonoverlapping(m.add(STAGE_8[offset] as usize), op.add(8), 8);
        *match_ptr = m.add(ADVANCE_16[offset] as usize);
    }

    /// # Safety
    /// `1 <= offset < 32`, `*match_ptr == op - offset`, `op` writable for 32 bytes.
    #[inline(always)]
    pub unsafe fn copy_overlap_32(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let m = *match_ptr;
        copy_head(op, m);
        ptr::copy_nonoverlapping(m.add(STAGE_4[offset] as usize), op.add(4), 4);
        ptr::copy_nonoverlapping(m.add(STAGE_8[offset] as usize), op.add(8), 8);
        ptr::copy_nonoverlapping(m.add(STAGE_16[offset] as usize), op.add(16), 16);
        *match_ptr = m.add(ADVANCE_32[offset] as usize);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 SSSE3 backend
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
pub mod ssse3 {
    use super::{ADVANCE_16, ADVANCE_32, ADVANCE_8, MASKS_16, MASKS_32_HI, MASKS_8};
    use core::arch::x86_64::*;

    /// Uses the low half of an `xmm` register; `mm` registers would put the
    /// x87 FPU into MMX mode.
    ///
    /// # Safety
    /// SSSE3 must be available. `1 <= offset < 8`, `*match_ptr == op - offset`,
    /// 8 bytes readable at `*match_ptr` and writable at `op`.
    #[inline]
    #[target_feature(enable = "ssse3")]
    pub unsafe fn copy_overlap_8(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let src = _mm_loadl_epi64(*match_ptr as *const __m128i);
        let mask = _mm_loadl_epi64(MASKS_8[offset].as_ptr() as *const __m128i);
        _mm_storel_epi64(op as *mut __m128i, _mm_shuffle_epi8(src, mask));
        *match_ptr = match_ptr.add(ADVANCE_8[offset] as usize);
    }

    /// # Safety
    /// SSSE3 must be available. `1 <= offset < 16`, `*match_ptr == op - offset`,
    /// 16 bytes readable at `*match_ptr` and writable at `op`.
    #[inline]
    #[target_feature(enable = "ssse3")]
    pub unsafe fn copy_overlap_16(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let src = _mm_loadu_si128(*match_ptr as *const __m128i);
        let mask = _mm_loadu_si128(MASKS_16[offset].as_ptr() as *const __m128i);
        _mm_storeu_si128(op as *mut __m128i, _mm_shuffle_epi8(src, mask));
        *match_ptr = match_ptr.add(ADVANCE_16[offset] as usize);
    }

    /// # Safety
    /// SSSE3 must be available. `1 <= offset < 32`, `*match_ptr == op - offset`,
    /// 32 bytes readable at `*match_ptr` and writable at `op`.
    #[inline]
    #[target_feature(enable = "ssse3")]
    pub unsafe fn copy_overlap_32(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let m = *match_ptr;
        if offset >= 16 {
            // The second load may read what the first store wrote (offset 16
            // means m + 16 == op), so the store must come first.
            _mm_storeu_si128(op as *mut __m128i, _mm_loadu_si128(m as *const __m128i));
            _mm_storeu_si128(
                op.add(16) as *mut __m128i,
                _mm_loadu_si128(m.add(16) as *const __m128i),
            );
        } else {
            // Both masks only select indices below `offset`.
            let src = _mm_loadu_si128(m as *const __m128i);
            let lo = _mm_loadu_si128(MASKS_16[offset].as_ptr() as *const __m128i);
            let hi = _mm_loadu_si128(MASKS_32_HI[offset].as_ptr() as *const __m128i);
            _mm_storeu_si128(op as *mut __m128i, _mm_shuffle_epi8(src, lo));
            _mm_storeu_si128(op.add(16) as *mut __m128i, _mm_shuffle_epi8(src, hi));
        }
        *match_ptr = m.add(ADVANCE_32[offset] as usize);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 NEON backend
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
pub mod neon {
    use super::{ADVANCE_16, ADVANCE_32, ADVANCE_8, MASKS_16, MASKS_32_HI, MASKS_8};
    use core::arch::aarch64::*;

    /// # Safety
    /// `1 <= offset < 8`, `*match_ptr == op - offset`, 8 bytes readable at
    /// `*match_ptr` and writable at `op`.
    #[inline(always)]
    pub unsafe fn copy_overlap_8(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let src = vld1_u8(*match_ptr);
        let mask = vld1_u8(MASKS_8[offset].as_ptr());
        vst1_u8(op, vtbl1_u8(src, mask));
        *match_ptr = match_ptr.add(ADVANCE_8[offset] as usize);
    }

    /// # Safety
    /// `1 <= offset < 16`, `*match_ptr == op - offset`, 16 bytes readable at
    /// `*match_ptr` and writable at `op`.
    #[inline(always)]
    pub unsafe fn copy_overlap_16(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let src = vld1q_u8(*match_ptr);
        let mask = vld1q_u8(MASKS_16[offset].as_ptr());
        vst1q_u8(op, vqtbl1q_u8(src, mask));
        *match_ptr = match_ptr.add(ADVANCE_16[offset] as usize);
    }

    /// # Safety
    /// `1 <= offset < 32`, `*match_ptr == op - offset`, 32 bytes readable at
    /// `*match_ptr` and writable at `op`.
    #[inline(always)]
    pub unsafe fn copy_overlap_32(op: *mut u8, match_ptr: &mut *const u8, offset: usize) {
        let m = *match_ptr;
        if offset >= 16 {
            vst1q_u8(op, vld1q_u8(m));
            vst1q_u8(op.add(16), vld1q_u8(m.add(16)));
        } else {
            let src = vld1q_u8(m);
            vst1q_u8(op, vqtbl1q_u8(src, vld1q_u8(MASKS_16[offset].as_ptr())));
            vst1q_u8(op.add(16), vqtbl1q_u8(src, vld1q_u8(MASKS_32_HI[offset].as_ptr())));
        }
        *match_ptr = m.add(ADVANCE_32[offset] as usize);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-time backend selection
// ─────────────────────────────────────────────────────────────────────────────

/// Name of the backend the `Copy8`/`Copy16`/`Copy32` variants compile to.
#[cfg(all(target_arch = "x86_64", target_feature = "ssse3"))]
pub const NATIVE_BACKEND: &str = "ssse3";
#[cfg(target_arch = "aarch64")]
pub const NATIVE_BACKEND: &str = "neon";
#[cfg(not(any(all(target_arch = "x86_64", target_feature = "ssse3"), target_arch = "aarch64")))]
pub const NATIVE_BACKEND: &str = "scalar";

#[cfg(all(target_arch = "x86_64", target_feature = "ssse3"))]
pub use self::ssse3 as native;

#[cfg(target_arch = "aarch64")]
pub use self::neon as native;

#[cfg(not(any(all(target_arch = "x86_64", target_feature = "ssse3"), target_arch = "aarch64")))]
pub use self::scalar as native;

// ─────────────────────────────────────────────────────────────────────────────
// Runtime backend selection
// ─────────────────────────────────────────────────────────────────────────────

/// Overlap-copy backend the dispatch layer runs on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Scalar,
    Ssse3,
    Neon,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Ssse3 => "ssse3",
            Backend::Neon => "neon",
        }
    }
}

fn detect_backend() -> Backend {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("ssse3") {
            return Backend::Ssse3;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return Backend::Neon;
    }

    #[allow(unreachable_code)]
    Backend::Scalar
}

/// Best backend the running CPU supports, detected once per process.
pub fn runtime_backend() -> Backend {
    static BACKEND: OnceLock<Backend> = OnceLock::new();
    *BACKEND.get_or_init(detect_backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_backend_is_stable_and_matches_cpu() {
        let backend = runtime_backend();
        assert_eq!(runtime_backend(), backend);
        #[cfg(target_arch = "x86_64")]
        assert_eq!(backend == Backend::Ssse3, is_x86_feature_detected!("ssse3"));
        #[cfg(target_arch = "aarch64")]
        assert_eq!(backend, Backend::Neon);
        assert!(["scalar", "ssse3", "neon"].contains(&backend.name()));
    }

    #[test]
    fn advance_tables_follow_modulo_rule() {
        fn expected(w: usize, o: usize) -> u8 {
            if w % o == 0 { o as u8 } else { (w % o) as u8 }
        }
        for o in 1..8 {
            assert_eq!(ADVANCE_8[o], expected(8, o), "W=8 offset {o}");
        }
        for o in 1..16 {
            assert_eq!(ADVANCE_16[o], expected(16, o), "W=16 offset {o}");
        }
        for o in 1..32 {
            assert_eq!(ADVANCE_32[o], expected(32, o), "W=32 offset {o}");
        }
    }

    #[test]
    fn stage_tables_stay_congruent_and_behind_cursor() {
        for o in 1..32 {
            for (k, table) in [(4usize, &STAGE_4), (8, &STAGE_8), (16, &STAGE_16)] {
                let s = table[o] as usize;
                assert_eq!(s % o, k % o, "stage {k} offset {o}");
                assert!(s <= o, "stage {k} offset {o} reads ahead");
            }
        }
    }

    #[test]
    fn mask_rows_match_explicit_values() {
        assert_eq!(MASKS_8[3], [0, 1, 2, 0, 1, 2, 0, 1]);
        assert_eq!(MASKS_16[5], [0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 0]);
        assert_eq!(MASKS_32_HI[9], [7, 8, 0, 1, 2, 3, 4, 5, 6, 7, 8, 0, 1, 2, 3, 4]);
        assert_eq!(MASKS_32_HI[3], [1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1]);
    }
}
