// Overlap copy tests: every backend against naive period repetition
//
// For each copy width W and every offset 1 <= o < W:
//   - the W bytes written at the cursor repeat the o-byte period behind it
//   - the advanced match pointer sits at least W bytes behind cursor + W
//   - the W bytes at the advanced pointer continue the same period, so the
//     following plain W-byte copy is correct

use lz4_adaptive::block::overlap::{self, ADVANCE_16, ADVANCE_32, ADVANCE_8};
use lz4_adaptive::block::{Copy16, Copy32, Copy8, CopyVariant, Portable};

const BASE: usize = 32;
const SENTINEL: u8 = 0xEE;

fn expected(pos: usize, offset: usize) -> u8 {
    // The period starts at BASE - offset with bytes 0x41, 0x42, ...
    0x41 + ((pos + offset - BASE) % offset) as u8
}

/// Run one overlap copy with the cursor at BASE and check its contract.
fn check<F>(width: usize, offset: usize, backend: &str, copy: F)
where
    F: Fn(*mut u8, &mut *const u8, usize),
{
    let mut buf = vec![SENTINEL; BASE + 2 * width];
    for pos in BASE - offset..BASE {
        buf[pos] = expected(pos, offset);
    }

    let base_ptr = buf.as_mut_ptr();
    // SAFETY: BASE - offset and BASE are inside buf.
    let op = unsafe { base_ptr.add(BASE) };
    let mut match_ptr = unsafe { base_ptr.add(BASE - offset) as *const u8 };
    copy(op, &mut match_ptr, offset);
    let m = match_ptr as usize - base_ptr as usize;

    for pos in BASE..BASE + width {
        assert_eq!(
            buf[pos],
            expected(pos, offset),
            "{backend} W={width} o={offset}: byte {}",
            pos - BASE
        );
    }
    assert!(m <= BASE, "{backend} W={width} o={offset}: match pointer ahead of cursor");
    assert!(m >= BASE - offset, "{backend} W={width} o={offset}: match pointer moved back");
    for j in 0..width {
        assert_eq!(
            buf[m + j],
            expected(BASE + width + j, offset),
            "{backend} W={width} o={offset}: period broken after advance at {j}"
        );
    }
    assert!(
        buf[BASE + width..].iter().all(|&b| b == SENTINEL),
        "{backend} W={width} o={offset}: wrote past W bytes"
    );
}

fn check_all_offsets<F>(width: usize, backend: &str, copy: F)
where
    F: Fn(*mut u8, &mut *const u8, usize),
{
    for offset in 1..width {
        check(width, offset, backend, &copy);
    }
}

// --- scalar backend ---

#[test]
fn scalar_8_all_offsets() {
    check_all_offsets(8, "scalar", |op, m, o| unsafe { overlap::scalar::copy_overlap_8(op, m, o) });
}

#[test]
fn scalar_16_all_offsets() {
    check_all_offsets(16, "scalar", |op, m, o| unsafe {
        overlap::scalar::copy_overlap_16(op, m, o)
    });
}

#[test]
fn scalar_32_all_offsets() {
    check_all_offsets(32, "scalar", |op, m, o| unsafe {
        overlap::scalar::copy_overlap_32(op, m, o)
    });
}

// --- compiled-in backend, through the variant types ---

#[test]
fn native_variants_all_offsets() {
    let name = overlap::NATIVE_BACKEND;
    check_all_offsets(8, name, |op, m, o| unsafe { Copy8::copy_overlap(op, m, o) });
    check_all_offsets(16, name, |op, m, o| unsafe { Copy16::copy_overlap(op, m, o) });
    check_all_offsets(32, name, |op, m, o| unsafe { Copy32::copy_overlap(op, m, o) });
}

#[test]
fn portable_variants_all_offsets() {
    check_all_offsets(8, "portable", |op, m, o| unsafe {
        Portable::<Copy8>::copy_overlap(op, m, o)
    });
    check_all_offsets(16, "portable", |op, m, o| unsafe {
        Portable::<Copy16>::copy_overlap(op, m, o)
    });
    check_all_offsets(32, "portable", |op, m, o| unsafe {
        Portable::<Copy32>::copy_overlap(op, m, o)
    });
}

// --- SSSE3 backend, when the CPU has it ---

#[cfg(target_arch = "x86_64")]
#[test]
fn ssse3_all_offsets() {
    if !is_x86_feature_detected!("ssse3") {
        return;
    }
    check_all_offsets(8, "ssse3", |op, m, o| unsafe { overlap::ssse3::copy_overlap_8(op, m, o) });
    check_all_offsets(16, "ssse3", |op, m, o| unsafe {
        overlap::ssse3::copy_overlap_16(op, m, o)
    });
    check_all_offsets(32, "ssse3", |op, m, o| unsafe {
        overlap::ssse3::copy_overlap_32(op, m, o)
    });
}

// --- advance tables ---

/// The pointer advance keeps the next read a whole number of periods back.
#[test]
fn advance_tables_preserve_phase() {
    fn verify(width: usize, table: &[u8]) {
        for offset in 1..width {
            let adv = table[offset] as usize;
            assert!(adv >= 1 && adv <= offset, "W={width} o={offset}");
            assert_eq!((offset - adv + width) % offset, 0, "W={width} o={offset}");
        }
    }
    verify(8, &ADVANCE_8);
    verify(16, &ADVANCE_16);
    verify(32, &ADVANCE_32);
}
