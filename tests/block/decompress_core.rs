// Block decoder tests: every variant, every overlap backend the CPU has
//
// Covers:
//   - round trips through the reference encoder at sizes 0, 1, < 32,
//     32..1000 and > 100000
//   - identical results across variants, including on garbage input
//   - truncation at every byte boundary fails
//   - destination size mismatches fail
//   - hand-built blocks: "ab" * 500, short literal run, zero offset
//   - nothing is written past dest_size + ADDITIONAL_BYTES_AT_END_OF_BUFFER

use lz4_adaptive::block::{
    decompress_block, Copy16, Copy32, Copy8, DecompressError, Portable,
    ADDITIONAL_BYTES_AT_END_OF_BUFFER,
};
#[cfg(target_arch = "x86_64")]
use lz4_adaptive::block::{
    check_buffers, decompress_impl_ssse3, CopyVariant, Ssse3Copy16, Ssse3Copy32, Ssse3Copy8,
};
use lz4_adaptive::sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SLACK: usize = ADDITIONAL_BYTES_AT_END_OF_BUFFER;
const GUARD: usize = 64;
const GUARD_BYTE: u8 = 0xCC;

type Decode = fn(&[u8], usize, &mut [u8], usize) -> Result<(), DecompressError>;

fn decoders() -> Vec<(&'static str, Decode)> {
    let mut list: Vec<(&'static str, Decode)> = vec![
        ("copy8", decompress_block::<Copy8> as Decode),
        ("copy16", decompress_block::<Copy16> as Decode),
        ("copy32", decompress_block::<Copy32> as Decode),
        ("portable8", decompress_block::<Portable<Copy8>> as Decode),
        ("portable16", decompress_block::<Portable<Copy16>> as Decode),
        ("portable32", decompress_block::<Portable<Copy32>> as Decode),
    ];
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("ssse3") {
        list.push(("ssse3_8", decode_ssse3::<Ssse3Copy8> as Decode));
        list.push(("ssse3_16", decode_ssse3::<Ssse3Copy16> as Decode));
        list.push(("ssse3_32", decode_ssse3::<Ssse3Copy32> as Decode));
    }
    list
}

/// The SSSE3-compiled loop the dispatcher runs on capable CPUs.
#[cfg(target_arch = "x86_64")]
fn decode_ssse3<V: CopyVariant>(
    src: &[u8],
    src_size: usize,
    dst: &mut [u8],
    dst_size: usize,
) -> Result<(), DecompressError> {
    check_buffers(src, src_size, dst, dst_size)?;
    // SAFETY: buffers checked; only pushed into `decoders` when SSSE3 is detected.
    unsafe { decompress_impl_ssse3::<V>(src, src_size, dst, dst_size) }
}

fn padded(bytes: &[u8]) -> Vec<u8> {
    let mut v = bytes.to_vec();
    v.resize(bytes.len() + SLACK, 0);
    v
}

/// Decode into a buffer with a guard region after the slack and check the
/// guard survives.  Returns the result and the logical output.
fn decode_guarded(
    name: &str,
    decode: Decode,
    src: &[u8],
    dest_size: usize,
) -> (Result<(), DecompressError>, Vec<u8>) {
    let source = padded(src);
    let mut dst = vec![GUARD_BYTE; dest_size + SLACK + GUARD];
    let (window, guard) = dst.split_at_mut(dest_size + SLACK);
    let result = decode(&source, src.len(), window, dest_size);
    assert!(
        guard.iter().all(|&b| b == GUARD_BYTE),
        "{name}: wrote past the destination slack (dest_size {dest_size})"
    );
    dst.truncate(dest_size);
    (result, dst)
}

fn roundtrip_all(data: &[u8]) {
    let compressed = lz4_flex::block::compress(data);
    for (name, decode) in decoders() {
        let (result, out) = decode_guarded(name, decode, &compressed, data.len());
        assert_eq!(result, Ok(()), "{name}: decode failed for {} bytes", data.len());
        assert!(out == data, "{name}: output differs for {} bytes", data.len());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_empty_and_single_byte() {
    roundtrip_all(b"");
    roundtrip_all(b"x");
}

#[test]
fn roundtrip_shorter_than_widest_copy() {
    for len in 2..32 {
        let data: Vec<u8> = (0..len).map(|i| b"abcab"[i % 5]).collect();
        roundtrip_all(&data);
    }
}

#[test]
fn roundtrip_small_blocks() {
    let mut rng = StdRng::seed_from_u64(11);
    for len in [32, 33, 47, 64, 100, 255, 256, 511, 777, 1000] {
        roundtrip_all(&sample::generate(len, len as u64));
        let mut noise = vec![0u8; len];
        rng.fill(noise.as_mut_slice());
        roundtrip_all(&noise);
    }
}

#[test]
fn roundtrip_large_blocks() {
    roundtrip_all(&sample::generate(100_001, 1));
    roundtrip_all(&sample::generate(1 << 20, 2));
}

/// Every short period, so every overlap offset shows up as a match.
#[test]
fn roundtrip_every_period() {
    for period in 1..=40usize {
        let data: Vec<u8> = (0..4096).map(|i| (i % period) as u8 ^ 0x5A).collect();
        roundtrip_all(&data);
    }
}

#[test]
fn roundtrip_long_literal_and_match_runs() {
    let mut data = vec![0u8; 70_000];
    StdRng::seed_from_u64(5).fill(&mut data[..20_000]);
    // 20_000 literals, then a 50_000-byte run: both need multi-byte extensions.
    roundtrip_all(&data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism across variants
// ─────────────────────────────────────────────────────────────────────────────

/// On arbitrary bytes every variant must agree on success, and on success
/// must produce the same output.
#[test]
fn variants_agree_on_garbage() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..2_000 {
        let len = rng.gen_range(1..200);
        let mut src = vec![0u8; len];
        rng.fill(src.as_mut_slice());
        let dest_size = rng.gen_range(1..600);

        let results: Vec<_> = decoders()
            .into_iter()
            .map(|(name, decode)| decode_guarded(name, decode, &src, dest_size))
            .collect();
        let (first_result, first_out) = &results[0];
        for (result, out) in &results[1..] {
            assert_eq!(result, first_result, "input {src:?} dest_size {dest_size}");
            if result.is_ok() {
                assert_eq!(out, first_out);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Truncation and size mismatches
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn truncation_at_every_boundary_fails() {
    let data = sample::generate(3_000, 21);
    let compressed = lz4_flex::block::compress(&data);
    for cut in 0..compressed.len() {
        for (name, decode) in decoders() {
            let (result, _) = decode_guarded(name, decode, &compressed[..cut], data.len());
            assert_eq!(
                result,
                Err(DecompressError::MalformedInput),
                "{name}: truncated to {cut} of {} bytes",
                compressed.len()
            );
        }
    }
}

#[test]
fn destination_too_small_fails() {
    let data = sample::generate(5_000, 4);
    let compressed = lz4_flex::block::compress(&data);
    // The final literal run holds at least the last five bytes, so no run
    // ends at any of these sizes.
    for dest_size in [data.len() - 1, data.len() - 2, data.len() - 3] {
        for (name, decode) in decoders() {
            let (result, _) = decode_guarded(name, decode, &compressed, dest_size);
            assert_eq!(result, Err(DecompressError::MalformedInput), "{name}: {dest_size}");
        }
    }
}

#[test]
fn destination_too_large_fails() {
    let data = sample::generate(5_000, 4);
    let compressed = lz4_flex::block::compress(&data);
    for (name, decode) in decoders() {
        let (result, _) = decode_guarded(name, decode, &compressed, data.len() + 1);
        assert_eq!(result, Err(DecompressError::MalformedInput), "{name}");
    }
}

#[test]
fn trailing_source_bytes_are_ignored() {
    let data = b"trailing bytes after the last literal run are not looked at".repeat(3);
    let mut compressed = lz4_flex::block::compress(&data);
    compressed.extend_from_slice(&[0xFF; 9]);
    for (name, decode) in decoders() {
        let (result, out) = decode_guarded(name, decode, &compressed, data.len());
        assert_eq!(result, Ok(()), "{name}");
        assert_eq!(out, data);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hand-built blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ab_times_500_from_reference_encoder() {
    let data = b"ab".repeat(500);
    let compressed = lz4_flex::block::compress(&data);
    for (name, decode) in decoders() {
        let (result, out) = decode_guarded(name, decode, &compressed, 1000);
        assert_eq!(result, Ok(()), "{name}");
        assert_eq!(out, data, "{name}");
    }
}

#[test]
fn ab_times_500_hand_encoded() {
    // "ab", match offset 2 length 993 (4 + 15 + 255 * 3 + 209), then "babab".
    let block = [
        0x2F, b'a', b'b', 0x02, 0x00, 255, 255, 255, 209, //
        0x50, b'b', b'a', b'b', b'a', b'b',
    ];
    let expected = b"ab".repeat(500);
    for (name, decode) in decoders() {
        let (result, out) = decode_guarded(name, decode, &block, 1000);
        assert_eq!(result, Ok(()), "{name}");
        assert_eq!(out, expected, "{name}");
    }
}

#[test]
fn ten_literals_truncated_to_three_bytes() {
    let block = [0xA0, b'x', b'y'];
    for (name, decode) in decoders() {
        let (result, _) = decode_guarded(name, decode, &block, 10);
        assert_eq!(result, Err(DecompressError::MalformedInput), "{name}");
    }
}

#[test]
fn zero_offset_at_output_start() {
    // No literals, match offset 0, then a final literal run.
    let block = [0x00, 0x00, 0x00, 0x50, b'a', b'b', b'c', b'd', b'e'];
    for (name, decode) in decoders() {
        let (result, _) = decode_guarded(name, decode, &block, 9);
        assert_eq!(result, Err(DecompressError::MalformedInput), "{name}");
    }
}

#[test]
fn offset_before_output_start() {
    // Two literals, then a match reaching three bytes back.
    let block = [0x20, b'a', b'b', 0x03, 0x00, 0x50, b'a', b'b', b'c', b'd', b'e'];
    for (name, decode) in decoders() {
        let (result, _) = decode_guarded(name, decode, &block, 11);
        assert_eq!(result, Err(DecompressError::MalformedInput), "{name}");
    }
}

#[test]
fn match_longer_than_destination() {
    // "a", match offset 1 length 20; only 10 bytes of room.
    let block = [0x1F, b'a', 0x01, 0x00, 0x01, 0x10, b'z'];
    for (name, decode) in decoders() {
        let (result, _) = decode_guarded(name, decode, &block, 10);
        assert_eq!(result, Err(DecompressError::MalformedInput), "{name}");
    }
}

#[test]
fn extension_running_off_the_input_fails() {
    let block = [0xF0, 255, 255, 255];
    for (name, decode) in decoders() {
        let (result, _) = decode_guarded(name, decode, &block, 1000);
        assert_eq!(result, Err(DecompressError::MalformedInput), "{name}");
    }
}

#[test]
fn missing_slack_is_a_caller_error() {
    let compressed = lz4_flex::block::compress(b"hello hello hello");
    let mut dst = vec![0u8; 17 + SLACK];
    assert_eq!(
        decompress_block::<Copy16>(&compressed, compressed.len(), &mut dst, 17),
        Err(DecompressError::SourceTooShort {
            required: compressed.len() + SLACK,
            available: compressed.len()
        })
    );
    let src = padded(&compressed);
    let mut short = vec![0u8; 17 + SLACK - 1];
    let err = decompress_block::<Copy16>(&src, compressed.len(), &mut short, 17).unwrap_err();
    assert!(matches!(err, DecompressError::DestinationTooShort { .. }));
    assert!(!err.is_corrupted_data());
}
