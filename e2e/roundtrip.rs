//! E2E Suite 01: round trips through the public entry point
//!
//! Compresses realistic inputs with the reference encoder and decodes them
//! through `decompress` / `decompress_padded` with a shared selector, the way
//! a column reader would:
//! - many blocks of mixed sizes, above and below the measurement threshold
//! - inputs whose matches exercise every overlap offset
//! - the selector's statistics grow only for measured blocks

extern crate lz4_adaptive;

use lz4_adaptive::config::MEASUREMENT_THRESHOLD;
use lz4_adaptive::{
    decompress, decompress_padded, sample, PaddedBuffer, PerformanceStatistics,
    ADDITIONAL_BYTES_AT_END_OF_BUFFER,
};

fn roundtrip(data: &[u8], stats: &PerformanceStatistics) {
    let compressed = lz4_flex::block::compress(data);
    let mut source = compressed.clone();
    source.resize(compressed.len() + ADDITIONAL_BYTES_AT_END_OF_BUFFER, 0);
    let mut dest = vec![0u8; data.len() + ADDITIONAL_BYTES_AT_END_OF_BUFFER];
    decompress(&source, compressed.len(), &mut dest, data.len(), stats)
        .unwrap_or_else(|e| panic!("{} bytes: {e}", data.len()));
    assert!(&dest[..data.len()] == data, "{} bytes: output differs", data.len());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: a column of mixed-size blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_mixed_block_sizes_share_one_selector() {
    let stats = PerformanceStatistics::new();
    let sizes = [0, 1, 7, 31, 32, 999, 4096, 32_767, 32_768, 65_536, 100_001, 1 << 20];
    let mut measured = 0u64;
    for (seed, &size) in sizes.iter().enumerate() {
        roundtrip(&sample::generate(size, seed as u64), &stats);
        if size >= MEASUREMENT_THRESHOLD {
            measured += 1;
        }
    }
    let recorded: u64 = stats.snapshot().iter().map(|s| s.invocations).sum();
    assert_eq!(recorded, measured);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: periodic data, every overlap offset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_periodic_columns() {
    let stats = PerformanceStatistics::new();
    for period in 1..=64usize {
        let data: Vec<u8> = (0..MEASUREMENT_THRESHOLD + 1000)
            .map(|i| (i % period) as u8 * 3 + 1)
            .collect();
        roundtrip(&data, &stats);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: repeated decodes of the same block converge without corrupting output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_repeated_decodes_stay_correct() {
    let stats = PerformanceStatistics::new();
    let data = sample::generate(256 * 1024, 42);
    let source = PaddedBuffer::from_slice(&lz4_flex::block::compress(&data));
    let mut dest = PaddedBuffer::with_len(data.len());
    for _ in 0..200 {
        decompress_padded(&source, &mut dest, &stats).expect("decode");
        assert!(dest.as_slice() == &data[..]);
    }
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.iter().map(|s| s.invocations).sum::<u64>(), 200);
    assert!(snapshot.iter().all(|s| s.invocations >= 4), "{snapshot:?}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: incompressible input
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_incompressible_block() {
    use rand::{Rng, SeedableRng};
    let mut data = vec![0u8; 300_000];
    rand::rngs::StdRng::seed_from_u64(1).fill(data.as_mut_slice());
    roundtrip(&data, &PerformanceStatistics::new());
}
