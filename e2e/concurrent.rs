//! E2E Suite 02: concurrent decoding with one shared selector
//!
//! Many threads decode independent blocks through the same
//! `PerformanceStatistics`, as concurrent readers of one column do.  Every
//! output must be correct and every measured call must be recorded.

use std::sync::Arc;
use std::thread;

use rayon::prelude::*;

use lz4_adaptive::{decompress_padded, sample, PaddedBuffer, PerformanceStatistics};

struct Block {
    source: PaddedBuffer,
    original: Vec<u8>,
}

fn blocks(count: usize, size: usize) -> Vec<Block> {
    (0..count)
        .map(|i| {
            let original = sample::generate(size, 1000 + i as u64);
            let source = PaddedBuffer::from_slice(&lz4_flex::block::compress(&original));
            Block { source, original }
        })
        .collect()
}

// ── 1. std threads ───────────────────────────────────────────────────────────

#[test]
fn test_std_threads_share_statistics() {
    let blocks = Arc::new(blocks(8, 64 * 1024));
    let stats = Arc::new(PerformanceStatistics::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let blocks = Arc::clone(&blocks);
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                let mut dest = PaddedBuffer::default();
                for round in 0..25 {
                    let block = &blocks[(t + round) % blocks.len()];
                    dest.resize(block.original.len());
                    decompress_padded(&block.source, &mut dest, &stats).expect("decode");
                    assert!(dest.as_slice() == &block.original[..]);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("worker panicked");
    }

    let recorded: u64 = stats.snapshot().iter().map(|s| s.invocations).sum();
    assert_eq!(recorded, 8 * 25);
}

// ── 2. rayon pool ────────────────────────────────────────────────────────────

#[test]
fn test_rayon_pool_shares_statistics() {
    let blocks = blocks(16, 48 * 1024);
    let stats = PerformanceStatistics::new();

    (0..blocks.len() * 20).into_par_iter().for_each_init(PaddedBuffer::default, |dest, job| {
        let block = &blocks[job % blocks.len()];
        dest.resize(block.original.len());
        decompress_padded(&block.source, dest, &stats).expect("decode");
        assert!(dest.as_slice() == &block.original[..]);
    });

    let recorded: u64 = stats.snapshot().iter().map(|s| s.invocations).sum();
    assert_eq!(recorded, 16 * 20);
}
