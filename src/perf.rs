//! Multi-threaded decompression throughput harness.
//!
//! The input is cut into fixed-size blocks, each block is compressed once with
//! the reference encoder, and then every block is decoded `iterations` times
//! through [`crate::decompress_padded`] on a rayon pool.  All workers share
//! one [`PerformanceStatistics`], exactly as concurrent readers of one column
//! would, so the report shows which variant the selector settled on.
//!
//! Every decoded block is checked against the xxh64 of its original bytes.

use std::io;

use rayon::prelude::*;
use xxhash_rust::xxh64::xxh64;

use crate::block::{PaddedBuffer, VARIANT_COUNT};
use crate::config::{
    MEASUREMENT_THRESHOLD, PERF_BLOCK_SIZE_DEFAULT, PERF_ITERATIONS_DEFAULT, STATS_RNG_SEED,
};
use crate::dispatch::decompress_padded;
use crate::stats::{PerformanceStatistics, SelectionMethod, VariantSnapshot};
use crate::timefn::Stopwatch;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Parameters of one perf run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfConfig {
    /// Uncompressed bytes per block.  Must be non-zero.
    pub block_size: usize,
    /// Times every block is decoded.
    pub iterations: usize,
    /// Worker threads; 0 means one per logical CPU.
    pub threads: usize,
    pub method: SelectionMethod,
    /// Seed for the selector's sampling RNG.
    pub seed: u64,
}

impl Default for PerfConfig {
    fn default() -> Self {
        PerfConfig {
            block_size: PERF_BLOCK_SIZE_DEFAULT,
            iterations: PERF_ITERATIONS_DEFAULT,
            threads: 0,
            method: SelectionMethod::Adaptive,
            seed: STATS_RNG_SEED,
        }
    }
}

impl PerfConfig {
    /// Worker count after resolving 0 to the number of logical CPUs.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.threads
        }
    }
}

// ── Block preparation ─────────────────────────────────────────────────────────

/// One compressed block plus what is needed to verify its decoding.
#[derive(Debug, Clone)]
pub struct PreparedBlock {
    pub compressed: PaddedBuffer,
    pub original_len: usize,
    /// xxh64 (seed 0) of the original bytes.
    pub checksum: u64,
}

/// Split `data` into `block_size` chunks and compress each independently.
pub fn prepare_blocks(data: &[u8], block_size: usize) -> Vec<PreparedBlock> {
    data.chunks(block_size.max(1))
        .map(|chunk| PreparedBlock {
            compressed: PaddedBuffer::from_slice(&lz4_flex::block::compress(chunk)),
            original_len: chunk.len(),
            checksum: xxh64(chunk, 0),
        })
        .collect()
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Outcome of a perf run.
#[derive(Debug, Clone)]
pub struct PerfReport {
    pub blocks: usize,
    pub threads: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    /// Total bytes produced by all decodes (`original_bytes * iterations`).
    pub decompressed_bytes: u64,
    pub elapsed_ns: u64,
    /// Decodes of blocks smaller than the measurement threshold; these always
    /// run the 8-byte variant and are not counted in `variants`.
    pub unmeasured_decodes: u64,
    pub variants: [VariantSnapshot; VARIANT_COUNT],
}

impl PerfReport {
    /// Aggregate decode throughput over all threads, in MB/s.
    pub fn throughput_mb_s(&self) -> f64 {
        if self.elapsed_ns == 0 {
            return 0.0;
        }
        self.decompressed_bytes as f64 * 1e3 / self.elapsed_ns as f64
    }

    pub fn ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            return 0.0;
        }
        self.original_bytes as f64 / self.compressed_bytes as f64
    }

    /// Print the summary to stdout.
    pub fn display(&self) {
        crate::displayout!(
            "{} blocks, {} -> {} bytes (x{:.3}), {} threads\n",
            self.blocks,
            self.original_bytes,
            self.compressed_bytes,
            self.ratio(),
            self.threads
        );
        crate::displayout!(
            "decoded {} bytes in {:.3} s: {:.1} MB/s\n",
            self.decompressed_bytes,
            self.elapsed_ns as f64 / 1e9,
            self.throughput_mb_s()
        );
        for v in &self.variants {
            match v.throughput() {
                Some(bps) => crate::displayout!(
                    "  variant {} ({:>2}-byte copies): {:>8} selected, {:>9.1} MB/s\n",
                    v.index,
                    v.copy_width,
                    v.invocations,
                    bps / 1e6
                ),
                None => crate::displayout!(
                    "  variant {} ({:>2}-byte copies): {:>8} selected\n",
                    v.index,
                    v.copy_width,
                    v.invocations
                ),
            }
        }
        if self.unmeasured_decodes > 0 {
            crate::displayout!("  {} small-block decodes (untimed)\n", self.unmeasured_decodes);
        }
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Compress `data` in blocks and decode it `config.iterations` times across
/// the configured thread count.
///
/// Fails with `InvalidInput` for a zero block size and with `InvalidData`
/// if any block fails to decode or decodes to the wrong bytes.
pub fn run(data: &[u8], config: &PerfConfig) -> io::Result<PerfReport> {
    if config.block_size == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "block size must be non-zero"));
    }
    let threads = config.effective_threads();

    crate::displaylevel!(3, "Compressing {} bytes in {} byte blocks\n", data.len(), config.block_size);
    let blocks = prepare_blocks(data, config.block_size);
    let compressed_bytes: u64 = blocks.iter().map(|b| b.compressed.len() as u64).sum();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(io::Error::other)?;
    let stats = PerformanceStatistics::with_method(config.method).with_seed(config.seed);

    crate::displaylevel!(
        3,
        "Decoding {} blocks x {} iterations on {} threads ({:?})\n",
        blocks.len(),
        config.iterations,
        threads,
        config.method
    );

    let jobs = blocks.len() * config.iterations;
    let mut watch = Stopwatch::start();
    pool.install(|| {
        (0..jobs).into_par_iter().try_for_each_init(PaddedBuffer::default, |scratch, job| {
            let index = job % blocks.len();
            decode_and_verify(&blocks[index], index, scratch, &stats)
        })
    })?;
    watch.stop();

    stats.report();

    let original_bytes = data.len() as u64;
    let small_blocks = blocks.iter().filter(|b| b.original_len < MEASUREMENT_THRESHOLD).count();
    Ok(PerfReport {
        blocks: blocks.len(),
        threads,
        original_bytes,
        compressed_bytes,
        decompressed_bytes: original_bytes * config.iterations as u64,
        elapsed_ns: watch.elapsed_ns(),
        unmeasured_decodes: (small_blocks * config.iterations) as u64,
        variants: stats.snapshot(),
    })
}

fn decode_and_verify(
    block: &PreparedBlock,
    index: usize,
    scratch: &mut PaddedBuffer,
    stats: &PerformanceStatistics,
) -> io::Result<()> {
    scratch.resize(block.original_len);
    decompress_padded(&block.compressed, scratch, stats).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("block {index}: {e}"))
    })?;
    if xxh64(scratch.as_slice(), 0) != block.checksum {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("block {index}: decoded data does not match checksum"),
        ));
    }
    Ok(())
}
