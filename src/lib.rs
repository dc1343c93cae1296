// lz4-adaptive: LZ4 block decompression with throughput-driven variant selection

pub mod display;
pub mod timefn;
pub mod config;
pub mod block;
pub mod stats;
pub mod dispatch;
pub mod sample;
pub mod perf;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::{DecompressError, PaddedBuffer, ADDITIONAL_BYTES_AT_END_OF_BUFFER};
pub use dispatch::{decompress, decompress_padded, decompress_variant};
pub use stats::{PerformanceStatistics, SelectionMethod};
