// sample.rs: Synthetic input for the decompression perf tool.
//
// Produces a byte stream that looks like the column data the decoder is tuned
// for.  Segments of four kinds are interleaved:
//
//   text      words drawn from a small vocabulary, long-offset matches
//   periodic  a short pattern (period 1..32) repeated, overlap copies
//   counters  little-endian integers with small increments, short matches
//   noise     random bytes, literal runs
//
// The mix makes every overlap offset and both copy paths show up in the
// compressed blocks, so all three decoder variants get real work.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

static WORDS: &[&str] = &[
    "select", "from", "where", "group", "order", "limit", "insert", "into",
    "values", "table", "column", "merge", "tree", "part", "granule", "mark",
    "index", "primary", "key", "sample", "final", "prewhere", "array", "join",
    "tuple", "nullable", "string", "fixed", "decimal", "date", "time", "zone",
    "uint", "int", "float", "codec", "block", "stream", "buffer", "cache",
    "query", "thread", "pool", "replica", "shard", "cluster", "node", "disk",
];

/// Segment length bounds, in bytes.
const SEGMENT_MIN: usize = 256;
const SEGMENT_MAX: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Fill a new buffer of exactly `size` bytes with synthetic column-like data.
/// The same `seed` always produces the same bytes.
pub fn generate(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(size + SEGMENT_MAX);
    while out.len() < size {
        let segment = rng.gen_range(SEGMENT_MIN..=SEGMENT_MAX);
        match rng.gen_range(0u32..10) {
            0..=3 => push_text(&mut out, &mut rng, segment),
            4..=6 => push_periodic(&mut out, &mut rng, segment),
            7..=8 => push_counters(&mut out, &mut rng, segment),
            _ => push_noise(&mut out, &mut rng, segment),
        }
    }
    out.truncate(size);
    out
}

fn push_text(out: &mut Vec<u8>, rng: &mut StdRng, len: usize) {
    let end = out.len() + len;
    while out.len() < end {
        let word = WORDS[rng.gen_range(0..WORDS.len())];
        out.extend_from_slice(word.as_bytes());
        out.push(if rng.gen_ratio(1, 12) { b'\n' } else { b' ' });
    }
}

fn push_periodic(out: &mut Vec<u8>, rng: &mut StdRng, len: usize) {
    let period = rng.gen_range(1..=32usize);
    let mut pattern = [0u8; 32];
    rng.fill(&mut pattern[..period]);
    out.extend((0..len).map(|i| pattern[i % period]));
}

fn push_counters(out: &mut Vec<u8>, rng: &mut StdRng, len: usize) {
    let mut value: u32 = rng.gen();
    let step_max = 1u32 << rng.gen_range(0..12);
    for _ in 0..len / 4 {
        out.extend_from_slice(&value.to_le_bytes());
        value = value.wrapping_add(rng.gen_range(0..=step_max));
    }
}

fn push_noise(out: &mut Vec<u8>, rng: &mut StdRng, len: usize) {
    let start = out.len();
    out.resize(start + len, 0);
    rng.fill(&mut out[start..]);
}
