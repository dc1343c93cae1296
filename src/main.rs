//! Binary entry point for `lz4-decompress-perf`.
//!
//! Loads an input file (or generates sample data), compresses it in blocks
//! and decodes it repeatedly across threads, printing throughput and how
//! often each decoder variant was selected.
//!
//! ```text
//! lz4-decompress-perf [FILE] [-b SIZE] [-i N] [-T N] [-m METHOD] [-v|-q]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;

use lz4_adaptive::config::{
    parse_selection_method, selection_method_from_env, PERF_BLOCK_SIZE_DEFAULT,
    PERF_ITERATIONS_DEFAULT, PERF_SAMPLE_SIZE_DEFAULT, STATS_RNG_SEED,
};
use lz4_adaptive::display::{display_level, set_display_level};
use lz4_adaptive::perf::{self, PerfConfig};
use lz4_adaptive::{sample, SelectionMethod};

#[derive(Debug, Parser)]
#[command(name = "lz4-decompress-perf", version, about = "Measure adaptive LZ4 block decompression")]
struct Cli {
    /// Input file; synthetic sample data is used when omitted.
    input: Option<PathBuf>,

    /// Uncompressed block size, with optional K/M suffix.
    #[arg(short = 'b', long, value_parser = parse_size, default_value_t = PERF_BLOCK_SIZE_DEFAULT)]
    block_size: usize,

    /// Number of times every block is decoded.
    #[arg(short = 'i', long, default_value_t = PERF_ITERATIONS_DEFAULT)]
    iterations: usize,

    /// Worker threads (0 = one per logical CPU).
    #[arg(short = 'T', long, default_value_t = 0)]
    threads: usize,

    /// Variant selection: auto, round-robin, or a variant index 0..2.
    /// Defaults to LZ4_DECOMPRESS_METHOD, then auto.
    #[arg(short = 'm', long, value_parser = parse_method)]
    method: Option<SelectionMethod>,

    /// Size of the generated sample when no input file is given.
    #[arg(long, value_parser = parse_size, default_value_t = PERF_SAMPLE_SIZE_DEFAULT)]
    sample_size: usize,

    /// Seed for sample generation and the selector.
    #[arg(long, default_value_t = STATS_RNG_SEED)]
    seed: u64,

    /// More output; repeatable.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less output; repeatable.
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    quiet: u8,
}

/// `123`, `64K`, `4M`, `1G` (binary multiples).
fn parse_size(raw: &str) -> Result<usize, String> {
    let raw = raw.trim();
    let (digits, shift) = match raw.char_indices().last() {
        Some((i, 'K' | 'k')) => (&raw[..i], 10),
        Some((i, 'M' | 'm')) => (&raw[..i], 20),
        Some((i, 'G' | 'g')) => (&raw[..i], 30),
        _ => (raw, 0),
    };
    let value: usize = digits.parse().map_err(|_| format!("invalid size: {raw}"))?;
    value.checked_mul(1usize << shift).ok_or_else(|| format!("size too large: {raw}"))
}

fn parse_method(raw: &str) -> Result<SelectionMethod, String> {
    parse_selection_method(raw)
        .ok_or_else(|| format!("invalid method: {raw} (expected auto, round-robin or 0..2)"))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let level = (display_level() + cli.verbose as u32).saturating_sub(cli.quiet as u32);
    set_display_level(level);

    if cli.block_size == 0 {
        return Err(anyhow!("bad usage: --block-size must be greater than 0"));
    }

    let data = match &cli.input {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("cannot read input file {}", path.display()))?,
        None => {
            lz4_adaptive::displaylevel!(3, "Generating {} bytes of sample data\n", cli.sample_size);
            sample::generate(cli.sample_size, cli.seed)
        }
    };

    let config = PerfConfig {
        block_size: cli.block_size,
        iterations: cli.iterations,
        threads: cli.threads,
        method: cli.method.unwrap_or_else(selection_method_from_env),
        seed: cli.seed,
    };
    lz4_adaptive::displaylevel!(4, "{:?}\n", config);
    lz4_adaptive::displaylevel!(
        3,
        "Overlap copies: {}\n",
        lz4_adaptive::dispatch::active_backend().name()
    );

    let report = perf::run(&data, &config).context("decompression check failed")?;
    if display_level() >= 1 {
        report.display();
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        lz4_adaptive::displaylevel!(1, "lz4-decompress-perf: {:#}\n", e);
        std::process::exit(1);
    }
}
