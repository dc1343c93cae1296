// config.rs: Compile-time configuration constants and environment overrides.
//
// The selector's behaviour can be pinned from the environment without
// recompiling, which is how the perf tool and benchmarks compare variants
// head to head:
//
//   LZ4_DECOMPRESS_METHOD=auto         adaptive selection (default)
//   LZ4_DECOMPRESS_METHOD=round-robin  cycle through all variants
//   LZ4_DECOMPRESS_METHOD=1            always run variant 1 (16-byte copies)
//
// The numeric spellings -1 and -2 are accepted for auto and round-robin.

use crate::block::types::{KB, MB};
use crate::block::variant::VARIANT_COUNT;
use crate::stats::SelectionMethod;

// Declared output size at which a call is timed and fed to the selector.
// Below it the 8-byte variant runs untimed: for small blocks the timer
// costs more than the variants differ.
pub const MEASUREMENT_THRESHOLD: usize = 32 * KB;

// Invocations per variant discarded before statistics are collected.
// Cold runs pay cache and TLB misses that say nothing about the variant.
pub const NUM_INVOCATIONS_TO_THROW_OFF: f64 = 2.0;

// Seed for the selector's sampling RNG.  Fixed so that a process behaves
// the same way from run to run.
pub const STATS_RNG_SEED: u64 = 0x5EED_1A4B_10C4_D0C5;

// Name of the environment variable read by `selection_method_from_env`.
pub const ENV_DECOMPRESS_METHOD: &str = "LZ4_DECOMPRESS_METHOD";

// Perf-tool defaults.
pub const PERF_BLOCK_SIZE_DEFAULT: usize = MB;
pub const PERF_ITERATIONS_DEFAULT: usize = 16;
pub const PERF_SAMPLE_SIZE_DEFAULT: usize = 64 * MB;

/// Read the selection method from `LZ4_DECOMPRESS_METHOD`.
pub fn selection_method_from_env() -> SelectionMethod {
    selection_method_from(std::env::var(ENV_DECOMPRESS_METHOD).ok().as_deref())
}

/// Testable core of [`selection_method_from_env`]: parse an optional value.
///
/// `None` (variable unset) selects [`SelectionMethod::Adaptive`].  Values
/// that do not parse, or name a variant that does not exist, are reported at
/// display level 2 and also fall back to adaptive selection.
pub fn selection_method_from(env_val: Option<&str>) -> SelectionMethod {
    let Some(raw) = env_val else {
        return SelectionMethod::Adaptive;
    };
    match parse_selection_method(raw) {
        Some(method) => method,
        None => {
            crate::displaylevel!(
                2,
                "Ignore environment variable setting {}={}: expected auto, round-robin or 0..{}\n",
                ENV_DECOMPRESS_METHOD,
                raw,
                VARIANT_COUNT - 1
            );
            SelectionMethod::Adaptive
        }
    }
}

/// Parse `auto`/`-1`, `round-robin`/`-2`, or a variant index.
pub fn parse_selection_method(raw: &str) -> Option<SelectionMethod> {
    match raw.trim() {
        "auto" | "-1" => Some(SelectionMethod::Adaptive),
        "round-robin" | "-2" => Some(SelectionMethod::RoundRobin),
        other => match other.parse::<usize>() {
            Ok(index) if index < VARIANT_COUNT => Some(SelectionMethod::Fixed(index)),
            _ => None,
        },
    }
}
