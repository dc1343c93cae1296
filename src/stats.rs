//! Throughput statistics and variant selection.
//!
//! [`PerformanceStatistics`] keeps, for each decoder variant, a running mean
//! of seconds spent per decompressed byte.  Selection is a bandit: every call
//! draws one sample per variant from a normal distribution centred on that
//! variant's mean and picks the smallest draw.  The spread shrinks as a
//! variant accumulates measurements, so the fastest variant wins more and
//! more often, while slower ones keep a small chance of being re-measured
//! and can take over if the workload changes.
//!
//! The spread is deliberately `mean / sqrt(n)` rather than a proper standard
//! error: it separates two variants eventually even when their true speeds
//! are statistically indistinguishable.
//!
//! One instance is shared by every thread decoding the same kind of data;
//! the state sits behind a `Mutex` that is held only for the few arithmetic
//! operations of `select` and `update`, never across a decode.

use std::f64::consts::PI;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::block::variant::{VARIANT_COUNT, VARIANT_WIDTHS};
use crate::config::{selection_method_from_env, NUM_INVOCATIONS_TO_THROW_OFF, STATS_RNG_SEED};

// ─────────────────────────────────────────────────────────────────────────────
// Selection method
// ─────────────────────────────────────────────────────────────────────────────

/// How [`PerformanceStatistics::select`] picks a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMethod {
    /// Sample-and-compare bandit over measured throughput.
    #[default]
    Adaptive,
    /// Always the least-measured variant; cycles through all of them.
    /// For performance testing.
    RoundRobin,
    /// Always the given variant index.  For performance testing.
    Fixed(usize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-variant statistics
// ─────────────────────────────────────────────────────────────────────────────

/// Running statistics for one variant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Element {
    /// Invocations recorded, including the discarded cold ones.
    pub count: f64,
    /// Sum of `seconds / bytes` over the counted invocations.
    pub sum: f64,
}

impl Element {
    /// Invocations that contribute to `sum`.  Negative while still cold.
    #[inline]
    pub fn adjusted_count(&self) -> f64 {
        self.count - NUM_INVOCATIONS_TO_THROW_OFF
    }

    /// Mean seconds per byte.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.sum / self.adjusted_count()
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.mean() / self.adjusted_count().sqrt()
    }

    /// Record one decode of `bytes` bytes that took `seconds`.
    pub fn update(&mut self, seconds: f64, bytes: f64) {
        self.count += 1.0;
        if self.count > NUM_INVOCATIONS_TO_THROW_OFF {
            self.sum += seconds / bytes;
        }
    }

    /// Draw a score for this variant; the lowest score wins.
    ///
    /// A variant with fewer than two counted invocations scores
    /// `adjusted_count - 1`, which is never positive, so it is chosen before
    /// any measured variant, the least-measured first.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let n = self.adjusted_count();
        if n < 2.0 {
            n - 1.0
        } else {
            normal_sample(rng, self.mean(), self.sigma())
        }
    }
}

/// One draw from `N(mean, sigma²)` (Box–Muller).
fn normal_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    // gen::<f64>() is in [0, 1); flip it so ln() never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + sigma * z
}

/// Read-only view of one variant's statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSnapshot {
    pub index: usize,
    pub copy_width: usize,
    /// Invocations recorded, including discarded cold ones.
    pub invocations: u64,
    /// Mean seconds per byte, once at least one invocation was counted.
    pub mean_seconds_per_byte: Option<f64>,
}

impl VariantSnapshot {
    /// Mean throughput in bytes per second.
    pub fn throughput(&self) -> Option<f64> {
        self.mean_seconds_per_byte.filter(|m| *m > 0.0).map(|m| 1.0 / m)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared statistics
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct State {
    data: [Element; VARIANT_COUNT],
    rng: StdRng,
}

/// Throughput statistics for the decoder variants, shared by all callers
/// that pass the same instance to [`crate::decompress`].
#[derive(Debug)]
pub struct PerformanceStatistics {
    method: SelectionMethod,
    state: Mutex<State>,
}

impl Default for PerformanceStatistics {
    fn default() -> Self {
        PerformanceStatistics::new()
    }
}

impl PerformanceStatistics {
    /// Adaptive selection with the default RNG seed.
    pub fn new() -> Self {
        PerformanceStatistics::with_method(SelectionMethod::Adaptive)
    }

    pub fn with_method(method: SelectionMethod) -> Self {
        PerformanceStatistics {
            method,
            state: Mutex::new(State {
                data: [Element::default(); VARIANT_COUNT],
                rng: StdRng::seed_from_u64(STATS_RNG_SEED),
            }),
        }
    }

    /// Selection method taken from `LZ4_DECOMPRESS_METHOD`
    /// (see [`crate::config`]).
    pub fn from_env() -> Self {
        PerformanceStatistics::with_method(selection_method_from_env())
    }

    /// Replace the sampling RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.state_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn method(&self) -> SelectionMethod {
        self.method
    }

    /// Statistics are plain counters, so a panic elsewhere while the lock
    /// was held leaves nothing inconsistent behind; keep using them.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Choose the variant index for the next decode.
    pub fn select(&self) -> usize {
        match self.method {
            SelectionMethod::Fixed(index) => index.min(VARIANT_COUNT - 1),
            SelectionMethod::RoundRobin => {
                let state = self.lock();
                argmin(state.data.iter().map(Element::adjusted_count))
            }
            SelectionMethod::Adaptive => {
                let mut guard = self.lock();
                let State { data, rng } = &mut *guard;
                argmin(data.iter().map(|e| e.sample(rng)))
            }
        }
    }

    /// Record that `variant` decoded `bytes` bytes in `seconds`.
    /// Unknown variant indices are ignored.
    pub fn update(&self, variant: usize, seconds: f64, bytes: f64) {
        if let Some(element) = self.lock().data.get_mut(variant) {
            element.update(seconds, bytes);
        }
    }

    /// Current statistics of every variant, by index.
    pub fn snapshot(&self) -> [VariantSnapshot; VARIANT_COUNT] {
        let data = self.lock().data;
        core::array::from_fn(|index| {
            let element = data[index];
            VariantSnapshot {
                index,
                copy_width: VARIANT_WIDTHS[index],
                invocations: element.count as u64,
                mean_seconds_per_byte: (element.adjusted_count() >= 1.0).then(|| element.mean()),
            }
        })
    }

    /// Print per-variant statistics at display level 4.
    pub fn report(&self) {
        for snap in self.snapshot() {
            match snap.throughput() {
                Some(bps) => crate::displaylevel!(
                    4,
                    "variant {} ({:>2}-byte copies): {:>8} calls, {:>9.1} MB/s\n",
                    snap.index,
                    snap.copy_width,
                    snap.invocations,
                    bps / 1e6
                ),
                None => crate::displaylevel!(
                    4,
                    "variant {} ({:>2}-byte copies): {:>8} calls, not measured\n",
                    snap.index,
                    snap.copy_width,
                    snap.invocations
                ),
            }
        }
    }
}

/// Index of the smallest value; the first one wins ties.
fn argmin(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::INFINITY;
    for (i, v) in values.enumerate() {
        if v < best_value {
            best = i;
            best_value = v;
        }
    }
    best
}
