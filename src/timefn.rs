// timefn: monotonic timing for decompression measurements.
//
// `std::time::Instant` is monotonic and safe to read from any thread, which
// is all the selector needs: it only ever compares durations measured by the
// thread that ran the decode.

use std::time::Instant;

/// Nanosecond duration.
pub type DurationNs = u64;

/// Opaque timestamp.  Only differences between two timestamps are meaningful.
#[derive(Clone, Copy, Debug)]
pub struct TimeT {
    pub(crate) t: Instant,
}

impl TimeT {
    /// Timestamp of the current instant.
    pub fn new() -> Self {
        TimeT { t: Instant::now() }
    }
}

impl Default for TimeT {
    fn default() -> Self {
        TimeT::new()
    }
}

/// Returns the current monotonic timestamp.
#[inline]
pub fn get_time() -> TimeT {
    TimeT { t: Instant::now() }
}

/// Nanoseconds between `clock_start` and `clock_end` (zero if `clock_end`
/// is earlier).
pub fn span_ns(clock_start: TimeT, clock_end: TimeT) -> DurationNs {
    clock_end.t.saturating_duration_since(clock_start.t).as_nanos() as DurationNs
}

/// Nanoseconds elapsed since `clock_start`.
pub fn clock_span_ns(clock_start: TimeT) -> DurationNs {
    clock_start.t.elapsed().as_nanos() as DurationNs
}

/// Start/stop timer around a single decode.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: TimeT,
    stop: Option<TimeT>,
}

impl Stopwatch {
    /// Start timing now.
    #[inline]
    pub fn start() -> Self {
        Stopwatch { start: get_time(), stop: None }
    }

    /// Freeze the elapsed time.  Later calls keep the first stop.
    #[inline]
    pub fn stop(&mut self) {
        if self.stop.is_none() {
            self.stop = Some(get_time());
        }
    }

    /// Elapsed nanoseconds, up to `stop()` if it was called, else up to now.
    pub fn elapsed_ns(&self) -> DurationNs {
        match self.stop {
            Some(end) => span_ns(self.start, end),
            None => clock_span_ns(self.start),
        }
    }

    /// Elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ns() as f64 / 1e9
    }
}
