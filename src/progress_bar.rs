//! Progress reporting for the enrichment loop.
//!
//! Components
//! -----------------
//! * [`IterTimer`] – Tracks per-record durations with an exponential moving average (EMA),
//!   giving a stable per-record estimate even when lookup latency fluctuates
//!   (cache hits are fast, remote fetches are not).
//! * [`fmt_dur`] – Human-readable [`Duration`] formatter (`"253µs"`, `"42ms"`, `"3.14s"`).
//! * [`ProgressReporter`] – Emits an `info` event every `every` records and, with the
//!   `progress` feature, drives an `indicatif` bar.
//!
//! The EMA update rule is `ema ← α·dt + (1–α)·ema` with `α ∈ (0,1]`; the first tick
//! initializes the average to the first duration.

use std::time::{Duration, Instant};

use tracing::info;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

pub struct IterTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    count: u64,
}

impl IterTimer {
    pub fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            count: 0,
        }
    }

    #[inline]
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.count += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.count == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };

        dt
    }

    #[inline]
    pub fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[inline]
pub fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else {
        let ms = d.as_millis();
        if ms < 1_000 {
            format!("{ms}ms")
        } else {
            let s = d.as_secs_f32();
            format!("{s:.2}s")
        }
    }
}

/// Per-record progress of a batch of `total` records.
pub struct ProgressReporter {
    total: usize,
    every: usize,
    timer: IterTimer,
    #[cfg(feature = "progress")]
    bar: ProgressBar,
}

impl ProgressReporter {
    /// `every == 0` disables the periodic log line.
    pub fn new(total: usize, every: usize) -> Self {
        #[cfg(feature = "progress")]
        let bar = {
            let pb = ProgressBar::new(total.max(1) as u64);
            let style = ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb.enable_steady_tick(Duration::from_millis(200));
            pb
        };

        ProgressReporter {
            total,
            every,
            timer: IterTimer::new(0.2),
            #[cfg(feature = "progress")]
            bar,
        }
    }

    /// Record that the record at 0-based `index` has been processed.
    ///
    /// Returns `true` when a progress line was logged for this record.
    pub fn record_done(&mut self, index: usize) -> bool {
        let last = self.timer.tick();
        let done = index + 1;

        #[cfg(feature = "progress")]
        {
            self.bar.set_message(format!(
                "last: {}, avg: {}",
                fmt_dur(last),
                fmt_dur(self.timer.avg())
            ));
            self.bar.inc(1);
        }
        #[cfg(not(feature = "progress"))]
        let _ = last;

        if self.every > 0 && done % self.every == 0 {
            info!(
                "Processing weather data: {done}/{} (avg {} per record)",
                self.total,
                fmt_dur(self.timer.avg())
            );
            true
        } else {
            false
        }
    }

    pub fn finish(&self) {
        #[cfg(feature = "progress")]
        {
            self.bar.disable_steady_tick();
            self.bar.finish_and_clear();
        }
        info!(
            "Processed {} of {} records",
            self.timer.count(),
            self.total
        );
    }
}
