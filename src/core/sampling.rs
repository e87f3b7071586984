//! Record sampling
//!
//! A logger consults its [`Sampler`] after the level check and before any
//! field is encoded. The samplers here are deliberately simple; anything
//! more elaborate plugs in through the trait, and plain closures
//! `Fn(LogLevel) -> bool` are samplers too.
//!
//! # Example
//!
//! ```
//! use astro_logger::{options, LogLevel, Logger, RandomSampler};
//!
//! let logger = Logger::new([options::sampler(
//!     RandomSampler::new(0.1).with_always_sample(vec![LogLevel::Warn, LogLevel::Error]),
//! )]);
//! # let _ = logger;
//! ```

use super::log_level::LogLevel;
use rand::Rng;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

pub trait Sampler: Send + Sync {
    /// Decide whether a record at `level` should be emitted.
    fn should_log(&self, level: LogLevel) -> bool;
}

impl<F> Sampler for F
where
    F: Fn(LogLevel) -> bool + Send + Sync,
{
    fn should_log(&self, level: LogLevel) -> bool {
        self(level)
    }
}

/// Counters describing how a sampler has decided so far.
#[derive(Debug)]
pub struct SamplerMetrics {
    /// Number of records that passed sampling
    sampled_count: AtomicU64,

    /// Number of records dropped by sampling
    dropped_count: AtomicU64,
}

impl SamplerMetrics {
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }

    #[inline]
    pub(crate) fn record(&self, sampled: bool) -> bool {
        if sampled {
            self.sampled_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dropped_count.fetch_add(1, Ordering::Relaxed);
        }
        sampled
    }

    /// Observed pass rate; 1.0 before any record was seen.
    pub fn effective_sample_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            1.0
        } else {
            self.sampled_count() as f64 / total as f64
        }
    }

    pub fn reset(&self) {
        self.sampled_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
    }
}

impl Default for SamplerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps each record with probability `rate`, except for levels listed in
/// `always_sample`, which always pass.
#[derive(Debug)]
pub struct RandomSampler {
    rate: f64,
    always_sample: Vec<LogLevel>,
    metrics: SamplerMetrics,
}

impl RandomSampler {
    /// `rate` is clamped into `[0.0, 1.0]`. Error, Fatal and Panic records
    /// always pass unless overridden with [`RandomSampler::with_always_sample`].
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            always_sample: vec![LogLevel::Error, LogLevel::Fatal, LogLevel::Panic],
            metrics: SamplerMetrics::new(),
        }
    }

    #[must_use]
    pub fn with_always_sample(mut self, levels: Vec<LogLevel>) -> Self {
        self.always_sample = levels;
        self
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }
}

impl Sampler for RandomSampler {
    fn should_log(&self, level: LogLevel) -> bool {
        if self.always_sample.contains(&level) || self.rate >= 1.0 {
            return self.metrics.record(true);
        }
        if self.rate <= 0.0 {
            return self.metrics.record(false);
        }
        let sampled = rand::thread_rng().gen::<f64>() < self.rate;
        self.metrics.record(sampled)
    }
}

/// Keeps one record out of every `n`, starting with the first.
#[derive(Debug)]
pub struct BasicSampler {
    n: u32,
    counter: AtomicU32,
}

impl BasicSampler {
    /// `n` of 0 or 1 keeps everything.
    pub fn new(n: u32) -> Self {
        Self {
            n,
            counter: AtomicU32::new(0),
        }
    }
}

impl Sampler for BasicSampler {
    fn should_log(&self, _level: LogLevel) -> bool {
        if self.n <= 1 {
            return true;
        }
        let seen = self.counter.fetch_add(1, Ordering::Relaxed);
        seen % self.n == 0
    }
}

/// Applies a different sampler per severity. Severities without a sampler
/// always pass.
#[derive(Clone, Default)]
pub struct LevelSampler {
    slots: [Option<Arc<dyn Sampler>>; LogLevel::COUNT],
}

impl LevelSampler {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on<S: Sampler + 'static>(mut self, level: LogLevel, sampler: S) -> Self {
        if let Some(slot) = self.slots.get_mut(level.index()) {
            *slot = Some(Arc::new(sampler));
        }
        self
    }
}

impl Sampler for LevelSampler {
    fn should_log(&self, level: LogLevel) -> bool {
        match self.slots.get(level.index()).and_then(Option::as_ref) {
            Some(sampler) => sampler.should_log(level),
            None => true,
        }
    }
}

impl std::fmt::Debug for LevelSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sampled: Vec<LogLevel> = LogLevel::ALL
            .into_iter()
            .filter(|level| self.slots[level.index()].is_some())
            .collect();
        f.debug_struct("LevelSampler")
            .field("sampled", &sampled)
            .finish()
    }
}
