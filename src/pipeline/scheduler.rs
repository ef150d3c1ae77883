//! Jittered backoff scheduling between poll cycles.
//!
//! The next delay is `target_mean + N(0, sigma) - elapsed`, keeping the
//! average interval between cycle *starts* near `target_mean` regardless of
//! how long a cycle took, while the Gaussian jitter avoids a fully periodic
//! cadence the source could rate-limit against.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Gaussian jitter source, injectable so tests can seed or stub it.
pub trait JitterSampler: Send {
    /// Draw one sample from N(0, sigma).
    fn sample(&mut self, sigma: f64) -> f64;
}

/// Jitter sampler backed by a seedable RNG.
pub struct GaussianSampler {
    rng: StdRng,
}

impl GaussianSampler {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for GaussianSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSampler for GaussianSampler {
    fn sample(&mut self, sigma: f64) -> f64 {
        if sigma <= 0.0 {
            return 0.0;
        }
        // Normal::new only fails for negative or non-finite sigma.
        match Normal::new(0.0, sigma) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => 0.0,
        }
    }
}

/// Computes inter-cycle delays from the configured mean and jitter.
pub struct BackoffScheduler {
    target_mean: f64,
    jitter_sigma: f64,
    sampler: Box<dyn JitterSampler>,
}

impl BackoffScheduler {
    pub fn new(target_mean: f64, jitter_sigma: f64) -> Self {
        Self::with_sampler(target_mean, jitter_sigma, Box::new(GaussianSampler::new()))
    }

    pub fn with_sampler(
        target_mean: f64,
        jitter_sigma: f64,
        sampler: Box<dyn JitterSampler>,
    ) -> Self {
        Self {
            target_mean,
            jitter_sigma,
            sampler,
        }
    }

    /// Compute the raw next delay in seconds.
    ///
    /// May be negative when a cycle ran longer than the target interval;
    /// callers clamp to zero before sleeping but log the clamped value only
    /// for display.
    pub fn next_delay(&mut self, elapsed: f64) -> f64 {
        self.target_mean + self.sampler.sample(self.jitter_sigma) - elapsed
    }
}

/// Per-process scheduling state: sequence counter and last cycle's elapsed
/// time. Reset only at process start.
#[derive(Debug)]
pub struct SchedulerState {
    /// 1-based cycle sequence number, used for log correlation
    pub seq: u64,
    /// Elapsed seconds of the previous completed cycle
    pub last_elapsed: f64,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self {
            seq: 1,
            last_elapsed: 0.0,
        }
    }

    /// Record a completed cycle and advance the sequence number.
    pub fn advance(&mut self, elapsed: f64) {
        self.last_elapsed = elapsed;
        self.seq += 1;
    }
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self::new()
    }
}
