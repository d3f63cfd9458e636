//! Pluggable randomness.
//!
//! Forecast noise, the fallback forecast band, synthetic savings estimates and
//! the simulated alert checks all draw from a [`RandomSource`]. Production code
//! uses [`ThreadRandom`]; tests inject [`SequenceRandom`] to replay exact draws.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Source of random draws used by the engine.
///
/// Only [`unit`](RandomSource::unit) and [`normal`](RandomSource::normal) are
/// required; the remaining draws are derived from `unit` so a scripted source
/// controls every decision through a single sequence.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Draw from a normal distribution. A non-positive `std_dev` yields `mean`.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Uniform draw in `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.unit()
    }

    /// Uniform integer in `[low, high]`.
    fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = high - low;
        let offset = (self.unit() * f64::from(span + 1)) as u32;
        low + offset.min(span)
    }

    /// Uniform index into a collection of `len` elements. Returns 0 for an
    /// empty collection; callers check emptiness first.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.unit() * len as f64) as usize).min(len - 1)
    }

    /// Pick `amount` distinct indices out of `0..len`, in draw order.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..len).collect();
        let amount = amount.min(len);
        for i in 0..amount {
            let j = i + self.index(len - i);
            pool.swap(i, j);
        }
        pool.truncate(amount);
        pool
    }
}

/// Thread-local RNG backed source. Not seeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn unit(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if std_dev <= 0.0 {
            return mean;
        }
        match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut rand::thread_rng()),
            Err(_) => mean,
        }
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }

    fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut rand::thread_rng(), len, amount.min(len)).into_vec()
    }
}

/// Replays a fixed, cycling sequence of unit draws.
///
/// `normal` always returns the mean, so forecasts built with this source carry
/// no noise.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// A source whose every unit draw is `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value.clamp(0.0, 1.0)
    }

    fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
        mean
    }
}
