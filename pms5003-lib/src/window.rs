//! Sliding window of recent samples.
use std::collections::VecDeque;

use tracing::trace;

use crate::sample::{Bin, Sample};

/// What to do with a sample identical to the most recent one.
///
/// The sensor sometimes repeats the previous reading rather than reporting a
/// new one. Repeats are kept unless [DuplicatePolicy::SuppressRepeats] is used.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    #[default]
    Accept,
    SuppressRepeats,
}

/// A bounded, oldest-first window of samples.
#[derive(Debug, Clone)]
pub struct Window {
    samples: VecDeque<Sample>,
    capacity: usize,
    policy: DuplicatePolicy,
    suppressed: u64,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Window {
    /// Maximum number of samples retained.
    pub const CAPACITY: usize = 500;

    #[must_use]
    pub fn new() -> Self {
        Window {
            samples: VecDeque::with_capacity(Self::CAPACITY + 1),
            capacity: Self::CAPACITY,
            policy: DuplicatePolicy::default(),
            suppressed: 0,
        }
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append `sample`, evicting the oldest samples once the window is over capacity.
    pub fn push(&mut self, sample: Sample) {
        if self.policy == DuplicatePolicy::SuppressRepeats && self.latest() == Some(&sample) {
            trace!(?sample, "suppressing repeated sample");
            self.suppressed += 1;
            return;
        }

        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples dropped by [DuplicatePolicy::SuppressRepeats].
    #[must_use]
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Most recently pushed sample still retained.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Sum of every retained sample.
    #[must_use]
    pub fn totals(&self) -> Sample {
        self.samples.iter().sum()
    }

    /// Volume of air represented by the window in litres.
    #[must_use]
    pub fn sample_volume_liters(&self) -> f64 {
        self.volume_ml() * 1e-3
    }

    /// Volume of air represented by the window in cubic metres.
    #[must_use]
    pub fn sample_volume_m3(&self) -> f64 {
        self.volume_ml() * 1e-6
    }

    /// Particles per cubic metre for each bin, in [Bin::ALL] order.
    ///
    /// An empty window has no volume and reports zero for every bin.
    #[must_use]
    pub fn concentration_per_m3(&self) -> [f64; Bin::COUNT] {
        if self.is_empty() {
            return [0.0; Bin::COUNT];
        }
        let m3 = self.sample_volume_m3();
        self.totals().counts().map(|count| count as f64 / m3)
    }

    fn volume_ml(&self) -> f64 {
        (self.samples.len() as u64 * Sample::VOLUME_ML) as f64
    }
}
