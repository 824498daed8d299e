use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Particle-size bins reported by the sensor, in wire order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bin {
    Um0p3,
    Um0p5,
    Um1p0,
    Um2p5,
    Um5p0,
    Um10p0,
}

impl Bin {
    /// Number of bins.
    pub const COUNT: usize = 6;
    /// All bins, smallest first.
    pub const ALL: [Bin; Self::COUNT] = [
        Bin::Um0p3,
        Bin::Um0p5,
        Bin::Um1p0,
        Bin::Um2p5,
        Bin::Um5p0,
        Bin::Um10p0,
    ];

    /// Lower size threshold of the bin in nanometres.
    #[must_use]
    pub fn nanometers(self) -> u32 {
        match self {
            Bin::Um0p3 => 300,
            Bin::Um0p5 => 500,
            Bin::Um1p0 => 1000,
            Bin::Um2p5 => 2500,
            Bin::Um5p0 => 5000,
            Bin::Um10p0 => 10000,
        }
    }

    #[must_use]
    pub fn micrometers(self) -> f64 {
        f64::from(self.nanometers()) * 1e-3
    }

    /// Position of this bin in [Bin::ALL] and in [Sample::counts].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for Bin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}um", self.micrometers())
    }
}

/// Particle counts from one sensor reading.
///
/// Each count is the number of particles at or above the bin size found in
/// [Sample::VOLUME_ML] of air.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sample {
    pub count_0p3: u64,
    pub count_0p5: u64,
    pub count_1p0: u64,
    pub count_2p5: u64,
    pub count_5p0: u64,
    pub count_10p0: u64,
}

impl Sample {
    /// Volume of air, in millilitres, counted for a single sample.
    pub const VOLUME_ML: u64 = 100;

    /// Create a sample from counts in [Bin::ALL] order.
    #[must_use]
    pub fn from_counts(counts: [u64; Bin::COUNT]) -> Self {
        let [count_0p3, count_0p5, count_1p0, count_2p5, count_5p0, count_10p0] = counts;
        Sample {
            count_0p3,
            count_0p5,
            count_1p0,
            count_2p5,
            count_5p0,
            count_10p0,
        }
    }

    /// Counts in [Bin::ALL] order.
    #[must_use]
    pub fn counts(&self) -> [u64; Bin::COUNT] {
        [
            self.count_0p3,
            self.count_0p5,
            self.count_1p0,
            self.count_2p5,
            self.count_5p0,
            self.count_10p0,
        ]
    }

    #[must_use]
    pub fn count(&self, bin: Bin) -> u64 {
        self.counts()[bin.index()]
    }
}

/// Field-wise addition, saturating at `u64::MAX`.
///
/// Decoded counts are at most `u16::MAX`, so a full window cannot get close.
impl AddAssign<&Sample> for Sample {
    fn add_assign(&mut self, rhs: &Sample) {
        self.count_0p3 = self.count_0p3.saturating_add(rhs.count_0p3);
        self.count_0p5 = self.count_0p5.saturating_add(rhs.count_0p5);
        self.count_1p0 = self.count_1p0.saturating_add(rhs.count_1p0);
        self.count_2p5 = self.count_2p5.saturating_add(rhs.count_2p5);
        self.count_5p0 = self.count_5p0.saturating_add(rhs.count_5p0);
        self.count_10p0 = self.count_10p0.saturating_add(rhs.count_10p0);
    }
}

impl Add<&Sample> for Sample {
    type Output = Sample;

    fn add(mut self, rhs: &Sample) -> Self::Output {
        self += rhs;
        self
    }
}

impl<'a> Sum<&'a Sample> for Sample {
    fn sum<I: Iterator<Item = &'a Sample>>(iter: I) -> Self {
        iter.fold(Sample::default(), |acc, s| acc + s)
    }
}
