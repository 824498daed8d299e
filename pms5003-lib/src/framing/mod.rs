//! PMS5003 Frame Decoding.
//!
//! The sensor streams fixed-layout frames with no out-of-band framing:
//!
//! | Field                  | Size | Notes                                 |
//! |------------------------|------|---------------------------------------|
//! | magic                  | 2    | `0x42 0x4d`                           |
//! | length                 | 2    | must be 28                            |
//! | PM1.0/PM2.5/PM10 (std) | 6    | ug/m^3, standard particle             |
//! | PM1.0/PM2.5/PM10 (atm) | 6    | ug/m^3, atmospheric environment       |
//! | counts                 | 12   | per 100 mL, 0.3/0.5/1.0/2.5/5.0/10 um |
//! | reserved               | 2    |                                       |
//! | checksum               | 2    | sum of all preceding bytes            |
//!
//! All multi-byte fields are big-endian u16.
mod bytes;
mod decoder;
mod synchronizer;

pub use decoder::*;
pub use synchronizer::*;

use serde::{Deserialize, Serialize};

use crate::sample::{Bin, Sample};

/// Magic bytes that start every frame.
pub const MAGIC: [u8; 2] = [0x42, 0x4d];

/// Mass concentrations for PM1.0, PM2.5 and PM10 in ug/m^3.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MassConcentration {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

/// A fully decoded sensor frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Concentrations computed assuming standard particles (CF=1).
    pub standard: MassConcentration,
    /// Concentrations computed for the atmospheric environment.
    pub atmospheric: MassConcentration,
    /// Particle counts per 100 mL, in [Bin::ALL] order.
    pub counts: [u16; Bin::COUNT],
    pub reserved: u16,
    /// Checksum as transmitted; see [checksum] for the computed value.
    pub checksum: u16,
}

impl Frame {
    /// Value the length field must have for a frame to be accepted.
    pub const PAYLOAD_LEN: u16 = 28;
    /// Total frame length in bytes, magic and length field included.
    pub const LEN: usize = MAGIC.len() + 2 + Self::PAYLOAD_LEN as usize;

    /// Decode the [Frame::PAYLOAD_LEN] bytes that follow the length field, or `None`
    /// if there are not enough bytes.
    #[must_use]
    pub fn decode(dat: &[u8]) -> Option<Self> {
        if dat.len() < Self::PAYLOAD_LEN as usize {
            return None;
        }
        let mut words = dat
            .chunks_exact(2)
            .map(|w| u16::from_be_bytes([w[0], w[1]]));
        let mut next = || words.next().unwrap_or_default();

        let standard = MassConcentration {
            pm1_0: next(),
            pm2_5: next(),
            pm10: next(),
        };
        let atmospheric = MassConcentration {
            pm1_0: next(),
            pm2_5: next(),
            pm10: next(),
        };
        let mut counts = [0u16; Bin::COUNT];
        for count in &mut counts {
            *count = next();
        }

        Some(Frame {
            standard,
            atmospheric,
            counts,
            reserved: next(),
            checksum: next(),
        })
    }

    /// The particle counts of this frame.
    #[must_use]
    pub fn sample(&self) -> Sample {
        Sample::from_counts(self.counts.map(u64::from))
    }
}

/// Compute the frame checksum: the wrapping sum of every byte preceding the
/// checksum field, magic bytes and length included.
///
/// `dat` must be the complete frame excluding the trailing checksum.
#[must_use]
pub fn checksum(dat: &[u8]) -> u16 {
    dat.iter()
        .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
}
