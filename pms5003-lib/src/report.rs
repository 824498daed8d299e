use std::fmt::{Display, Write};

use serde::Serialize;

use crate::sample::Bin;
use crate::window::Window;

/// Integrated count and concentration for a single bin.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BinReport {
    pub bin: Bin,
    pub size_um: f64,
    /// Particles counted across the whole window.
    pub count: u64,
    pub per_m3: f64,
}

/// Aggregate view of a [Window] at one point in time.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub samples: usize,
    pub volume_liters: f64,
    pub volume_m3: f64,
    pub bins: Vec<BinReport>,
}

impl Report {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        let totals = window.totals().counts();
        let conc = window.concentration_per_m3();
        let bins = Bin::ALL
            .iter()
            .map(|bin| BinReport {
                bin: *bin,
                size_um: bin.micrometers(),
                count: totals[bin.index()],
                per_m3: conc[bin.index()],
            })
            .collect();

        Report {
            samples: window.len(),
            volume_liters: window.sample_volume_liters(),
            volume_m3: window.sample_volume_m3(),
            bins,
        }
    }

    /// Concentrations rounded to whole particles per m^3, comma separated and
    /// newline terminated, e.g., `1250,890,210,45,8,2\n`.
    #[must_use]
    pub fn csv_line(&self) -> String {
        let mut line = String::new();
        for (i, bin) in self.bins.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            // writing to a String cannot fail
            let _ = write!(line, "{:.0}", bin.per_m3);
        }
        line.push('\n');
        line
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Integrated totals (from {:.1} L / {:.2} m^3)",
            self.volume_liters, self.volume_m3
        )?;
        for bin in &self.bins {
            writeln!(
                f,
                "    {:4.1} um: {:8} ({:10.0} / m^3)",
                bin.size_um, bin.count, bin.per_m3
            )?;
        }
        Ok(())
    }
}
