use std::fs::File;
use std::io::{stdout, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use pms5003::framing::{DecoderStats, FrameDecoder};
use pms5003::report::Report;
use pms5003::sink::FileSink;
use pms5003::window::{DuplicatePolicy, Window};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum Format {
    Json,
    Text,
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Json, Self::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Json => Some(clap::builder::PossibleValue::new("json")),
            Self::Text => Some(clap::builder::PossibleValue::new("text")),
        }
    }
}

pub fn monitor(
    device: &Path,
    format: &Format,
    policy: DuplicatePolicy,
    validate_checksum: bool,
) -> Result<()> {
    let port = File::open(device).with_context(|| format!("opening {device:?}"))?;
    info!("reading from {device:?}");

    let decoder = FrameDecoder::new(port).with_checksum_validation(validate_checksum);
    let mut window = Window::new().with_duplicate_policy(policy);
    let sink = FileSink::default();

    let stats = run(decoder, &mut window, &sink, format, stdout())
        .with_context(|| format!("monitoring {device:?}"))?;
    debug!(?stats, "decoder stats");
    Err(closed_error(device, &stats))
}

fn closed_error(device: &Path, stats: &DecoderStats) -> anyhow::Error {
    if stats.frames == 0 {
        return anyhow!(
            "{device:?} closed before any frames were decoded; \
             is the line configured, e.g., `stty -F {} 9600 raw`?",
            device.display()
        );
    }
    anyhow!("{device:?} closed after {} frames", stats.frames)
}

/// Decode samples until EOF, reporting after every sample.
pub fn run<R, W>(
    mut decoder: FrameDecoder<R>,
    window: &mut Window,
    sink: &FileSink,
    format: &Format,
    mut out: W,
) -> Result<DecoderStats>
where
    R: Read,
    W: Write,
{
    while let Some(sample) = decoder.next_sample().context("reading sensor")? {
        window.push(sample);

        let report = Report::from_window(window);
        match format {
            Format::Text => {
                for line in report.to_string().lines() {
                    info!("{line}");
                }
            }
            Format::Json => {
                serde_json::to_writer(&mut out, &report).context("serializing to json")?;
                writeln!(out).context("writing report")?;
            }
        }
        sink.write(&report)
            .with_context(|| format!("writing {:?}", sink.path()))?;
    }

    Ok(decoder.stats())
}
