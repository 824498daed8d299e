mod monitor;

use std::ffi::OsString;
use std::io::stderr;
use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use pms5003::window::DuplicatePolicy;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Log PMS5003 particle concentrations from a serial port.
///
/// Concentrations integrated over the most recent 500 readings are logged after
/// every reading and written to /tmp/particle_count.
#[derive(Parser)]
#[command(name = "pms5003", version, about)]
struct Cli {
    /// Serial device the sensor is attached to, e.g., /dev/ttyUSB0.
    ///
    /// The line must already be configured for 9600 baud 8N1, e.g., with
    /// `stty -F /dev/ttyUSB0 9600 raw`.
    device: PathBuf,

    /// Console report format
    #[arg(short, long, default_value = "text")]
    format: monitor::Format,

    /// Drop readings identical to the previous one.
    ///
    /// The sensor sometimes repeats a stale reading instead of reporting a new one.
    #[arg(long, action)]
    suppress_repeats: bool,

    /// Drop frames with an incorrect checksum.
    #[arg(long, action)]
    validate_checksum: bool,
}

/// Parse `args`, printing usage and returning `None` when they are wrong.
///
/// Help and version requests exit the process as usual.
fn parse_args<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            // Wrong arguments are not an error; just say how to use it.
            println!("{}", Cli::command().render_usage());
            None
        }
    }
}

fn main() -> Result<()> {
    let Some(cli) = parse_args(std::env::args_os()) else {
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("PMS5003_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let policy = if cli.suppress_repeats {
        DuplicatePolicy::SuppressRepeats
    } else {
        DuplicatePolicy::Accept
    };

    monitor::monitor(&cli.device, &cli.format, policy, cli.validate_checksum)
}
