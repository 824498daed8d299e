//! Plantower PMS5003 particle counter decoding.
//!
//! The sensor reports particle counts for six size bins about once a second
//! over a 9600 baud serial link. This crate decodes the frames from any
//! [std::io::Read], keeps a sliding window of recent samples and converts the
//! integrated counts into particles per cubic metre.
//!
//! ```no_run
//! use pms5003::{framing::FrameDecoder, report::Report, sink::FileSink, window::Window};
//!
//! let port = std::fs::File::open("/dev/ttyUSB0")?;
//! let sink = FileSink::default();
//! let mut window = Window::new();
//! for sample in FrameDecoder::new(port) {
//!     window.push(sample?);
//!     sink.write(&Report::from_window(&window))?;
//! }
//! # Ok::<(), pms5003::Error>(())
//! ```
mod error;

pub mod framing;
pub mod report;
pub mod sample;
pub mod sink;
pub mod window;

pub use error::{Error, Result};
pub use sample::{Bin, Sample};
