use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::report::Report;
use crate::{Error, Result};

/// Where the latest concentrations are written.
pub const DEFAULT_OUTPUT_PATH: &str = "/tmp/particle_count";

/// Writes the latest [Report] to a file, replacing the previous contents.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATH)
    }
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSink {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the output file and write `report` as a single CSV line.
    ///
    /// # Errors
    /// [Error::Output] if the file cannot be created or written.
    pub fn write(&self, report: &Report) -> Result<()> {
        let line = report.csv_line();
        let output = |source| Error::Output {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(output)?;
        file.write_all(line.as_bytes()).map_err(output)?;
        trace!(path = ?self.path, line = line.trim_end(), "wrote concentrations");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::window::Window;

    #[test]
    fn write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("particle_count");
        let sink = FileSink::new(&path);

        let mut window = Window::new();
        window.push(Sample::from_counts([10, 8, 5, 2, 1, 0]));
        sink.write(&Report::from_window(&window)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "100000,80000,50000,20000,10000,0\n"
        );

        window.push(Sample::from_counts([0, 0, 0, 0, 0, 0]));
        sink.write(&Report::from_window(&window)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "50000,40000,25000,10000,5000,0\n"
        );
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("nope").join("particle_count"));
        let err = sink.write(&Report::from_window(&Window::new())).unwrap_err();
        assert!(matches!(err, Error::Output { .. }), "got {err:?}");
    }

    #[test]
    fn default_path() {
        assert_eq!(FileSink::default().path(), Path::new(DEFAULT_OUTPUT_PATH));
    }
}
