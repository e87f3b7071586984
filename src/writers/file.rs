//! File writer implementation

use crate::core::{LevelWriter, LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends encoded records to a file.
///
/// Records go straight to the file without user-space buffering, so a record
/// is on its way to disk as soon as the logging call returns, including the
/// record written right before a Fatal exit.
pub struct FileWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LevelWriter for FileWriter {
    fn write(&self, payload: &[u8]) -> Result<usize> {
        self.file.lock().write_all(payload).map_err(|e| {
            LoggerError::io_operation("writing log record", self.path.display().to_string(), e)
        })?;
        Ok(payload.len())
    }

    fn flush(&self) -> Result<()> {
        self.file.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_appends_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let writer = FileWriter::new(&path).unwrap();
        writer.write_level(LogLevel::Info, b"{\"n\":1}\n").unwrap();
        writer.write(b"{\"n\":2}\n").unwrap();
        drop(writer);

        // Reopening appends rather than truncating
        let writer = FileWriter::new(&path).unwrap();
        writer.write(b"{\"n\":3}\n").unwrap();
        assert_eq!(writer.path(), path.as_path());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n");
    }

    #[test]
    fn test_open_failure_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");

        let err = FileWriter::new(&path).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("app.log"));
    }
}
