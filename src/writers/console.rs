//! Console writer implementation

use crate::core::{LevelWriter, LogLevel, Result};
use std::io::{self, Write};

/// Which standard stream a [`ConsoleWriter`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
    /// Error and worse go to stderr, everything else to stdout.
    Split,
}

/// Writes encoded records to the process's standard streams.
///
/// Each record is written with a single `write_all` under the stream lock,
/// so concurrent records never interleave.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleWriter {
    target: ConsoleTarget,
}

impl ConsoleWriter {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    /// Route Error, Fatal and Panic records to stderr and the rest to stdout
    ///
    /// # Example
    ///
    /// ```
    /// use astro_logger::{options, ConsoleWriter, Logger};
    ///
    /// let logger = Logger::new([options::writer(ConsoleWriter::split())]);
    /// assert_eq!(logger.writer().name(), "console");
    /// ```
    pub fn split() -> Self {
        Self::new(ConsoleTarget::Split)
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    fn write_stdout(payload: &[u8]) -> Result<usize> {
        io::stdout().lock().write_all(payload)?;
        Ok(payload.len())
    }

    fn write_stderr(payload: &[u8]) -> Result<usize> {
        io::stderr().lock().write_all(payload)?;
        Ok(payload.len())
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl LevelWriter for ConsoleWriter {
    fn write(&self, payload: &[u8]) -> Result<usize> {
        match self.target {
            ConsoleTarget::Stderr => Self::write_stderr(payload),
            ConsoleTarget::Stdout | ConsoleTarget::Split => Self::write_stdout(payload),
        }
    }

    fn write_level(&self, level: LogLevel, payload: &[u8]) -> Result<usize> {
        match self.target {
            ConsoleTarget::Split if level >= LogLevel::Error => Self::write_stderr(payload),
            _ => self.write(payload),
        }
    }

    fn flush(&self) -> Result<()> {
        // Split writes to both streams
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
            ConsoleTarget::Split => "console",
        }
    }
}
