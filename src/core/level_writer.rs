//! Level-aware sink contract
//!
//! Every sink a logger writes to is a [`LevelWriter`]. Sinks that care about
//! severity (for example, routing errors to stderr) override
//! [`LevelWriter::write_level`]; everything else only implements `write`.
//! Plain [`std::io::Write`] sinks are lifted with [`LevelWriterAdapter`].

use super::{error::Result, log_level::LogLevel};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

pub trait LevelWriter: Send + Sync {
    /// Write one encoded record.
    fn write(&self, payload: &[u8]) -> Result<usize>;

    /// Write one encoded record tagged with its severity.
    fn write_level(&self, level: LogLevel, payload: &[u8]) -> Result<usize> {
        let _ = level;
        self.write(payload)
    }

    /// Push any data held by the sink to its destination.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<W: LevelWriter + ?Sized> LevelWriter for Arc<W> {
    fn write(&self, payload: &[u8]) -> Result<usize> {
        (**self).write(payload)
    }

    fn write_level(&self, level: LogLevel, payload: &[u8]) -> Result<usize> {
        (**self).write_level(level, payload)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapts a plain byte sink into a [`LevelWriter`] that ignores severity.
pub struct LevelWriterAdapter<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> LevelWriterAdapter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Recover the wrapped sink.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> LevelWriter for LevelWriterAdapter<W> {
    fn write(&self, payload: &[u8]) -> Result<usize> {
        self.inner.lock().write_all(payload)?;
        Ok(payload.len())
    }

    fn flush(&self) -> Result<()> {
        self.inner.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "io"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_adapter_ignores_level() {
        let adapter = LevelWriterAdapter::new(Vec::new());
        assert_eq!(adapter.write_level(LogLevel::Error, b"one\n").unwrap(), 4);
        assert_eq!(adapter.write(b"two\n").unwrap(), 4);
        assert_eq!(adapter.into_inner(), b"one\ntwo\n");
    }

    #[test]
    fn test_adapter_propagates_errors() {
        let adapter = LevelWriterAdapter::new(BrokenPipe);
        let err = adapter.write_level(LogLevel::Info, b"payload").unwrap_err();
        assert!(err.to_string().contains("reader went away"));
    }

    #[test]
    fn test_arc_forwards() {
        let shared: Arc<dyn LevelWriter> = Arc::new(LevelWriterAdapter::new(Vec::new()));
        let clone = Arc::clone(&shared);
        assert_eq!(clone.write_level(LogLevel::Warn, b"abc").unwrap(), 3);
        assert_eq!(clone.name(), "io");
    }
}
