//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for records that only carry a
//! formatted message, similar to `println!` and `format!`. The message is
//! only formatted when the record is enabled. Each macro returns the
//! [`Result`](crate::Result) of the write.
//!
//! # Examples
//!
//! ```
//! use astro_logger::prelude::*;
//! use astro_logger::info;
//!
//! let logger = Logger::new([options::io_writer(std::io::sink())]);
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok::<(), LoggerError>(())
//! ```
//!
//! Fields still go through the event API: `logger.info().int("port", 8080).msg("listening")`.

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use astro_logger::prelude::*;
/// # let logger = Logger::new([options::io_writer(std::io::sink())]);
/// use astro_logger::log;
/// log!(logger, LogLevel::Info, "Simple message")?;
/// log!(logger, LogLevel::Error, "Error code: {}", 500)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let mut event = $logger.with_level($level);
        if event.enabled() {
            event.msg(&format!($($arg)+))
        } else {
            ::std::result::Result::Ok(())
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use astro_logger::prelude::*;
/// # let logger = Logger::new([options::io_writer(std::io::sink())]);
/// use astro_logger::debug;
/// debug!(logger, "Counter value: {}", 10)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use astro_logger::prelude::*;
/// # let logger = Logger::new([options::io_writer(std::io::sink())]);
/// use astro_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error")?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use astro_logger::prelude::*;
/// # let logger = Logger::default();
/// use astro_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full")?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{options, LevelWriter, LogLevel, Logger, Result};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LevelWriter for Lines {
        fn write(&self, payload: &[u8]) -> Result<usize> {
            self.0.lock().push(String::from_utf8_lossy(payload).into_owned());
            Ok(payload.len())
        }

        fn name(&self) -> &str {
            "lines"
        }
    }

    fn capture(min: LogLevel) -> (Logger, Arc<Lines>) {
        let lines = Arc::new(Lines::default());
        let logger = Logger::new([options::writer(Arc::clone(&lines)), options::level(min)]);
        (logger, lines)
    }

    #[test]
    fn test_log_macro() {
        let (logger, lines) = capture(LogLevel::NoLevel);
        log!(logger, LogLevel::Info, "Formatted: {}", 42).unwrap();
        assert_eq!(
            lines.0.lock()[0],
            "{\"level\":\"info\",\"message\":\"Formatted: 42\"}\n"
        );
    }

    #[test]
    fn test_level_macros() {
        let (logger, lines) = capture(LogLevel::Debug);
        debug!(logger, "Count: {}", 5).unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warn!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();

        let lines = lines.0.lock();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("{\"level\":\"debug\""));
        assert!(lines[2].contains("Retry 1 of 3"));
        assert!(lines[3].starts_with("{\"level\":\"error\""));
    }

    #[test]
    fn test_disabled_record_is_not_formatted() {
        struct Counted<'a>(&'a AtomicUsize);

        impl std::fmt::Display for Counted<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                write!(f, "counted")
            }
        }

        let formatted = AtomicUsize::new(0);
        let (logger, lines) = capture(LogLevel::Warn);
        info!(logger, "{}", Counted(&formatted)).unwrap();
        warn!(logger, "{}", Counted(&formatted)).unwrap();

        assert_eq!(formatted.load(Ordering::SeqCst), 1);
        assert_eq!(lines.0.lock().len(), 1);
    }
}
