//! Main logger implementation

use super::{
    encoder,
    error::Result,
    event::{Event, LEVEL_FIELD},
    hook::Hook,
    level_writer::LevelWriter,
    log_level::LogLevel,
    options::{self, LoggerOption},
    sampling::Sampler,
};
use crate::writers::ConsoleWriter;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Immutable logger configuration.
///
/// Built by folding [`LoggerOption`]s over the zero-value logger, which
/// writes to stdout, lets every severity through, has no sampler, no hooks
/// and an empty context. Once built, a logger is read-only: share it across
/// threads freely, or derive a child with [`Logger::child`].
///
/// # Example
///
/// ```
/// use astro_logger::{options, LogLevel, Logger};
///
/// let logger = Logger::new([
///     options::io_writer(Vec::new()),
///     options::level(LogLevel::Info),
///     options::with(|e| {
///         e.str("service", "api");
///     }),
/// ]);
///
/// logger.info().str("path", "/health").msg("request served")?;
/// logger.debug().msg("filtered out")?;
/// # Ok::<(), astro_logger::LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    pub(crate) writer: Arc<dyn LevelWriter>,
    pub(crate) level: LogLevel,
    pub(crate) sampler: Option<Arc<dyn Sampler>>,
    pub(crate) hooks: Vec<Arc<dyn Hook>>,
    pub(crate) stack: bool,
    pub(crate) caller: bool,
    pub(crate) context: Arc<Vec<u8>>,
}

impl Logger {
    /// Build a logger by applying `options` in order to the zero value.
    #[must_use]
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let mut logger = Self::zero();
        logger.apply(options);
        logger
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use astro_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Warn)
    ///     .stack(true)
    ///     .build();
    /// assert_eq!(logger.level(), LogLevel::Warn);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Derive a logger that starts from this one's configuration and then
    /// applies `options`. This logger is left untouched.
    #[must_use]
    pub fn child<I>(&self, options: I) -> Self
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let mut child = self.clone();
        child.apply(options);
        child
    }

    fn zero() -> Self {
        Self {
            writer: Arc::new(ConsoleWriter::stdout()),
            level: LogLevel::NoLevel,
            sampler: None,
            hooks: Vec::new(),
            stack: false,
            caller: false,
            context: Arc::new(Vec::new()),
        }
    }

    fn apply<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        for option in options {
            option.apply(self);
        }
    }

    pub fn writer(&self) -> &Arc<dyn LevelWriter> {
        &self.writer
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn sampler(&self) -> Option<&Arc<dyn Sampler>> {
        self.sampler.as_ref()
    }

    pub fn hooks(&self) -> &[Arc<dyn Hook>] {
        &self.hooks
    }

    pub fn stack_enabled(&self) -> bool {
        self.stack
    }

    pub fn caller_enabled(&self) -> bool {
        self.caller
    }

    /// Pre-encoded fields embedded in every record.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    /// Whether a record at `level` passes the level filter and the sampler.
    ///
    /// The sampler is only consulted for records above the threshold.
    pub fn should_log(&self, level: LogLevel) -> bool {
        if level < self.level {
            return false;
        }
        match self.sampler {
            Some(ref sampler) => sampler.should_log(level),
            None => true,
        }
    }

    /// Start a record at `level`.
    ///
    /// A record that fails [`Logger::should_log`] comes back disabled: its
    /// field setters do nothing and finishing it writes nothing.
    pub fn with_level(&self, level: LogLevel) -> Event<'_> {
        if !self.should_log(level) {
            return Event::disabled(&*self.writer, level);
        }

        let mut event = Event::new(&*self.writer, level).with_hooks(&self.hooks);
        event.stack = self.stack;
        event.caller = self.caller;
        if level != LogLevel::NoLevel {
            encoder::append_key(&mut event.buf, LEVEL_FIELD);
            encoder::append_string(&mut event.buf, level.to_str());
        }
        encoder::append_object_data(&mut event.buf, &self.context);
        event
    }

    /// Start a record without a level field.
    #[inline]
    pub fn log(&self) -> Event<'_> {
        self.with_level(LogLevel::NoLevel)
    }

    #[inline]
    pub fn debug(&self) -> Event<'_> {
        self.with_level(LogLevel::Debug)
    }

    #[inline]
    pub fn info(&self) -> Event<'_> {
        self.with_level(LogLevel::Info)
    }

    #[inline]
    pub fn warn(&self) -> Event<'_> {
        self.with_level(LogLevel::Warn)
    }

    #[inline]
    pub fn error(&self) -> Event<'_> {
        self.with_level(LogLevel::Error)
    }

    /// Start a fatal record. Finishing it exits the process with status 1.
    #[inline]
    pub fn fatal(&self) -> Event<'_> {
        self.with_level(LogLevel::Fatal)
    }

    /// Start a panic record. Finishing it panics with the message.
    #[inline]
    pub fn panic(&self) -> Event<'_> {
        self.with_level(LogLevel::Panic)
    }

    /// Start an error record carrying `err`.
    pub fn err<E: std::error::Error + ?Sized>(&self, err: &E) -> Event<'_> {
        let mut event = self.error();
        event.err(err);
        event
    }

    /// Flush the underlying sink.
    pub fn flush(&self) -> Result<()> {
        self.writer.flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("writer", &self.writer.name())
            .field("level", &self.level)
            .field("sampler", &self.sampler.is_some())
            .field("hooks", &self.hooks.len())
            .field("stack", &self.stack)
            .field("caller", &self.caller)
            .field("context", &String::from_utf8_lossy(&self.context))
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Collects options in call order and folds them in [`LoggerBuilder::build`],
/// so it behaves exactly like [`Logger::new`] with the same options.
///
/// # Example
/// ```
/// use astro_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .writer(ConsoleWriter::split())
///     .with(|e| {
///         e.str("component", "scheduler");
///     })
///     .add_hook(HookFunc::new(|e, _level, _msg| {
///         e.bool("hooked", true);
///     }))
///     .build();
/// assert_eq!(logger.hooks().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerBuilder {
    options: Vec<LoggerOption>,
}

impl LoggerBuilder {
    /// Create a new builder with no options
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary option
    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer<W: LevelWriter + 'static>(self, writer: W) -> Self {
        self.option(options::writer(writer))
    }

    #[must_use = "builder methods return a new value"]
    pub fn io_writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.option(options::io_writer(writer))
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(self, level: LogLevel) -> Self {
        self.option(options::level(level))
    }

    #[must_use = "builder methods return a new value"]
    pub fn sampler<S: Sampler + 'static>(self, sampler: S) -> Self {
        self.option(options::sampler(sampler))
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_hook<H: Hook + 'static>(self, hook: H) -> Self {
        self.option(options::add_hook(hook))
    }

    #[must_use = "builder methods return a new value"]
    pub fn hooks(self, hooks: Vec<Arc<dyn Hook>>) -> Self {
        self.option(options::hooks(hooks))
    }

    #[must_use = "builder methods return a new value"]
    pub fn with<F>(self, fields: F) -> Self
    where
        F: Fn(&mut Event<'_>) + Send + Sync + 'static,
    {
        self.option(options::with(fields))
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack(self, enabled: bool) -> Self {
        self.option(options::stack(enabled))
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller(self, enabled: bool) -> Self {
        self.option(options::caller(enabled))
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger::new(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hook::HookFunc;
    use crate::core::level_writer::LevelWriterAdapter;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Shared in-memory sink that remembers the level of every write.
    #[derive(Default)]
    struct Capture {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl LevelWriter for Capture {
        fn write(&self, payload: &[u8]) -> Result<usize> {
            self.write_level(LogLevel::NoLevel, payload)
        }

        fn write_level(&self, level: LogLevel, payload: &[u8]) -> Result<usize> {
            let line = String::from_utf8_lossy(payload).into_owned();
            self.lines.lock().push((level, line));
            Ok(payload.len())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    fn capture_logger(extra: Vec<LoggerOption>) -> (Logger, Arc<Capture>) {
        let capture = Arc::new(Capture::default());
        let mut opts = vec![options::writer(Arc::clone(&capture))];
        opts.extend(extra);
        (Logger::new(opts), capture)
    }

    #[test]
    fn test_zero_value_logger() {
        let logger = Logger::default();
        assert_eq!(logger.level(), LogLevel::NoLevel);
        assert_eq!(logger.writer().name(), "stdout");
        assert!(logger.sampler().is_none());
        assert!(logger.hooks().is_empty());
        assert!(!logger.stack_enabled());
        assert!(!logger.caller_enabled());
        assert!(logger.context().is_empty());
    }

    #[test]
    fn test_builder_matches_new() {
        let built = Logger::builder()
            .level(LogLevel::Warn)
            .stack(true)
            .caller(true)
            .build();
        let folded = Logger::new([
            options::level(LogLevel::Warn),
            options::stack(true),
            options::caller(true),
        ]);

        assert_eq!(built.level(), folded.level());
        assert_eq!(built.stack_enabled(), folded.stack_enabled());
        assert_eq!(built.caller_enabled(), folded.caller_enabled());
    }

    #[test]
    fn test_record_layout() {
        let (logger, capture) = capture_logger(vec![options::with(|e| {
            e.str("service", "api");
        })]);

        logger.info().int("status", 200).msg("served").unwrap();

        let lines = capture.lines.lock();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, LogLevel::Info);
        assert_eq!(
            lines[0].1,
            "{\"level\":\"info\",\"service\":\"api\",\"status\":200,\"message\":\"served\"}\n"
        );
    }

    #[test]
    fn test_no_level_record_has_no_level_field() {
        let (logger, capture) = capture_logger(Vec::new());
        logger.log().str("k", "v").send().unwrap();
        assert_eq!(capture.lines.lock()[0].1, "{\"k\":\"v\"}\n");
    }

    #[test]
    fn test_level_filter() {
        let (logger, capture) = capture_logger(vec![options::level(LogLevel::Warn)]);

        logger.debug().msg("debug").unwrap();
        logger.info().msg("info").unwrap();
        logger.warn().msg("warn").unwrap();
        logger.error().msg("error").unwrap();

        let levels: Vec<LogLevel> = capture.lines.lock().iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, vec![LogLevel::Warn, LogLevel::Error]);
    }

    #[test]
    fn test_sampler_consulted_only_above_threshold() {
        let asked = Arc::new(AtomicUsize::new(0));
        let asked_clone = Arc::clone(&asked);
        let (logger, capture) = capture_logger(vec![
            options::level(LogLevel::Info),
            options::sampler(move |_level: LogLevel| {
                asked_clone.fetch_add(1, Ordering::SeqCst);
                false
            }),
        ]);

        logger.debug().msg("below threshold").unwrap();
        logger.error().msg("sampled out").unwrap();

        assert_eq!(asked.load(Ordering::SeqCst), 1);
        assert!(capture.lines.lock().is_empty());
    }

    #[test]
    fn test_hooks_run_in_order_and_add_fields() {
        let (logger, capture) = capture_logger(vec![
            options::add_hook(HookFunc::new(|e, _level, _msg| {
                e.int("first", 1);
            })),
            options::add_hook(HookFunc::new(|e, _level, _msg| {
                e.int("second", 2);
            })),
        ]);

        logger.warn().msg("hooked").unwrap();
        assert_eq!(
            capture.lines.lock()[0].1,
            "{\"level\":\"warn\",\"first\":1,\"second\":2,\"message\":\"hooked\"}\n"
        );
    }

    #[test]
    fn test_child_inherits_and_parent_is_untouched() {
        let (parent, capture) = capture_logger(vec![options::with(|e| {
            e.str("service", "api");
        })]);
        let child = parent.child([
            options::extend(|e| {
                e.str("request_id", "r-1");
            }),
            options::level(LogLevel::Error),
        ]);

        assert_eq!(parent.context(), br#""service":"api""#);
        assert_eq!(child.context(), br#""service":"api","request_id":"r-1""#);
        assert_eq!(parent.level(), LogLevel::NoLevel);

        child.error().msg("from child").unwrap();
        assert!(capture.lines.lock()[0].1.contains("\"request_id\":\"r-1\""));
    }

    #[test]
    fn test_err_shortcut() {
        let (logger, capture) = capture_logger(Vec::new());
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");
        logger.err(&io_err).msg("startup failed").unwrap();

        let line = &capture.lines.lock()[0].1;
        assert!(line.starts_with("{\"level\":\"error\",\"error\":\"config missing\""));
    }

    #[test]
    fn test_write_errors_reach_caller() {
        struct Closed;

        impl std::io::Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let logger = Logger::new([options::writer(LevelWriterAdapter::new(Closed))]);
        assert!(logger.info().msg("lost?").is_err());
    }

    #[test]
    fn test_debug_output() {
        let logger = Logger::builder().level(LogLevel::Info).build();
        let debug = format!("{:?}", logger);
        assert!(debug.contains("Logger"));
        assert!(debug.contains("stdout"));
        assert!(debug.contains("Info"));
    }

    #[test]
    fn test_logger_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
        assert_send_sync::<LoggerOption>();
    }
}
