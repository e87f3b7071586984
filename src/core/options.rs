//! Composable logger configuration
//!
//! A [`LoggerOption`] is a named mutation of a logger under construction.
//! [`Logger::new`](super::logger::Logger::new) folds a sequence of options
//! over the zero-value logger in order: the last option touching a scalar
//! field wins, [`add_hook`] appends, [`hooks`] replaces.
//!
//! Options are plain values; the same option can be applied to any number
//! of loggers and always has the same effect.
//!
//! # Example
//!
//! ```
//! use astro_logger::{options, LogLevel, Logger};
//!
//! let logger = Logger::new([
//!     options::level(LogLevel::Info),
//!     options::with(|e| {
//!         e.str("service", "billing").int("shard", 4);
//!     }),
//!     options::stack(true),
//! ]);
//! assert_eq!(logger.context(), br#""service":"billing","shard":4"#);
//! ```

use super::{
    encoder,
    event::Event,
    hook::Hook,
    level_writer::{LevelWriter, LevelWriterAdapter},
    log_level::LogLevel,
    logger::Logger,
    sampling::Sampler,
};
use crate::writers::ConsoleWriter;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Field-setting callback used by [`with`] and [`extend`].
pub type FieldsFn = Arc<dyn Fn(&mut Event<'_>) + Send + Sync>;

#[derive(Clone)]
pub struct LoggerOption {
    name: &'static str,
    apply: Arc<dyn Fn(&mut Logger) + Send + Sync>,
}

impl LoggerOption {
    /// Build a custom option from a mutation of the logger.
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(&mut Logger) + Send + Sync + 'static,
    {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, logger: &mut Logger) {
        (self.apply)(logger)
    }
}

impl fmt::Debug for LoggerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LoggerOption").field(&self.name).finish()
    }
}

/// Write records to a level-aware sink.
pub fn writer<W: LevelWriter + 'static>(writer: W) -> LoggerOption {
    let writer: Arc<dyn LevelWriter> = Arc::new(writer);
    maybe_writer(Some(writer))
}

/// Write records to a plain byte sink, ignoring severity.
pub fn io_writer<W: Write + Send + 'static>(writer: W) -> LoggerOption {
    self::writer(LevelWriterAdapter::new(writer))
}

/// Write records to `writer`, or to stdout when it is `None`.
pub fn maybe_writer(writer: Option<Arc<dyn LevelWriter>>) -> LoggerOption {
    let writer: Arc<dyn LevelWriter> = match writer {
        Some(writer) => writer,
        None => Arc::new(ConsoleWriter::stdout()),
    };
    LoggerOption::new("writer", move |logger| {
        logger.writer = Arc::clone(&writer);
    })
}

/// Set the minimum severity that is emitted.
pub fn level(level: LogLevel) -> LoggerOption {
    LoggerOption::new("level", move |logger| {
        logger.level = level;
    })
}

pub fn sampler<S: Sampler + 'static>(sampler: S) -> LoggerOption {
    let sampler: Arc<dyn Sampler> = Arc::new(sampler);
    maybe_sampler(Some(sampler))
}

/// Set the sampler; `None` turns sampling off so every record passes.
pub fn maybe_sampler(sampler: Option<Arc<dyn Sampler>>) -> LoggerOption {
    LoggerOption::new("sampler", move |logger| {
        logger.sampler = sampler.clone();
    })
}

/// Append one hook after the hooks already registered.
pub fn add_hook<H: Hook + 'static>(hook: H) -> LoggerOption {
    let hook: Arc<dyn Hook> = Arc::new(hook);
    LoggerOption::new("add_hook", move |logger| {
        logger.hooks.push(Arc::clone(&hook));
    })
}

/// Replace every registered hook with `hooks`. An empty vec clears them.
pub fn hooks(hooks: Vec<Arc<dyn Hook>>) -> LoggerOption {
    LoggerOption::new("hooks", move |logger| {
        logger.hooks = hooks.clone();
    })
}

/// Pre-encode the fields set by `fields` into the logger's context,
/// replacing any previous context.
///
/// The callback runs once per application against a scratch event bound to
/// the logger's current writer and level. Afterwards the scratch event's
/// stack and caller flags are copied onto the logger, so calling
/// `e.stack()` or `e.caller()` inside the callback enables them, and not
/// calling them disables them.
pub fn with<F>(fields: F) -> LoggerOption
where
    F: Fn(&mut Event<'_>) + Send + Sync + 'static,
{
    let fields: FieldsFn = Arc::new(fields);
    maybe_with(Some(fields))
}

/// Like [`with`]; `None` leaves the logger untouched.
pub fn maybe_with(fields: Option<FieldsFn>) -> LoggerOption {
    LoggerOption::new("with", move |logger| {
        let Some(fields) = &fields else {
            return;
        };
        let (buf, stack, caller) = snapshot(logger, false, false, &**fields);
        logger.stack = stack;
        logger.caller = caller;

        let mut context = Vec::with_capacity(encoder::CONTEXT_CAPACITY);
        encoder::append_object_data(&mut context, &buf);
        logger.context = Arc::new(context);
    })
}

/// Pre-encode the fields set by `fields` after the logger's existing
/// context. Intended for child loggers that add to what they inherit.
///
/// The scratch event starts from the logger's own stack and caller flags,
/// so they only change if the callback changes them.
pub fn extend<F>(fields: F) -> LoggerOption
where
    F: Fn(&mut Event<'_>) + Send + Sync + 'static,
{
    LoggerOption::new("extend", move |logger| {
        let (buf, stack, caller) = snapshot(logger, logger.stack, logger.caller, &fields);
        logger.stack = stack;
        logger.caller = caller;

        let capacity = encoder::CONTEXT_CAPACITY.max(logger.context.len() + buf.len() + 1);
        let mut context = Vec::with_capacity(capacity);
        context.extend_from_slice(&logger.context);
        encoder::append_object_data(&mut context, &buf);
        logger.context = Arc::new(context);
    })
}

/// Attach a backtrace to errors logged at error severity or above.
pub fn stack(enabled: bool) -> LoggerOption {
    LoggerOption::new("stack", move |logger| {
        logger.stack = enabled;
    })
}

/// Record the call site of every record in a `caller` field.
pub fn caller(enabled: bool) -> LoggerOption {
    LoggerOption::new("caller", move |logger| {
        logger.caller = enabled;
    })
}

/// Run `fields` against a scratch event and hand back its encoded fields
/// and final flags.
fn snapshot(
    logger: &Logger,
    stack: bool,
    caller: bool,
    fields: &(dyn Fn(&mut Event<'_>) + Send + Sync),
) -> (Vec<u8>, bool, bool) {
    let mut event = Event::snapshot(&*logger.writer, logger.level);
    event.stack = stack;
    event.caller = caller;
    fields(&mut event);
    (event.buf, event.stack, event.caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hook::HookFunc;

    fn noop_hook() -> HookFunc<impl Fn(&mut Event<'_>, LogLevel, &str) + Send + Sync> {
        HookFunc::new(|_e: &mut Event<'_>, _level: LogLevel, _msg: &str| {})
    }

    #[test]
    fn test_option_names() {
        assert_eq!(level(LogLevel::Warn).name(), "level");
        assert_eq!(add_hook(noop_hook()).name(), "add_hook");
        assert_eq!(maybe_with(None).name(), "with");
        assert_eq!(format!("{:?}", stack(true)), "LoggerOption(\"stack\")");
    }

    #[test]
    fn test_options_are_reusable() {
        let opts = vec![
            level(LogLevel::Error),
            add_hook(noop_hook()),
            with(|e| {
                e.str("region", "eu-west-1");
            }),
        ];

        let first = Logger::new(opts.clone());
        let second = Logger::new(opts);

        assert_eq!(first.level(), second.level());
        assert_eq!(first.hooks().len(), 1);
        assert_eq!(second.hooks().len(), 1);
        assert_eq!(first.context(), second.context());
    }

    #[test]
    fn test_maybe_writer_none_falls_back_to_stdout() {
        let logger = Logger::new([io_writer(Vec::new()), maybe_writer(None)]);
        assert_eq!(logger.writer().name(), "stdout");
    }

    #[test]
    fn test_maybe_sampler_none_disables_sampling() {
        let logger = Logger::new([sampler(|_level: LogLevel| false), maybe_sampler(None)]);
        assert!(logger.sampler().is_none());
    }

    #[test]
    fn test_with_copies_flags_back() {
        let logger = Logger::new([
            stack(true),
            caller(true),
            with(|e| {
                e.str("k", "v");
            }),
        ]);
        assert!(!logger.stack_enabled());
        assert!(!logger.caller_enabled());

        let logger = Logger::new([with(|e| {
            e.stack().caller();
        })]);
        assert!(logger.stack_enabled());
        assert!(logger.caller_enabled());
        assert!(logger.context().is_empty());
    }

    #[test]
    fn test_with_replaces_previous_context() {
        let logger = Logger::new([
            with(|e| {
                e.str("a", "1");
            }),
            with(|e| {
                e.str("b", "2");
            }),
        ]);
        assert_eq!(logger.context(), br#""b":"2""#);
    }

    #[test]
    fn test_extend_appends_and_keeps_flags() {
        let logger = Logger::new([
            with(|e| {
                e.str("a", "1");
            }),
            stack(true),
            extend(|e| {
                e.int("b", 2);
            }),
        ]);
        assert_eq!(logger.context(), br#""a":"1","b":2"#);
        assert!(logger.stack_enabled());
    }

    #[test]
    fn test_finishing_inside_with_keeps_context_clean() {
        use crate::core::level_writer::LevelWriterAdapter;

        let sink = Arc::new(LevelWriterAdapter::new(Vec::new()));
        let logger = Logger::new([
            writer(Arc::clone(&sink)),
            with(|e| {
                e.str("svc", "api").send().unwrap();
            }),
            extend(|e| {
                e.int("shard", 3).msg("ignored").unwrap();
            }),
        ]);
        assert_eq!(logger.context(), br#""svc":"api","shard":3"#);

        logger.info().msg("x").unwrap();
        drop(logger);

        let out = Arc::try_unwrap(sink).ok().unwrap().into_inner();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"level\":\"info\",\"svc\":\"api\",\"shard\":3,\"message\":\"x\"}\n"
        );
    }

    #[test]
    fn test_snapshot_buffer_has_no_begin_marker() {
        let logger = Logger::default();
        let (buf, _, _) = snapshot(&logger, false, false, &|e: &mut Event<'_>| {
            e.bool("ready", true);
        });
        assert_eq!(buf, br#""ready":true"#);
    }
}
