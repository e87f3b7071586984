//! Transient log record
//!
//! An [`Event`] lives for the duration of one log call (or one context
//! snapshot). Field setters append straight into its encoded buffer, so by
//! the time [`Event::msg`] runs, only the hooks, the message and the end
//! marker are left to encode.

use super::{
    encoder,
    error::Result,
    field::FieldValue,
    hook::Hook,
    level_writer::LevelWriter,
    log_level::LogLevel,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::Arc;

pub const LEVEL_FIELD: &str = "level";
pub const MESSAGE_FIELD: &str = "message";
pub const ERROR_FIELD: &str = "error";
pub const STACK_FIELD: &str = "stack";
pub const CALLER_FIELD: &str = "caller";
pub const TIMESTAMP_FIELD: &str = "time";

pub struct Event<'a> {
    pub(crate) buf: Vec<u8>,
    pub(crate) level: LogLevel,
    pub(crate) stack: bool,
    pub(crate) caller: bool,
    writer: &'a dyn LevelWriter,
    hooks: &'a [Arc<dyn Hook>],
    enabled: bool,
    /// Cleared for context snapshots and while a record is being finished.
    finishable: bool,
}

impl<'a> Event<'a> {
    /// Create an enabled event with an open object buffer and no hooks.
    pub(crate) fn new(writer: &'a dyn LevelWriter, level: LogLevel) -> Self {
        let mut buf = Vec::with_capacity(encoder::CONTEXT_CAPACITY);
        encoder::append_begin_marker(&mut buf);
        Self {
            buf,
            level,
            stack: false,
            caller: false,
            writer,
            hooks: &[],
            enabled: true,
            finishable: true,
        }
    }

    /// Create an event that collects bare fields for a context snapshot.
    ///
    /// The buffer starts empty and `msg`/`send` do nothing, so only field
    /// fragments ever end up in the buffer.
    pub(crate) fn snapshot(writer: &'a dyn LevelWriter, level: LogLevel) -> Self {
        Self {
            buf: Vec::with_capacity(encoder::CONTEXT_CAPACITY),
            level,
            stack: false,
            caller: false,
            writer,
            hooks: &[],
            enabled: true,
            finishable: false,
        }
    }

    /// Create an event that swallows every field and never writes.
    pub(crate) fn disabled(writer: &'a dyn LevelWriter, level: LogLevel) -> Self {
        Self {
            buf: Vec::new(),
            level,
            stack: false,
            caller: false,
            writer,
            hooks: &[],
            enabled: false,
            finishable: false,
        }
    }

    pub(crate) fn with_hooks(mut self, hooks: &'a [Arc<dyn Hook>]) -> Self {
        self.hooks = hooks;
        self
    }

    /// Whether this event will be written when finished.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Encoded bytes accumulated so far.
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub fn str(&mut self, key: &str, value: &str) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            encoder::append_string(&mut self.buf, value);
        }
        self
    }

    pub fn int(&mut self, key: &str, value: i64) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            encoder::append_int(&mut self.buf, value);
        }
        self
    }

    pub fn uint(&mut self, key: &str, value: u64) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            encoder::append_uint(&mut self.buf, value);
        }
        self
    }

    pub fn float(&mut self, key: &str, value: f64) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            encoder::append_float(&mut self.buf, value);
        }
        self
    }

    pub fn bool(&mut self, key: &str, value: bool) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            encoder::append_bool(&mut self.buf, value);
        }
        self
    }

    /// Add a field of any type convertible into a [`FieldValue`].
    pub fn field<V: Into<FieldValue>>(&mut self, key: &str, value: V) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            value.into().append_to(&mut self.buf);
        }
        self
    }

    /// Add any serializable value as a nested JSON field.
    ///
    /// A value that fails to serialize is recorded as a string describing
    /// the failure instead.
    pub fn serialize<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, key);
            if let Err(e) = encoder::append_json(&mut self.buf, value) {
                encoder::append_string(&mut self.buf, &format!("marshaling error: {}", e));
            }
        }
        self
    }

    /// Add an `error` field. With stack capture enabled on an error-or-worse
    /// record, a `stack` field holding the current backtrace follows it.
    pub fn err<E: std::error::Error + ?Sized>(&mut self, err: &E) -> &mut Self {
        if self.enabled {
            encoder::append_key(&mut self.buf, ERROR_FIELD);
            encoder::append_string(&mut self.buf, &err.to_string());
            if self.stack && self.level >= LogLevel::Error {
                let trace = Backtrace::force_capture().to_string();
                encoder::append_key(&mut self.buf, STACK_FIELD);
                encoder::append_string(&mut self.buf, &trace);
            }
        }
        self
    }

    /// Add the current UTC time as an RFC 3339 `time` field.
    pub fn timestamp(&mut self) -> &mut Self {
        if self.enabled {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            encoder::append_key(&mut self.buf, TIMESTAMP_FIELD);
            encoder::append_string(&mut self.buf, &now);
        }
        self
    }

    /// Enable stack capture for errors added after this call.
    pub fn stack(&mut self) -> &mut Self {
        self.stack = true;
        self
    }

    /// Record the call site of [`Event::msg`] in a `caller` field.
    pub fn caller(&mut self) -> &mut Self {
        self.caller = true;
        self
    }

    /// Finish the record with `message` and write it.
    ///
    /// Hooks run first, in registration order, and may still add fields.
    /// A disabled or already finished event does nothing, and so does a
    /// context snapshot or a hook finishing the event it was handed. A
    /// `Fatal` record is written and flushed, then the process exits; a
    /// `Panic` record panics with the message after the write.
    #[track_caller]
    pub fn msg(&mut self, message: &str) -> Result<()> {
        if !self.enabled || !self.finishable {
            return Ok(());
        }
        self.finishable = false;
        let location = Location::caller();
        let level = self.level;

        let hooks = self.hooks;
        for hook in hooks {
            hook.run(self, level, message);
        }

        if self.caller {
            encoder::append_key(&mut self.buf, CALLER_FIELD);
            encoder::append_string(
                &mut self.buf,
                &format!("{}:{}", location.file(), location.line()),
            );
        }
        if !message.is_empty() {
            encoder::append_key(&mut self.buf, MESSAGE_FIELD);
            encoder::append_string(&mut self.buf, message);
        }
        encoder::append_end_marker(&mut self.buf);
        encoder::append_line_break(&mut self.buf);
        self.enabled = false;

        let written = self.writer.write_level(level, &self.buf).map(|_| ());

        match level {
            LogLevel::Fatal => {
                if let Err(e) = written.and_then(|_| self.writer.flush()) {
                    eprintln!("[LOGGER ERROR] Failed to write fatal record: {}", e);
                }
                std::process::exit(1)
            }
            LogLevel::Panic => {
                if let Err(e) = written {
                    eprintln!("[LOGGER ERROR] Failed to write panic record: {}", e);
                }
                panic!("{}", message)
            }
            _ => written,
        }
    }

    /// Finish the record without a message.
    #[track_caller]
    pub fn send(&mut self) -> Result<()> {
        self.msg("")
    }
}

impl std::fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("enabled", &self.enabled)
            .field("buf", &String::from_utf8_lossy(&self.buf))
            .finish()
    }
}
