//! Side-effect hooks run for every emitted record
//!
//! A [`Hook`] runs synchronously inside [`Event::msg`](super::event::Event::msg)
//! after the level and sampler checks passed and before the record is
//! closed, so it may still add fields. Panics raised by a hook are not
//! caught here and reach the logging call site.

use super::{event::Event, log_level::LogLevel};
use std::fmt;
use std::sync::Arc;

pub trait Hook: Send + Sync {
    fn run(&self, event: &mut Event<'_>, level: LogLevel, message: &str);
}

impl<H: Hook + ?Sized> Hook for Arc<H> {
    fn run(&self, event: &mut Event<'_>, level: LogLevel, message: &str) {
        (**self).run(event, level, message)
    }
}

/// Turns a plain closure into a [`Hook`].
///
/// # Example
///
/// ```
/// use astro_logger::{HookFunc, Logger, options};
///
/// let logger = Logger::new([options::add_hook(HookFunc::new(|e, _level, _msg| {
///     e.str("host", "api-1");
/// }))]);
/// # let _ = logger;
/// ```
pub struct HookFunc<F>(F);

impl<F> HookFunc<F>
where
    F: Fn(&mut Event<'_>, LogLevel, &str) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        HookFunc(f)
    }
}

impl<F> Hook for HookFunc<F>
where
    F: Fn(&mut Event<'_>, LogLevel, &str) + Send + Sync,
{
    #[inline]
    fn run(&self, event: &mut Event<'_>, level: LogLevel, message: &str) {
        (self.0)(event, level, message)
    }
}

/// Routes each record to the hook registered for its severity.
///
/// One optional slot per [`LogLevel`]; a record reaches at most one slot and
/// a severity without a hook is silently skipped.
#[derive(Clone, Default)]
pub struct LevelHook {
    slots: [Option<Arc<dyn Hook>>; LogLevel::COUNT],
}

impl LevelHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for `level`, replacing any previous one.
    #[must_use = "builder methods return a new value"]
    pub fn on<H: Hook + 'static>(mut self, level: LogLevel, hook: H) -> Self {
        self.set(level, Some(Arc::new(hook)));
        self
    }

    /// Set or clear the slot for `level`.
    pub fn set(&mut self, level: LogLevel, hook: Option<Arc<dyn Hook>>) {
        if let Some(slot) = self.slots.get_mut(level.index()) {
            *slot = hook;
        }
    }

    pub fn get(&self, level: LogLevel) -> Option<&Arc<dyn Hook>> {
        self.slots.get(level.index()).and_then(Option::as_ref)
    }

    #[must_use = "builder methods return a new value"]
    pub fn no_level<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::NoLevel, hook)
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::Debug, hook)
    }

    #[must_use = "builder methods return a new value"]
    pub fn info<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::Info, hook)
    }

    #[must_use = "builder methods return a new value"]
    pub fn warn<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::Warn, hook)
    }

    #[must_use = "builder methods return a new value"]
    pub fn error<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::Error, hook)
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::Fatal, hook)
    }

    #[must_use = "builder methods return a new value"]
    pub fn panic<H: Hook + 'static>(self, hook: H) -> Self {
        self.on(LogLevel::Panic, hook)
    }
}

impl Hook for LevelHook {
    #[inline]
    fn run(&self, event: &mut Event<'_>, level: LogLevel, message: &str) {
        if let Some(hook) = self.get(level) {
            hook.run(event, level, message);
        }
    }
}

impl fmt::Debug for LevelHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<LogLevel> = LogLevel::ALL
            .into_iter()
            .filter(|level| self.get(*level).is_some())
            .collect();
        f.debug_struct("LevelHook")
            .field("registered", &registered)
            .finish()
    }
}
