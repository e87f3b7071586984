//! # Astro Logger
//!
//! A structured JSON logger configured by composable options.
//!
//! ## Features
//!
//! - **Composable configuration**: a logger is built by folding
//!   [`LoggerOption`]s over a zero value; options are reusable values
//! - **Pre-encoded context**: fields given to [`options::with`] are encoded
//!   once and copied verbatim into every record
//! - **Hooks**: per-record callbacks, with [`LevelHook`] routing by severity
//! - **Level-aware sinks**: any [`LevelWriter`], or a plain [`std::io::Write`]
//!   through [`LevelWriterAdapter`]
//! - **Thread Safe**: a finished [`Logger`] is read-only and `Send + Sync`
//!
//! ## Example
//!
//! ```
//! use astro_logger::prelude::*;
//!
//! let logger = Logger::new([
//!     options::level(LogLevel::Info),
//!     options::with(|e| {
//!         e.str("service", "checkout");
//!     }),
//!     options::add_hook(
//!         LevelHook::new().error(HookFunc::new(|e, _level, _msg| {
//!             e.bool("alert", true);
//!         })),
//!     ),
//! ]);
//!
//! logger.info().int("items", 3).msg("cart updated")?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod writers;

pub use crate::core::options;

pub mod prelude {
    pub use crate::core::options;
    pub use crate::core::{
        BasicSampler, Event, FieldValue, Hook, HookFunc, LevelHook, LevelSampler, LevelWriter,
        LevelWriterAdapter, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerOption, OutputTarget, RandomSampler, Result, Sampler,
    };
    pub use crate::writers::{ConsoleWriter, FileWriter};
}

pub use crate::core::{
    BasicSampler, Event, FieldValue, FieldsFn, Hook, HookFunc, LevelHook, LevelSampler,
    LevelWriter, LevelWriterAdapter, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerOption, OutputTarget, RandomSampler, Result, Sampler, SamplerMetrics,
};
pub use writers::{ConsoleTarget, ConsoleWriter, FileWriter};
