//! Core logger types and traits

pub mod config;
pub mod encoder;
pub mod error;
pub mod event;
pub mod field;
pub mod hook;
pub mod level_writer;
pub mod log_level;
pub mod logger;
pub mod options;
pub mod sampling;

pub use config::{LoggerConfig, OutputTarget};
pub use error::{LoggerError, Result};
pub use event::Event;
pub use field::FieldValue;
pub use hook::{Hook, HookFunc, LevelHook};
pub use level_writer::{LevelWriter, LevelWriterAdapter};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use options::{FieldsFn, LoggerOption};
pub use sampling::{BasicSampler, LevelSampler, RandomSampler, Sampler, SamplerMetrics};
