//! Writer implementations

pub mod console;
pub mod file;

pub use console::{ConsoleTarget, ConsoleWriter};
pub use file::FileWriter;

// Re-export the sink contract alongside its implementations
pub use crate::core::{LevelWriter, LevelWriterAdapter};
