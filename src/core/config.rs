//! Declarative logger configuration
//!
//! [`LoggerConfig`] describes a logger in data, for example a section of a
//! service's JSON config file, and turns into the same ordered
//! [`LoggerOption`]s a caller would write by hand.
//!
//! ```
//! use astro_logger::{LoggerConfig, LogLevel};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "warn",
//!     "caller": true,
//!     "output": "stderr",
//!     "fields": { "service": "billing", "shard": 4 }
//! }"#)?;
//!
//! let logger = config.build()?;
//! assert_eq!(logger.level(), LogLevel::Warn);
//! assert_eq!(logger.context(), br#""service":"billing","shard":4"#);
//! # Ok::<(), astro_logger::LoggerError>(())
//! ```

use super::{
    error::{LoggerError, Result},
    field::FieldValue,
    log_level::LogLevel,
    logger::Logger,
    options::{self, LoggerOption},
    sampling::RandomSampler,
};
use crate::writers::{ConsoleWriter, FileWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Where records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    /// stdout, with Error and worse on stderr
    Console,
    File(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Minimum severity
    pub level: LogLevel,

    /// Capture backtraces for errors at error severity or above
    pub stack: bool,

    /// Record call sites
    pub caller: bool,

    /// Fraction of records kept below error severity; `None` keeps all
    pub sample_rate: Option<f64>,

    pub output: OutputTarget,

    /// Fields pre-encoded into every record, in key order
    pub fields: BTreeMap<String, FieldValue>,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into options, in the order writer, level, sampler, fields,
    /// stack, caller.
    ///
    /// Fails if the sample rate is outside `[0, 1]` or the output file
    /// cannot be opened.
    pub fn into_options(self) -> Result<Vec<LoggerOption>> {
        let mut opts = Vec::with_capacity(6);

        // Validate before the writer is opened so a bad config creates no file
        if let Some(rate) = self.sample_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(LoggerError::config(
                    "sample_rate",
                    format!("must be between 0.0 and 1.0, got {}", rate),
                ));
            }
        }

        opts.push(match self.output {
            OutputTarget::Stdout => options::writer(ConsoleWriter::stdout()),
            OutputTarget::Stderr => options::writer(ConsoleWriter::stderr()),
            OutputTarget::Console => options::writer(ConsoleWriter::split()),
            OutputTarget::File(path) => options::writer(FileWriter::new(path)?),
        });

        opts.push(options::level(self.level));

        if let Some(rate) = self.sample_rate {
            opts.push(options::sampler(RandomSampler::new(rate)));
        }

        if !self.fields.is_empty() {
            let fields = Arc::new(self.fields);
            opts.push(options::with(move |e| {
                for (key, value) in fields.iter() {
                    e.field(key, value.clone());
                }
            }));
        }

        opts.push(options::stack(self.stack));
        opts.push(options::caller(self.caller));
        Ok(opts)
    }

    pub fn build(self) -> Result<Logger> {
        Ok(Logger::new(self.into_options()?))
    }
}
