//! `widelog-core` — wide event logging.
//!
//! Accumulate the attributes of one unit of work in a [`WideLogger`], then
//! `flush` them as a single `WIDE ...` line. Rendering is pluggable through
//! the [`Formatter`] trait; output goes through a [`LogSink`].

pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod logger;
pub mod sink;

pub use config::{LoggerConfig, OverwriteHook};
pub use container::{LogContainer, LogKey, LogValue, container_from};
pub use error::{ConfigError, WideLogError, WideLogResult};
pub use format::{FormatKind, Formatter, JsonFormatter, KeyValueFormatter};
pub use logger::{LINE_PREFIX, WideLogger};
pub use sink::{LogSink, MemorySink, StdoutSink, WriterSink};
