//! The wide logger: one mutable container per unit of work.
//!
//! ## Lifecycle
//!
//! ```text
//! new(config) ─▶ container = persistent
//!                  │
//!                  ├─ add / add_object / remove   (mutate, no output)
//!                  ├─ clear                        (container = persistent)
//!                  └─ flush ─▶ sink("WIDE " + format(container)) ─▶ clear
//! ```
//!
//! A logger is usually built once per process and reused for every unit of
//! work. Each unit of work must end with a `flush` (the Lambda middleware does
//! this for you), otherwise its attributes leak into the next one.
//!
//! Mutation takes `&mut self`: a logger tracks one unit of work at a time.
//! Overlapping units of work need one logger each.

use serde::Serialize;

use crate::config::{LoggerConfig, OverwriteHook};
use crate::container::{LogContainer, LogKey, LogValue};
use crate::error::WideLogResult;
use crate::format::{Formatter, JsonFormatter};
use crate::sink::{LogSink, StdoutSink};

/// Prefix of every emitted line.
pub const LINE_PREFIX: &str = "WIDE ";

pub struct WideLogger {
    container: LogContainer,
    persistent: LogContainer,
    formatter: Box<dyn Formatter>,
    sink: Box<dyn LogSink>,
    on_overwrite: Option<OverwriteHook>,
}

impl WideLogger {
    /// Logger writing to stdout.
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_sink(config, StdoutSink)
    }

    /// Logger writing to `sink`.
    pub fn with_sink(config: LoggerConfig, sink: impl LogSink + 'static) -> Self {
        let LoggerConfig {
            formatter,
            persistent_attributes,
            on_overwrite,
        } = config;

        Self {
            container: persistent_attributes.clone(),
            persistent: persistent_attributes,
            formatter: formatter.unwrap_or_else(|| Box::new(JsonFormatter::new())),
            sink: Box::new(sink),
            on_overwrite,
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// `None` is stored as an explicit `null`, so a missing value still shows
    /// up in the output instead of the key disappearing:
    ///
    /// ```
    /// # use widelog_core::{LoggerConfig, MemorySink, WideLogger};
    /// let sink = MemorySink::new();
    /// let mut logger = WideLogger::with_sink(LoggerConfig::new(), sink.clone());
    /// logger.add("group", None::<&str>);
    /// logger.flush().unwrap();
    /// assert_eq!(sink.last().unwrap(), r#"WIDE {"group":null}"#);
    /// ```
    pub fn add(&mut self, key: impl Into<LogKey>, value: impl Into<LogValue>) {
        self.insert(key.into(), value.into());
    }

    /// Insert any serializable value under `key`.
    ///
    /// Conversion errors are returned here rather than deferred to `flush`;
    /// the container is left untouched on error.
    pub fn add_serialize<T>(&mut self, key: impl Into<LogKey>, value: &T) -> WideLogResult<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.insert(key.into(), value);
        Ok(())
    }

    /// Shallow-merge `attributes` into the container; incoming keys win.
    pub fn add_object(&mut self, attributes: LogContainer) {
        for (key, value) in attributes {
            self.insert(key, value);
        }
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    ///
    /// The remaining keys keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<LogValue> {
        self.container.shift_remove(key)
    }

    /// Reset the container to the persistent attributes.
    pub fn clear(&mut self) {
        self.container = self.persistent.clone();
    }

    /// Render the current container as a complete output line, without
    /// writing it or clearing anything.
    pub fn render(&self) -> WideLogResult<String> {
        let rendered = self.formatter.format(&self.container)?;
        Ok(format!("{LINE_PREFIX}{rendered}"))
    }

    /// Write the container to the sink as one line, then `clear`.
    ///
    /// If formatting or the write fails, the error is returned and the
    /// container is kept as it was.
    pub fn flush(&mut self) -> WideLogResult<()> {
        let line = self.render()?;
        self.sink.write_line(&line)?;
        self.clear();
        Ok(())
    }

    pub fn container(&self) -> &LogContainer {
        &self.container
    }

    pub fn get(&self, key: &str) -> Option<&LogValue> {
        self.container.get(key)
    }

    pub fn persistent_attributes(&self) -> &LogContainer {
        &self.persistent
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    fn insert(&mut self, key: LogKey, value: LogValue) {
        if let Some(hook) = &self.on_overwrite {
            if let Some(old) = self.container.get(&key) {
                hook(&key, old, &value);
            }
        }
        self.container.insert(key, value);
    }
}

impl Default for WideLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl core::fmt::Debug for WideLogger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WideLogger")
            .field("container", &self.container)
            .field("persistent", &self.persistent)
            .field("formatter", &self.formatter.name())
            .field("on_overwrite", &self.on_overwrite.is_some())
            .finish_non_exhaustive()
    }
}
