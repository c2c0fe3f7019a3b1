//! Rendering a container into the text of one wide log line.
//!
//! A formatter is a pure function of the container it is handed: it never
//! mutates it and never keeps a reference to it. The logger picks one
//! formatter at construction time and uses it for every flush.
//!
//! ```text
//! container ──format()──▶ text ──"WIDE " + text──▶ sink
//! ```

mod json;
mod key_value;

use core::str::FromStr;

pub use json::JsonFormatter;
pub use key_value::{DEFAULT_SEPARATOR, KeyValueFormatter};

use crate::container::LogContainer;
use crate::error::{ConfigError, WideLogResult};

/// Strategy converting a container into text.
///
/// Implementations must be stateless apart from fixed configuration (for
/// example a separator). Serialization failures are returned as-is; the
/// logger does not retry or recover from them.
pub trait Formatter: Send + Sync {
    /// Stable identifier, e.g. `"json"` or `"key_value"`.
    fn name(&self) -> &str;

    fn format(&self, container: &LogContainer) -> WideLogResult<String>;
}

impl<F> Formatter for Box<F>
where
    F: Formatter + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn format(&self, container: &LogContainer) -> WideLogResult<String> {
        (**self).format(container)
    }
}

/// Built-in formatter selection, used by environment-driven configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FormatKind {
    #[default]
    Json,
    KeyValue,
}

impl FormatKind {
    /// Instantiate the formatter. `separator` only applies to key-value output.
    pub fn build(self, separator: Option<&str>) -> Box<dyn Formatter> {
        match self {
            FormatKind::Json => Box::new(JsonFormatter::new()),
            FormatKind::KeyValue => match separator {
                Some(sep) => Box::new(KeyValueFormatter::with_separator(sep)),
                None => Box::new(KeyValueFormatter::new()),
            },
        }
    }
}

impl FromStr for FormatKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(FormatKind::Json),
            "key_value" | "key-value" | "keyvalue" | "kv" => Ok(FormatKind::KeyValue),
            other => Err(ConfigError::unknown_format(other)),
        }
    }
}
