//! Logger configuration.
//!
//! Built in code through the builder methods, or read from the environment
//! with [`LoggerConfig::from_env`]:
//!
//! | variable                      | values                              | default |
//! |-------------------------------|-------------------------------------|---------|
//! | `WIDE_LOG_FORMAT`             | `json`, `key_value` (`kv`)          | `json`  |
//! | `WIDE_LOG_SEPARATOR`          | any string (key-value format only)  | `\|`    |
//! | `WIDE_LOG_WARN_ON_OVERWRITE`  | `true/false`, `1/0`, `yes/no`, `on/off` | `false` |

use crate::container::{LogContainer, LogKey, LogValue};
use crate::error::ConfigError;
use crate::format::{FormatKind, Formatter};

pub const FORMAT_VAR: &str = "WIDE_LOG_FORMAT";
pub const SEPARATOR_VAR: &str = "WIDE_LOG_SEPARATOR";
pub const WARN_ON_OVERWRITE_VAR: &str = "WIDE_LOG_WARN_ON_OVERWRITE";

/// Callback invoked when `add` replaces an existing key: `(key, old, new)`.
pub type OverwriteHook = Box<dyn Fn(&str, &LogValue, &LogValue) + Send + Sync>;

/// Construction-time options for a [`crate::WideLogger`].
#[derive(Default)]
pub struct LoggerConfig {
    pub(crate) formatter: Option<Box<dyn Formatter>>,
    pub(crate) persistent_attributes: LogContainer,
    pub(crate) on_overwrite: Option<OverwriteHook>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter used at flush time. JSON when not set.
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Replace the persistent attributes wholesale.
    pub fn persistent_attributes(mut self, attributes: LogContainer) -> Self {
        self.persistent_attributes = attributes;
        self
    }

    /// Add (or overwrite) one persistent attribute.
    pub fn persistent_attribute(
        mut self,
        key: impl Into<LogKey>,
        value: impl Into<LogValue>,
    ) -> Self {
        self.persistent_attributes.insert(key.into(), value.into());
        self
    }

    /// Call `hook` whenever `add`/`add_object` replaces an existing key.
    pub fn on_overwrite<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &LogValue, &LogValue) + Send + Sync + 'static,
    {
        self.on_overwrite = Some(Box::new(hook));
        self
    }

    /// Report overwrites as `tracing` warnings.
    pub fn warn_on_overwrite(self) -> Self {
        self.on_overwrite(warn_overwrite)
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match non_blank(lookup(FORMAT_VAR)) {
            Some(name) => name.parse::<FormatKind>()?,
            None => FormatKind::default(),
        };
        // A separator may legitimately be whitespace, so it is not trimmed.
        let separator = lookup(SEPARATOR_VAR).filter(|s| !s.is_empty());

        let mut config = Self {
            formatter: Some(kind.build(separator.as_deref())),
            ..Self::default()
        };

        if let Some(raw) = non_blank(lookup(WARN_ON_OVERWRITE_VAR)) {
            if parse_flag(WARN_ON_OVERWRITE_VAR, &raw)? {
                config = config.warn_on_overwrite();
            }
        }

        Ok(config)
    }

    pub fn has_overwrite_hook(&self) -> bool {
        self.on_overwrite.is_some()
    }
}

impl core::fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("formatter", &self.formatter.as_ref().map(|fmt| fmt.name()))
            .field("persistent_attributes", &self.persistent_attributes)
            .field("on_overwrite", &self.on_overwrite.is_some())
            .finish()
    }
}

/// The `tracing`-backed overwrite hook installed by [`LoggerConfig::warn_on_overwrite`].
pub fn warn_overwrite(key: &str, old: &LogValue, new: &LogValue) {
    tracing::warn!(key, old = %old, new = %new, "overwriting key '{key}'");
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_flag(var, raw)),
    }
}
