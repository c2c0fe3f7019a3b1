use crate::container::LogContainer;
use crate::error::WideLogResult;

use super::Formatter;

/// Separator used between entries when none is configured.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Renders the container as `key1=<json>|key2=<json>|...`.
///
/// Every value is JSON-encoded on its own, so strings keep their quotes and
/// objects render inline: `name="svc"|count=3|tags=["a"]|missing=null`.
/// That costs a few bytes per entry but lets a reader tell `"null"` from
/// `null` and `"1"` from `1`. Keys are written verbatim.
///
/// An empty container renders as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueFormatter {
    separator: String,
}

impl KeyValueFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for KeyValueFormatter {
    fn default() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }
}

impl Formatter for KeyValueFormatter {
    fn name(&self) -> &str {
        "key_value"
    }

    fn format(&self, container: &LogContainer) -> WideLogResult<String> {
        let mut out = String::new();
        for (idx, (key, value)) in container.iter().enumerate() {
            if idx > 0 {
                out.push_str(&self.separator);
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&serde_json::to_string(value)?);
        }
        Ok(out)
    }
}
