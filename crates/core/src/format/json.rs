use crate::container::LogContainer;
use crate::error::WideLogResult;

use super::Formatter;

/// Renders the container as a single compact JSON object.
///
/// Key order is insertion order; `null` values are kept.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn format(&self, container: &LogContainer) -> WideLogResult<String> {
        Ok(serde_json::to_string(container)?)
    }
}
