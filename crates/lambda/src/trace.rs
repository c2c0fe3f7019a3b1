//! X-Ray trace header parsing.
//!
//! Lambda exposes the active trace as `_X_AMZN_TRACE_ID`, e.g.
//! `Root=1-65e3369e-3d1b296f5b08533f7e899187;Parent=45cac5110a610bc4;Sampled=0`.
//! A value without any `=` is taken to be the bare root id.

/// Environment variable carrying the trace header.
pub const XRAY_TRACE_ID_VAR: &str = "_X_AMZN_TRACE_ID";

const ROOT: &str = "Root";

/// Parsed `key=value` fields of a trace header, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XrayTraceData {
    fields: Vec<(String, String)>,
}

impl XrayTraceData {
    /// Parse a raw header. Blank input yields `None`.
    ///
    /// Segments without `=` are skipped; a repeated key keeps its last value.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut data = Self::default();
        if !raw.contains('=') {
            data.set(ROOT, raw);
            return Some(data);
        }

        for field in raw.split(';') {
            if let Some((key, value)) = field.split_once('=') {
                data.set(key.trim(), value.trim());
            }
        }
        Some(data)
    }

    /// Read and parse `_X_AMZN_TRACE_ID` from the process environment.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(XRAY_TRACE_ID_VAR, |var| std::env::var(var).ok())
    }

    /// Read and parse `var` through an arbitrary lookup.
    pub fn from_lookup<F>(var: &str, lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(var).and_then(|raw| Self::parse(&raw))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn root(&self) -> Option<&str> {
        self.get(ROOT)
    }

    pub fn parent(&self) -> Option<&str> {
        self.get("Parent")
    }

    /// `Sampled=1` → `Some(true)`, `Sampled=0` → `Some(false)`.
    pub fn sampled(&self) -> Option<bool> {
        match self.get("Sampled")? {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }
}
