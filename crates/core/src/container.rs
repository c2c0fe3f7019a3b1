//! Attribute container types.
//!
//! A container is a flat, insertion-ordered JSON object. `serde_json` is built
//! with `preserve_order`, so `Map` keeps keys in first-insertion order and an
//! overwrite keeps the key where it was.

/// Attribute name.
pub type LogKey = String;

/// Attribute value: any JSON value (string, number, bool, null, object, array).
pub type LogValue = serde_json::Value;

/// The attributes accumulated for one unit of work.
pub type LogContainer = serde_json::Map<LogKey, LogValue>;

/// Build a container from `(key, value)` pairs, keeping their order.
///
/// Later pairs overwrite earlier pairs with the same key.
pub fn container_from<K, V, I>(pairs: I) -> LogContainer
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<LogKey>,
    V: Into<LogValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
