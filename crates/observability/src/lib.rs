//! Diagnostic logging setup.
//!
//! Wide log lines go to stdout through the logger's sink. Everything else the
//! workspace reports (overwrite warnings, flush failures, demo progress) goes
//! through `tracing`, and this crate installs the subscriber for it.

/// Initialize process-wide diagnostics with the default filter (`info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Initialize process-wide diagnostics with `default_filter` used when
/// `RUST_LOG` is unset.
pub fn init_with_filter(default_filter: &str) {
    tracing::init(default_filter);
}

/// Subscriber configuration (filters, layers).
pub mod tracing;
