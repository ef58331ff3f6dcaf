//! `millgate-observability` — tracing/logging setup shared by hosts.

/// Initialize process-wide observability (tracing/logging).
///
/// Safe to call multiple times; subsequent calls become no-ops, which
/// also makes it usable from test setup.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
