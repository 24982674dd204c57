//! Metrics collection abstraction for runtime operations.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are
//! injected into the executor and the batch orchestrator.
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, OutcomeKind};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
