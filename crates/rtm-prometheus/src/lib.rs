//! Prometheus backend for runtime operation metrics.
//!
//! ## Metrics
//! - `rtm_operations_started_total{op}` counter
//! - `rtm_operations_completed_total{op, outcome}` counter
//! - `rtm_operation_duration_seconds{op}` histogram
//! - `rtm_batches_total{op, mode}` counter
//! - `rtm_batch_size{op}` histogram
//!
//! All labels are bounded: `op` is `restart|delete`, `mode` is
//! `sequential|concurrent`, `outcome` comes from [`rtm_core::OutcomeKind`].
//!
//! The crate does not serve HTTP; the daemon exposes [`PrometheusMetrics::encode_text`]
//! on `GET /metrics`.
mod backend;
pub use backend::PrometheusMetrics;
