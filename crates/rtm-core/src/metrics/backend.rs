use std::sync::Arc;

use rtm_model::{BatchMode, Operation};

use crate::error::OperationError;

/// Runtime operation outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Helm reported success.
    Success,
    /// Release does not exist.
    NotFound,
    /// Values were missing, malformed or not flattenable.
    ConfigError,
    /// Helm failed or could not be spawned.
    ExecutionError,
    /// Helm did not finish in time.
    Timeout,
    /// Operation canceled by the batch deadline or shutdown.
    Canceled,
}

impl OutcomeKind {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::NotFound => "not_found",
            OutcomeKind::ConfigError => "config_error",
            OutcomeKind::ExecutionError => "execution_error",
            OutcomeKind::Timeout => "timeout",
            OutcomeKind::Canceled => "canceled",
        }
    }

    /// Classify an operation result.
    pub fn of(result: &Result<(), OperationError>) -> Self {
        match result {
            Ok(()) => OutcomeKind::Success,
            Err(e) => match e.kind() {
                "not_found" => OutcomeKind::NotFound,
                "config_error" => OutcomeKind::ConfigError,
                "timeout" => OutcomeKind::Timeout,
                "canceled" => OutcomeKind::Canceled,
                _ => OutcomeKind::ExecutionError,
            },
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the start of a single runtime operation.
    fn record_operation_started(&self, op: Operation);
    /// Record completion of a single runtime operation.
    ///
    /// # Arguments
    /// - `op`: Restart or delete
    /// - `outcome`: How the operation terminated
    /// - `duration_ms`: Wall time in milliseconds
    fn record_operation_completed(&self, op: Operation, outcome: OutcomeKind, duration_ms: u64);
    /// Record an accepted batch and its (deduplicated) size.
    fn record_batch(&self, op: Operation, mode: BatchMode, size: usize);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
