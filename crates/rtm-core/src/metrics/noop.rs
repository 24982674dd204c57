use rtm_model::{BatchMode, Operation};

use crate::metrics::backend::{MetricsBackend, OutcomeKind};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_operation_started(&self, _: Operation) {}

    #[inline(always)]
    fn record_operation_completed(&self, _: Operation, _: OutcomeKind, _: u64) {}

    #[inline(always)]
    fn record_batch(&self, _: Operation, _: BatchMode, _: usize) {}
}
