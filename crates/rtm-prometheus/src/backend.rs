use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};
use rtm_core::{MetricsBackend, OutcomeKind};
use rtm_model::{BatchMode, Operation};

const NAMESPACE: &str = "rtm";

/// [`MetricsBackend`] recording into a prometheus [`Registry`].
#[derive(Clone)]
pub struct PrometheusMetrics {
    started: CounterVec,
    completed: CounterVec,
    duration: HistogramVec,
    batches: CounterVec,
    batch_size: HistogramVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let started = CounterVec::new(
            Opts::new("operations_started_total", "Runtime operations started")
                .namespace(NAMESPACE),
            &["op"],
        )?;
        registry.register(Box::new(started.clone()))?;

        let completed = CounterVec::new(
            Opts::new("operations_completed_total", "Runtime operations completed")
                .namespace(NAMESPACE),
            &["op", "outcome"],
        )?;
        registry.register(Box::new(completed.clone()))?;

        // helm upgrade --wait routinely takes minutes.
        let duration = HistogramVec::new(
            HistogramOpts::new("operation_duration_seconds", "Runtime operation wall time")
                .namespace(NAMESPACE)
                .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
            &["op"],
        )?;
        registry.register(Box::new(duration.clone()))?;

        let batches = CounterVec::new(
            Opts::new("batches_total", "Accepted batch requests").namespace(NAMESPACE),
            &["op", "mode"],
        )?;
        registry.register(Box::new(batches.clone()))?;

        let batch_size = HistogramVec::new(
            HistogramOpts::new("batch_size", "Distinct runtime ids per batch")
                .namespace(NAMESPACE)
                .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
            &["op"],
        )?;
        registry.register(Box::new(batch_size.clone()))?;

        Ok(Self {
            started,
            completed,
            duration,
            batches,
            batch_size,
            registry,
        })
    }

    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition of every registered metric, with its content type.
    pub fn encode_text(&self) -> Result<(String, Vec<u8>), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.gather(), &mut buf)?;
        Ok((encoder.format_type().to_string(), buf))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_operation_started(&self, op: Operation) {
        self.started.with_label_values(&[op.as_label()]).inc();
    }

    fn record_operation_completed(&self, op: Operation, outcome: OutcomeKind, duration_ms: u64) {
        self.completed
            .with_label_values(&[op.as_label(), outcome.as_label()])
            .inc();
        self.duration
            .with_label_values(&[op.as_label()])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_batch(&self, op: Operation, mode: BatchMode, size: usize) {
        self.batches
            .with_label_values(&[op.as_label(), mode.as_label()])
            .inc();
        self.batch_size
            .with_label_values(&[op.as_label()])
            .observe(size as f64);
    }
}
