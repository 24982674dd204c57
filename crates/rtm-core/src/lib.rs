pub mod batch;
pub mod error;
pub mod executor;
pub mod flatten;
pub mod metrics;
pub mod pods;
pub mod release;

#[cfg(test)]
mod test_support;

pub use batch::{BatchConfig, BatchOrchestrator, DEFAULT_MAX_CONCURRENCY};
pub use error::{ClusterQueryError, ConfigError, OperationError};
pub use executor::{Clock, RestartStamp, RuntimeExecutor, RuntimeOperator, SystemClock};
pub use flatten::{escape_value, flatten};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, OutcomeKind, noop_metrics};
pub use pods::{PodListQuery, PodQueryService, PodSource, label_selector};
pub use release::{HelmInspector, ReleaseInspector};
