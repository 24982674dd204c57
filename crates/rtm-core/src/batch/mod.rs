//! Batch orchestration of runtime operations.
//! - De-duplicates the requested ids and pre-seeds every one as failed.
//! - Drives the [`RuntimeOperator`] sequentially or through a bounded `JoinSet`.
//! - Enforces the optional batch deadline by canceling and aborting what is left.
use std::{collections::HashMap, collections::HashSet, sync::Arc, time::Duration};

use rtm_model::{BatchMode, BatchResult, HelmTimeout, Operation, OperationOutcome, RuntimeId};
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::{
    error::OperationError,
    executor::RuntimeOperator,
    metrics::{MetricsHandle, noop_metrics},
};

/// Default upper bound of operations in flight for concurrent batches.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Orchestrator limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Concurrent batches never run more operations at once; `0` is treated as `1`.
    pub max_concurrency: usize,
    /// Overall bound of one batch; `None` waits for every operation.
    pub deadline: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            deadline: None,
        }
    }
}

/// Applies one [`Operation`] to many runtimes and reports a flag per id.
///
/// A batch never fails as a whole: every error is logged and turned into a
/// `false` entry for the id it belongs to.
pub struct BatchOrchestrator {
    operator: Arc<dyn RuntimeOperator>,
    config: BatchConfig,
    metrics: MetricsHandle,
    shutdown: CancellationToken,
}

impl BatchOrchestrator {
    pub fn new(operator: Arc<dyn RuntimeOperator>, config: BatchConfig) -> Self {
        Self {
            operator,
            config,
            metrics: noop_metrics(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Cancel in-flight batches when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run `op` for every id and collect the outcomes.
    ///
    /// Rules:
    /// - the result holds exactly the de-duplicated input ids;
    /// - an id is `true` only if its own operation succeeded;
    /// - empty ids stay `false` and never reach the operator.
    ///
    /// The operations run on a detached task: dropping the returned future
    /// does not interrupt them. Only the batch deadline and the shutdown
    /// token cancel operations in flight.
    #[instrument(level = "debug", skip_all, fields(op = %op, mode = %mode, requested = ids.len()))]
    pub async fn run_batch(
        &self,
        ids: &[String],
        mode: BatchMode,
        op: Operation,
        timeout: &HelmTimeout,
    ) -> BatchResult {
        let unique = dedup(ids);
        let seeded = BatchResult::seeded(unique.iter().cloned());
        self.metrics.record_batch(op, mode, unique.len());

        let valid: Vec<RuntimeId> = unique
            .into_iter()
            .filter_map(|raw| match RuntimeId::new(raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "skipping runtime id");
                    None
                }
            })
            .collect();

        let run = BatchRun {
            operator: Arc::clone(&self.operator),
            max_concurrency: self.config.max_concurrency.max(1),
            op,
            timeout: timeout.clone(),
            cancel: self.shutdown.child_token(),
        };
        let deadline = self.config.deadline;
        let mut result = seeded.clone();

        let task = tokio::spawn(
            async move {
                let drive = async {
                    match mode {
                        BatchMode::Sequential => run.sequential(&valid, &mut result).await,
                        BatchMode::Concurrent => run.concurrent(&valid, &mut result).await,
                    }
                };
                match deadline {
                    Some(limit) => {
                        if tokio::time::timeout(limit, drive).await.is_err() {
                            run.cancel.cancel();
                            warn!(
                                deadline_ms = limit.as_millis() as u64,
                                "batch deadline exceeded"
                            );
                        }
                    }
                    None => drive.await,
                }
                result
            }
            .in_current_span(),
        );

        let result = match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "batch task did not finish");
                seeded
            }
        };

        info!(
            op = %op,
            mode = %mode,
            total = result.len(),
            succeeded = result.succeeded(),
            "batch finished"
        );
        result
    }
}

/// Owned state of one batch, moved onto its own task.
struct BatchRun {
    operator: Arc<dyn RuntimeOperator>,
    max_concurrency: usize,
    op: Operation,
    timeout: HelmTimeout,
    cancel: CancellationToken,
}

impl BatchRun {
    async fn sequential(&self, ids: &[RuntimeId], result: &mut BatchResult) {
        for id in ids {
            if self.cancel.is_cancelled() {
                debug!(runtime = %id, "batch canceled, skipping");
                continue;
            }
            let res = self
                .operator
                .execute(self.op, id, &self.timeout, &self.cancel)
                .await;
            result.record(outcome(self.op, id, res));
        }
    }

    async fn concurrent(&self, ids: &[RuntimeId], result: &mut BatchResult) {
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut set = JoinSet::new();
        let mut owners = HashMap::with_capacity(ids.len());
        let op = self.op;

        for id in ids {
            let operator = Arc::clone(&self.operator);
            let permits = Arc::clone(&permits);
            let timeout = self.timeout.clone();
            let cancel = self.cancel.clone();
            let id = id.clone();
            let key = id.as_str().to_string();

            let handle = set.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return OperationOutcome::failure(id.as_str());
                };
                let res = operator.execute(op, &id, &timeout, &cancel).await;
                outcome(op, &id, res)
            });
            owners.insert(handle.id(), key);
        }

        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((_, done)) => result.record(done),
                Err(e) => {
                    let runtime = owners.get(&e.id()).map(String::as_str).unwrap_or("?");
                    warn!(
                        runtime,
                        panicked = e.is_panic(),
                        error = %e,
                        "runtime worker did not finish"
                    );
                }
            }
        }
    }
}

/// Log a failed operation and reduce it to a flag.
fn outcome(op: Operation, id: &RuntimeId, res: Result<(), OperationError>) -> OperationOutcome {
    match res {
        Ok(()) => OperationOutcome::success(id.as_str()),
        Err(e) => {
            warn!(runtime = %id, op = %op, kind = e.kind(), error = %e, "runtime operation failed");
            OperationOutcome::failure(id.as_str())
        }
    }
}

/// Keep the first occurrence of every id, in input order.
fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
