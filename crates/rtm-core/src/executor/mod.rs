//! Restart and delete of a single runtime.
//!
//! Restart re-applies the release's own values with a fresh pod checksum so
//! the workload rolls; delete uninstalls the release.
mod stamp;
pub use stamp::{Clock, RestartStamp, SystemClock};

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use rtm_exec::{CommandRunner, HelmCli, is_release_missing};
use rtm_model::{
    CHECKSUM_KEY, ConfigTree, HelmTimeout, Operation, PRIVATE_CHARTS_REPO_KEY, RuntimeId,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    error::{ConfigError, OperationError},
    flatten::flatten,
    metrics::{MetricsHandle, OutcomeKind, noop_metrics},
    release::{HelmInspector, ReleaseInspector},
};

/// Single-runtime operations driven by the batch orchestrator.
#[async_trait]
pub trait RuntimeOperator: Send + Sync + 'static {
    async fn restart(
        &self,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError>;

    async fn delete(
        &self,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError>;

    /// Dispatch on `op`.
    async fn execute(
        &self,
        op: Operation,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        match op {
            Operation::Restart => self.restart(id, timeout, cancel).await,
            Operation::Delete => self.delete(id, timeout, cancel).await,
        }
    }
}

/// [`RuntimeOperator`] driving the helm CLI.
pub struct RuntimeExecutor {
    helm: HelmCli,
    runner: Arc<dyn CommandRunner>,
    inspector: Arc<dyn ReleaseInspector>,
    stamp: RestartStamp,
    metrics: MetricsHandle,
}

impl RuntimeExecutor {
    /// Executor reading values through `helm get values` on the same runner.
    pub fn new(helm: HelmCli, runner: Arc<dyn CommandRunner>) -> Self {
        let inspector = Arc::new(HelmInspector::new(helm.clone(), runner.clone()));
        Self {
            helm,
            runner,
            inspector,
            stamp: RestartStamp::default(),
            metrics: noop_metrics(),
        }
    }

    pub fn with_inspector(mut self, inspector: Arc<dyn ReleaseInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.stamp = RestartStamp::new(clock);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    async fn timed<F>(&self, op: Operation, id: &RuntimeId, fut: F) -> Result<(), OperationError>
    where
        F: Future<Output = Result<(), OperationError>>,
    {
        self.metrics.record_operation_started(op);
        let started = Instant::now();
        let res = fut.await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        self.metrics
            .record_operation_completed(op, OutcomeKind::of(&res), elapsed_ms);
        if res.is_ok() {
            info!(runtime = %id, op = %op, elapsed_ms, "runtime operation succeeded");
        }
        res
    }

    async fn restart_inner(
        &self,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        let values = self
            .inspector
            .current_values(id, timeout.duration(), cancel)
            .await?;
        let repo = charts_repo(&values)?.to_string();

        let checksum_prefix = format!("{CHECKSUM_KEY}=");
        let mut assignments: Vec<String> = flatten("", &values)?
            .into_iter()
            .filter(|a| !a.starts_with(&checksum_prefix))
            .collect();
        assignments.push(self.stamp.next_assignment());

        let release = id.release_name();
        let spec = self.helm.upgrade(&release, &repo, &assignments, timeout);
        debug!(%release, assignments = assignments.len(), "upgrading release");

        self.runner
            .run(&spec, cancel)
            .await?
            .into_result(&spec.program)?;
        Ok(())
    }

    async fn delete_inner(
        &self,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        let release = id.release_name();
        let spec = self.helm.uninstall(&release, timeout);
        debug!(%release, "uninstalling release");

        let output = self.runner.run(&spec, cancel).await?;
        if !output.success() && is_release_missing(&output.stderr_lossy()) {
            return Err(OperationError::NotFound(release.to_string()));
        }
        output.into_result(&spec.program)?;
        Ok(())
    }
}

#[async_trait]
impl RuntimeOperator for RuntimeExecutor {
    async fn restart(
        &self,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        self.timed(
            Operation::Restart,
            id,
            self.restart_inner(id, timeout, cancel),
        )
        .await
    }

    async fn delete(
        &self,
        id: &RuntimeId,
        timeout: &HelmTimeout,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        self.timed(Operation::Delete, id, self.delete_inner(id, timeout, cancel))
            .await
    }
}

/// Required root string naming the chart repository.
fn charts_repo(values: &ConfigTree) -> Result<&str, ConfigError> {
    match values.get(PRIVATE_CHARTS_REPO_KEY) {
        None | Some(ConfigTree::Null) => Err(ConfigError::MissingField(PRIVATE_CHARTS_REPO_KEY)),
        Some(ConfigTree::String(repo)) if repo.trim().is_empty() => {
            Err(ConfigError::MissingField(PRIVATE_CHARTS_REPO_KEY))
        }
        Some(ConfigTree::String(repo)) => Ok(repo),
        Some(other) => Err(ConfigError::WrongType {
            field: PRIVATE_CHARTS_REPO_KEY,
            expected: "string",
            actual: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedRunner, fail, ok};
    use rtm_exec::ExecError;

    const VALUES: &str = r#"{"privateChartsRepo": "https://charts.example", "image": {"tag": "1.2"}, "podAnnotations": {"checksum": "v1"}}"#;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn unix_seconds(&self) -> u64 {
            self.0
        }
    }

    fn executor(runner: Arc<ScriptedRunner>) -> RuntimeExecutor {
        RuntimeExecutor::new(HelmCli::new(), runner).with_clock(Arc::new(FixedClock(1_000)))
    }

    fn helm_ok(spec: &rtm_exec::CommandSpec) -> Result<rtm_exec::CommandOutput, ExecError> {
        match spec.args[0].as_str() {
            "get" => ok(VALUES),
            _ => ok("{}"),
        }
    }

    fn id(raw: &str) -> RuntimeId {
        RuntimeId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn restart_upgrades_with_existing_values_and_fresh_checksum() {
        let runner = ScriptedRunner::new(helm_ok);
        executor(runner.clone())
            .restart(&id("abc"), &HelmTimeout::default(), &CancellationToken::new())
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, ["get", "values", "rt-abc", "-o", "json"]);
        assert_eq!(
            calls[1].args,
            [
                "upgrade",
                "rt-abc",
                "mayanr",
                "--repo",
                "https://charts.example",
                "--set",
                "privateChartsRepo=https://charts.example,image.tag=1.2,podAnnotations.checksum=v1000",
                "--timeout",
                "5m0s",
                "--wait",
                "-o",
                "json",
            ]
        );
    }

    #[tokio::test]
    async fn restart_sets_exactly_one_distinct_checksum_per_call() {
        let runner = ScriptedRunner::new(helm_ok);
        let exec = executor(runner.clone());
        for _ in 0..3 {
            exec.restart(&id("abc"), &HelmTimeout::default(), &CancellationToken::new())
                .await
                .unwrap();
        }

        let checksums: Vec<String> = runner
            .calls()
            .iter()
            .filter(|c| c.args[0] == "upgrade")
            .map(|c| {
                let set = &c.args[6];
                let found: Vec<&str> = set
                    .split(',')
                    .filter(|a| a.starts_with("podAnnotations.checksum="))
                    .collect();
                assert_eq!(found.len(), 1, "{set}");
                found[0].to_string()
            })
            .collect();
        assert_eq!(
            checksums,
            [
                "podAnnotations.checksum=v1000",
                "podAnnotations.checksum=v1001",
                "podAnnotations.checksum=v1002",
            ]
        );
    }

    #[tokio::test]
    async fn restart_of_missing_release_is_not_found() {
        let runner = ScriptedRunner::new(|_| fail(1, "Error: release: not found"));
        let err = executor(runner.clone())
            .restart(&id("gone"), &HelmTimeout::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::NotFound(_)));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn restart_requires_charts_repo() {
        let runner = ScriptedRunner::new(|_| ok(r#"{"image": {"tag": "1"}}"#));
        let err = executor(runner.clone())
            .restart(&id("a"), &HelmTimeout::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::Config(ConfigError::MissingField("privateChartsRepo"))
        ));
        assert_eq!(runner.calls().len(), 1, "no upgrade without a repo");
    }

    #[tokio::test]
    async fn restart_rejects_non_string_repo() {
        let runner = ScriptedRunner::new(|_| ok(r#"{"privateChartsRepo": 7}"#));
        let err = executor(runner)
            .restart(&id("a"), &HelmTimeout::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::Config(ConfigError::WrongType { actual: "number", .. })
        ));
    }

    #[tokio::test]
    async fn failed_upgrade_is_execution_error() {
        let runner = ScriptedRunner::new(|spec| match spec.args[0].as_str() {
            "get" => ok(VALUES),
            _ => fail(1, "Error: UPGRADE FAILED: timed out waiting for the condition"),
        });
        let err = executor(runner)
            .restart(&id("a"), &HelmTimeout::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::Execution(ExecError::NonZeroExit { .. })
        ));
    }

    #[tokio::test]
    async fn delete_uninstalls_release() {
        let runner = ScriptedRunner::new(|_| ok("release \"rt-a\" uninstalled"));
        let timeout = HelmTimeout::parse("30s").unwrap();
        executor(runner.clone())
            .delete(&id("a"), &timeout, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(runner.calls()[0].args, ["uninstall", "rt-a", "--timeout", "30s"]);
    }

    #[tokio::test]
    async fn delete_of_missing_release_is_not_found() {
        let runner = ScriptedRunner::new(|_| {
            fail(
                1,
                "Error: uninstall: Release not loaded: rt-x: release: not found",
            )
        });
        let err = executor(runner)
            .execute(
                Operation::Delete,
                &id("x"),
                &HelmTimeout::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::NotFound(ref r) if r == "rt-x"));
    }
}
