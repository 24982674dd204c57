use std::{process::Stdio, time::Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{CommandOutput, CommandSpec, ExecError, RunnerConfig};

/// Executes [`CommandSpec`]s.
///
/// Returns the captured output of any process that ran to completion,
/// including non-zero exits; interpreting the exit status is up to the caller.
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, ExecError>;
}

/// Runner that spawns real OS processes via `tokio::process::Command`.
///
/// Processes are spawned with `kill_on_drop`, so an invocation that times
/// out, is canceled, or whose task is aborted never outlives its caller.
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner {
    config: RunnerConfig,
}

impl SubprocessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn truncate_stderr(&self, mut out: CommandOutput) -> CommandOutput {
        let max = self.config.max_error_bytes;
        if out.stderr.len() > max {
            let cut = out.stderr.len() - max;
            out.stderr.drain(..cut);
        }
        out
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, ExecError> {
        spec.validate()?;
        trace!(program = %spec.program, args = ?spec.args, "spawning subprocess");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ExecError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let started = Instant::now();
        let deadline = spec.timeout.map(|t| t + self.config.kill_grace);
        let wait = async move {
            let output = child.wait_with_output();
            let res: Result<std::io::Result<std::process::Output>, ExecError> = match deadline {
                Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
                    ExecError::Timeout {
                        program: spec.program.clone(),
                        after_ms: limit.as_millis() as u64,
                    }
                }),
                None => Ok(output.await),
            };
            res.and_then(|r| r.map_err(ExecError::from))
        };

        let output = tokio::select! {
            res = wait => res,
            _ = cancel.cancelled() => {
                debug!(program = %spec.program, "cancellation requested; killing subprocess");
                Err(ExecError::Canceled)
            }
        }?;

        let out = CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if out.success() {
            debug!(program = %spec.program, elapsed_ms, "subprocess exited successfully");
        } else {
            warn!(
                program = %spec.program,
                code = ?out.code,
                elapsed_ms,
                "subprocess exited with failure"
            );
        }
        Ok(self.truncate_stderr(out))
    }
}
