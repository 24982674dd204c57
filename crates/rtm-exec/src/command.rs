use std::{fmt, time::Duration};

use crate::ExecError;

/// Structured description of one external invocation.
///
/// Built by pure functions (see [`crate::HelmCli`]) and executed by a
/// [`crate::CommandRunner`], so argument assembly can be tested without
/// spawning anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path (e.g. `"helm"`).
    pub program: String,
    /// Arguments in the exact order they are passed.
    pub args: Vec<String>,
    /// Upper bound for the invocation; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the spec before spawning.
    ///
    /// Rules:
    /// - `program` is not empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.trim().is_empty() {
            return Err(ExecError::InvalidSpec("program is empty".into()));
        }
        Ok(())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandSpec(program='{}', args={}, timeout={:?})",
            self.program,
            self.args.len(),
            self.timeout,
        )
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// Turn a non-zero exit into [`ExecError::NonZeroExit`].
    pub fn into_result(self, program: &str) -> Result<Self, ExecError> {
        if self.success() {
            return Ok(self);
        }
        Err(ExecError::NonZeroExit {
            program: program.to_string(),
            code: self.code,
            stderr: self.stderr_lossy(),
        })
    }
}
